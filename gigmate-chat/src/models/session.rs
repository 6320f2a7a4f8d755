use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the marketplace the signed-in user is on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
   Client,
   Freelancer,
}

impl fmt::Display for Role {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Role::Client => write!(f, "client"),
         Role::Freelancer => write!(f, "freelancer"),
      }
   }
}

impl FromStr for Role {
   type Err = String;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      match s.trim().to_ascii_lowercase().as_str() {
         "client" => Ok(Role::Client),
         "freelancer" => Ok(Role::Freelancer),
         other => Err(format!("Unknown role '{}' (expected client or freelancer)", other)),
      }
   }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
   pub user_id: String,
   pub role: Role,
   pub auth_token: Option<String>,
   pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
   pub notifications_enabled: bool,
   pub language: String,
}

impl Default for Settings {
   fn default() -> Self {
      Self {
         notifications_enabled: true,
         language: "en".to_string(),
      }
   }
}
