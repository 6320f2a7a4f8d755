use clap::{Parser, Subcommand, ValueEnum};
use gigmate_chat::{
    KeyValueStore, MessageStore, Role, SaveMessageInput, Session, SessionStore,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "gigmate", about = "Local inbox for GigMate job chats")]
pub struct Cli {
    /// SQLite database file (overrides GIGMATE_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remember who is using this device
    Login {
        user_id: String,
        #[arg(long, default_value = "client")]
        role: Role,
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget the signed-in user
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Send a message about a job
    Send {
        #[arg(long)]
        job: String,
        #[arg(long)]
        to: String,
        /// Sender, defaults to the signed-in user
        #[arg(long)]
        from: Option<String>,
        content: String,
    },
    /// List conversations, most recent first
    Chats {
        #[arg(long)]
        user: Option<String>,
    },
    /// Mark a job's messages read and show them oldest first
    Thread {
        #[arg(long)]
        job: String,
        #[arg(long)]
        user: Option<String>,
        /// Leave unread messages unread
        #[arg(long)]
        no_mark: bool,
    },
    /// Every message the user sent or received
    Inbox {
        #[arg(long)]
        user: Option<String>,
    },
    /// Show or change device settings
    Settings {
        #[arg(long)]
        notifications: Option<Toggle>,
        #[arg(long)]
        language: Option<String>,
    },
}

/// Stores the commands operate on, sharing one key-value backend.
pub struct App<K> {
    pub messages: MessageStore<K>,
    pub sessions: SessionStore<K>,
}

impl<K: KeyValueStore> App<K> {
    fn resolve_user(&self, explicit: Option<String>) -> Result<String, String> {
        if let Some(user) = explicit {
            return Ok(user);
        }
        self.sessions
            .load_session()
            .map_err(|e| e.to_string())?
            .map(|s| s.user_id)
            .ok_or_else(|| {
                "No signed-in user; run `gigmate login <user-id>` or pass --user".to_string()
            })
    }

    pub fn run(&self, command: Command) -> Result<Value, String> {
        match command {
            Command::Login {
                user_id,
                role,
                token,
            } => {
                if user_id.trim().is_empty() {
                    return Err("User id cannot be empty".to_string());
                }
                let session = Session {
                    user_id,
                    role,
                    auth_token: token,
                    created_at: chrono::Utc::now().timestamp_millis(),
                };
                self.sessions
                    .save_session(&session)
                    .map_err(|e| e.to_string())?;
                to_json(&session)
            }
            Command::Logout => {
                self.sessions.clear_session().map_err(|e| e.to_string())?;
                Ok(json!({ "signedOut": true }))
            }
            Command::Whoami => {
                let session = self.sessions.load_session().map_err(|e| e.to_string())?;
                to_json(&session)
            }
            Command::Send {
                job,
                to,
                from,
                content,
            } => {
                let sender = self.resolve_user(from)?;
                let message = self
                    .messages
                    .save_message(SaveMessageInput::new(job, sender, to, content))
                    .map_err(|e| e.to_string())?;
                to_json(&message)
            }
            Command::Chats { user } => {
                let user = self.resolve_user(user)?;
                let chats = self.messages.get_chats(&user).map_err(|e| e.to_string())?;
                to_json(&chats)
            }
            Command::Thread { job, user, no_mark } => {
                let user = self.resolve_user(user)?;
                if !no_mark {
                    let marked = self
                        .messages
                        .mark_messages_as_read(&job, &user)
                        .map_err(|e| e.to_string())?;
                    info!("Opened thread {} as {}, {} newly read", job, user, marked);
                }
                let messages = self
                    .messages
                    .get_messages_by_job_id(&job)
                    .map_err(|e| e.to_string())?;
                to_json(&messages)
            }
            Command::Inbox { user } => {
                let user = self.resolve_user(user)?;
                let messages = self
                    .messages
                    .get_messages_by_user_id(&user)
                    .map_err(|e| e.to_string())?;
                to_json(&messages)
            }
            Command::Settings {
                notifications,
                language,
            } => {
                let mut settings = self.sessions.load_settings().map_err(|e| e.to_string())?;
                let changed = notifications.is_some() || language.is_some();
                if let Some(toggle) = notifications {
                    settings.notifications_enabled = matches!(toggle, Toggle::On);
                }
                if let Some(language) = language {
                    settings.language = language;
                }
                if changed {
                    self.sessions
                        .save_settings(&settings)
                        .map_err(|e| e.to_string())?;
                }
                to_json(&settings)
            }
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}
