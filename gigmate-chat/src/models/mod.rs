mod chat;
pub mod input;
mod message;
mod session;

pub use chat::Chat;
pub use input::SaveMessageInput;
pub use message::Message;
pub use session::{Role, Session, Settings};
