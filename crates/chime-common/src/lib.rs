pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{BridgeError, ChimeError, ConfigError, PlatformError};
pub use events::{Event, EventBus};
pub use id::NotificationId;
pub use types::{ConversationKey, UserStatus};

pub type Result<T> = std::result::Result<T, ChimeError>;
