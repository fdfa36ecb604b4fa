pub mod api;
pub mod inbox;
pub mod realtime;

pub use api::{ApiClient, ApiError, TokenCell};
pub use inbox::SosInbox;
pub use realtime::{LinkStatus, Realtime, RealtimeConfig, Subscription};
