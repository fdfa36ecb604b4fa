pub mod assist;
pub mod auth;
pub mod buddy;
pub mod checkin;
pub mod client_config;
pub mod event;
pub mod json_error;
pub mod settings;
pub mod sos;

pub use self::client_config::{AppConfig, ConfigError};
pub use self::event::{EventKind, RealtimeEvent};
pub use self::json_error::ErrorBody;
pub use self::sos::{RecipientStatus, Severity, SosStatus, TriggerType};
