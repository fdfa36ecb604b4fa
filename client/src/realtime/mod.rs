mod connection;

pub use connection::{LinkStatus, Realtime, RealtimeConfig, Subscription};
