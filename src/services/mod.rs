pub mod fcm;
pub mod push_service;

pub use push_service::{PushError, PushResponse, PushService, PushSummary};
