// handlers/mod.rs - HTTP handlers
//
// Public (no auth): /health
// Bearer required:  /push, /functions/v1/push
pub mod health;
pub mod push;

pub use health::health;
pub use push::{method_not_allowed, push_post};
