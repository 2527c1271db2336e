pub mod focus_check;
pub mod push_token;

pub use focus_check::FocusCheck;
pub use push_token::PushToken;
