pub mod models;
pub mod rest;
pub mod service;

pub use rest::{DatabaseError, RestClient, RestCredentials};
