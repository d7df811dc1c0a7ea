//! Request authentication

pub mod auth;

pub use auth::{decode_token, AuthUser, CurrentUser};
