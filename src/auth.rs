//! Credential secrets, bearer tokens, and the per-client token manager.

pub mod manager;
pub mod secret;
pub mod token;

pub use manager::*;
pub use secret::*;
pub use token::*;
