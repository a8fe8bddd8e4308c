//! API authentication: static tokens and minted admin JWTs

pub mod claims;
pub mod token;

pub use claims::{mint_admin_token, AdminClaims};
pub use token::TokenSource;
