//! Credential hashing and bearer token handling.
//!
//! Both halves are stateless: `password` wraps bcrypt, `token` wraps HS256 JWTs whose
//! signing secret and lifetime come from [`crate::config::SecurityConfig`].

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Claims, TokenError, TokenService};
