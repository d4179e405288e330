//! Credential and token primitives for the admin authentication service.
//!
//! - Password hashing and verification (Argon2id)
//! - Signed, time-bound tokens (JWT, HS256)
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, JwtMaker, TokenMaker};
//! use chrono::Duration;
//!
//! let secret = b"secret_key_at_least_32_bytes_long!";
//! let maker = JwtMaker::new();
//! let claims = Claims::for_subject("user123", Duration::hours(24));
//! let token = maker.create_token(&claims, secret).unwrap();
//! let decoded = maker.verify_token(&token, secret).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```

pub mod jwt;
pub mod password;

pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtMaker;
pub use jwt::TokenMaker;
pub use password::PasswordError;
pub use password::PasswordHasher;
