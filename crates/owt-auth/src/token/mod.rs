//! Token engine: issuance, verification and bearer extraction
//!
//! Tokens are JWT compact strings signed with HMAC-SHA256. Issuance and
//! verification are synchronous and share only the immutable [`SigningKey`].
//!
//! [`SigningKey`]: crate::key::SigningKey

pub mod bearer;
pub mod issuer;
pub mod validator;

pub use bearer::{BEARER_SCHEME, bearer_token};
pub use issuer::{DEFAULT_TOKEN_TTL, TokenIssuer};
pub use validator::{TokenValidator, Verification};
