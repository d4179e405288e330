use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Signs and verifies [`Claims`] with a symmetric secret.
pub trait TokenMaker: Send + Sync + 'static {
    /// Serialize and sign claims into an opaque token.
    ///
    /// # Arguments
    /// * `claims` - Claims to embed; must carry an expiration
    /// * `secret` - Shared signing secret
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    fn create_token(&self, claims: &Claims, secret: &[u8]) -> Result<String, JwtError>;

    /// Parse a token, check its signature and expiration, and return its claims.
    ///
    /// # Arguments
    /// * `token` - Token string as presented by the caller
    /// * `secret` - Shared signing secret
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `TokenMalformed` - Input is not syntactically a token
    /// * `TokenInvalid` - Signature mismatch, undecodable claims, or expired
    fn verify_token(&self, token: &str, secret: &[u8]) -> Result<Claims, JwtError>;
}

/// JWT implementation of [`TokenMaker`].
///
/// Uses HS256 (HMAC with SHA-256) and validates `exp` with no leeway.
#[derive(Debug, Clone)]
pub struct JwtMaker {
    algorithm: Algorithm,
}

impl JwtMaker {
    /// Create a new HS256 token maker.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::HS256,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl Default for JwtMaker {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMaker for JwtMaker {
    fn create_token(&self, claims: &Claims, secret: &[u8]) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &EncodingKey::from_secret(secret))
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    fn verify_token(&self, token: &str, secret: &[u8]) -> Result<Claims, JwtError> {
        if !is_compact_token(token) {
            return Err(JwtError::TokenMalformed);
        }

        let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenInvalid("token has expired".to_string()),
                _ => JwtError::TokenInvalid(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

/// Three non-empty base64url segments separated by dots.
fn is_compact_token(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();

    segments.len() == 3
        && segments.iter().all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        })
}
