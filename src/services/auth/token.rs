//! Bearer token verification (HS256, shared secret).
//!
//! - Signature and structure first, then expiry. A badly signed token is
//!   `Malformed` whatever its `exp` says.
//! - Expired once `now >= exp + leeway`, compared at full precision.
//! - The subject must be a UUID. Anything else (e.g. a legacy ObjectId) is
//!   `Malformed` and never reaches the user store, so it surfaces as
//!   `Invalid Token` rather than `User not found`.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Verification failures. Malformed always wins over Expired: expiry is only
/// looked at once structure and signature are known to be good.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token expired")]
    Expired,
}

/// Bearer token payload as it travels on the wire.
///
/// `id` is the user id (the auth server writes `id`; `sub` is accepted too).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(alias = "sub")]
    pub id: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

/// Verified claims, promoted to application types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    pub subject: Uuid,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
}

/// HS256 bearer token verifier bound to the process-wide shared secret.
///
/// - Key material is intentionally not printable via Debug.
/// - `exp` is checked here rather than by `jsonwebtoken` so the check can run
///   against an explicit instant.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key,
            validation,
            leeway_seconds,
        }
    }

    /// Verify against the wall clock.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`. No I/O; the HMAC comparison is constant-time
    /// inside the signing primitive.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, TokenError> {
        // signature + structure
        let claims =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
                .map_err(|e| TokenError::Malformed(e.to_string()))?
                .claims;

        let subject = Uuid::parse_str(claims.id.trim())
            .map_err(|_| TokenError::Malformed("'id' is not a uuid".to_string()))?;

        let expires_at = from_unix(claims.exp)
            .ok_or_else(|| TokenError::Malformed("'exp' out of range".to_string()))?;

        let issued_at = match claims.iat {
            Some(iat) => Some(
                from_unix(iat)
                    .ok_or_else(|| TokenError::Malformed("'iat' out of range".to_string()))?,
            ),
            None => None,
        };

        if now >= self.deadline(expires_at) {
            return Err(TokenError::Expired);
        }

        Ok(ClaimSet {
            subject,
            expires_at,
            issued_at,
        })
    }

    // First instant at which the token counts as expired.
    fn deadline(&self, expires_at: DateTime<Utc>) -> DateTime<Utc> {
        let leeway = i64::try_from(self.leeway_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);

        expires_at
            .checked_add_signed(leeway)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

fn from_unix(seconds: u64) -> Option<DateTime<Utc>> {
    let seconds = i64::try_from(seconds).ok()?;
    DateTime::from_timestamp(seconds, 0)
}
