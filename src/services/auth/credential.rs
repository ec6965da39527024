//! Bearer credential extraction from transport fields.
//!
//! No trust decision is made here: a credential is just an opaque string until
//! the token verifier has looked at it.

use axum::http::{HeaderMap, header};
use axum_extra::extract::CookieJar;

/// Cookie carrying the same bearer token the browser client stores after login.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    AuthorizationHeader,
    Cookie,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationHeader => "authorization_header",
            Self::Cookie => "cookie",
        }
    }
}

/// Opaque bearer token plus where it came from. The token itself is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Pull the credential out of the request headers.
///
/// `Authorization: Bearer <token>` first, then the `token` cookie. First match
/// wins; a header that is present but not in bearer form falls through to the
/// cookie.
pub fn extract(headers: &HeaderMap) -> Option<Credential> {
    from_authorization(headers)
        .map(|token| Credential {
            token,
            source: CredentialSource::AuthorizationHeader,
        })
        .or_else(|| {
            from_cookie(headers).map(|token| Credential {
                token,
                source: CredentialSource::Cookie,
            })
        })
}

fn from_authorization(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn from_cookie(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    let token = jar.get(TOKEN_COOKIE)?.value().trim();

    (!token.is_empty()).then(|| token.to_string())
}
