//! Admission pipeline: origin → credential → token → identity.
//!
//! ```text
//! START ─origin─▶ ORIGIN_CHECKED ─extract─▶ CREDENTIAL_EXTRACTED ─verify─▶ VERIFIED
//!       ─resolve─▶ RESOLVED ─attach─▶ ADMITTED
//! ```
//!
//! Any step may end in a terminal rejection (`AppError`). The origin step runs
//! for every request (router-wide layer); the identity steps run only on
//! protected routes. Nothing is retried here.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue};

use crate::error::AppError;
use crate::services::auth::{
    credential,
    identity::{Identity, IdentityResolver},
    origin::{AllowList, OriginDecision},
    token::TokenVerifier,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    OriginChecked,
    CredentialExtracted,
    Verified,
    Resolved,
    Admitted,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::OriginChecked => "origin_checked",
            Self::CredentialExtracted => "credential_extracted",
            Self::Verified => "verified",
            Self::Resolved => "resolved",
            Self::Admitted => "admitted",
        }
    }
}

#[derive(Clone)]
pub struct AdmissionPipeline {
    allow_list: Arc<AllowList>,
    verifier: TokenVerifier,
    resolver: IdentityResolver,
}

impl AdmissionPipeline {
    pub fn new(
        allow_list: Arc<AllowList>,
        verifier: TokenVerifier,
        resolver: IdentityResolver,
    ) -> Self {
        Self {
            allow_list,
            verifier,
            resolver,
        }
    }

    pub fn allow_list(&self) -> &Arc<AllowList> {
        &self.allow_list
    }

    /// `START → ORIGIN_CHECKED`. Every decision is logged for audit.
    pub fn check_origin(&self, origin: Option<&HeaderValue>) -> Result<(), AppError> {
        let decision = self.allow_list.decide(origin);
        let shown = origin.map(|o| String::from_utf8_lossy(o.as_bytes()).into_owned());

        match decision {
            OriginDecision::AdmitAbsent => {
                tracing::debug!(stage = Stage::Start.as_str(), "no origin, admitted");
                Ok(())
            }
            OriginDecision::AdmitListed => {
                tracing::debug!(
                    stage = Stage::Start.as_str(),
                    origin = shown.as_deref(),
                    "origin admitted"
                );
                Ok(())
            }
            OriginDecision::Reject => {
                let origin = shown.unwrap_or_default();
                tracing::warn!(
                    stage = Stage::Start.as_str(),
                    origin = %origin,
                    "cors blocked"
                );
                Err(AppError::OriginRejected { origin })
            }
        }
    }

    /// `ORIGIN_CHECKED → … → RESOLVED`. The caller attaches the identity.
    pub async fn admit(&self, headers: &HeaderMap) -> Result<Identity, AppError> {
        let Some(credential) = credential::extract(headers) else {
            tracing::debug!(stage = Stage::OriginChecked.as_str(), "no credential");
            return Err(AppError::NoCredential);
        };

        let claims = self.verifier.verify(credential.as_str()).map_err(|err| {
            tracing::warn!(
                stage = Stage::CredentialExtracted.as_str(),
                source = credential.source().as_str(),
                error = %err,
                "token verification failed"
            );
            AppError::from(err)
        })?;

        // Only suspending step. If the connection goes away while this is
        // pending the future is dropped and nothing is attached.
        let identity = self.resolver.resolve(&claims).await.map_err(|err| {
            tracing::warn!(
                stage = Stage::Verified.as_str(),
                subject = %claims.subject,
                error = %err,
                "identity resolution failed"
            );
            AppError::from(err)
        })?;

        tracing::debug!(
            stage = Stage::Resolved.as_str(),
            user_id = %identity.id,
            source = credential.source().as_str(),
            expires_at = %claims.expires_at,
            issued_at = ?claims.issued_at,
            "identity resolved"
        );

        Ok(identity)
    }
}
