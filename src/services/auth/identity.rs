//! Identity resolution: verified subject → stored user.
//!
//! One lookup per request, no cache. A missing row is `SubjectNotFound`
//! (deleted or never existed); storage errors pass through untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::repos::{UserRepo, UserRow, error::RepoError};
use crate::services::auth::token::ClaimSet;

/// Authenticated user attached to request extensions once admission succeeds.
///
/// Built only from `UserRow`, which has no secret columns, so there is nothing
/// to strip before handing it to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            user_name: row.user_name,
            email: row.email,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Token was fine but the account is gone (or never existed).
    #[error("subject not found")]
    SubjectNotFound,
    #[error("storage failure: {0}")]
    Storage(#[from] RepoError),
}

#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserRepo>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    pub async fn resolve(&self, claims: &ClaimSet) -> Result<Identity, ResolveError> {
        self.users
            .find_by_id(claims.subject)
            .await?
            .map(Identity::from)
            .ok_or(ResolveError::SubjectNotFound)
    }
}
