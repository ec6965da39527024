//! Fixtures shared by the unit tests: token minting, an in-memory user store,
//! and ready-made pipeline/state builders.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{EncodingKey, Header};
use uuid::Uuid;

use crate::repos::{UserRepo, UserRow, error::RepoError};
use crate::services::auth::{
    AdmissionPipeline, AllowList, IdentityResolver, TokenVerifier, token::TokenClaims,
};
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-secret-for-unit-tests";

pub fn mint_token(subject: Uuid, issued_at: DateTime<Utc>, ttl: TimeDelta) -> String {
    mint_token_with_secret(TEST_SECRET, subject, issued_at, ttl)
}

pub fn mint_token_with_secret(
    secret: &str,
    subject: Uuid,
    issued_at: DateTime<Utc>,
    ttl: TimeDelta,
) -> String {
    let claims = TokenClaims {
        id: subject.to_string(),
        exp: (issued_at + ttl).timestamp() as u64,
        iat: Some(issued_at.timestamp() as u64),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign test token")
}

pub fn user_row(name: &str) -> UserRow {
    UserRow {
        id: Uuid::new_v4(),
        user_name: name.to_string(),
        email: format!("{name}@example.com"),
        address: Some("1 Library Lane".to_string()),
        created_at: Utc::now(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
enum Behaviour {
    #[default]
    Normal,
    Failing,
    Pending,
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    users: HashMap<Uuid, UserRow>,
    behaviour: Behaviour,
    lookups: Arc<AtomicUsize>,
}

impl InMemoryUserRepo {
    pub fn with_users(rows: impl IntoIterator<Item = UserRow>) -> Self {
        Self {
            users: rows.into_iter().map(|row| (row.id, row)).collect(),
            ..Self::default()
        }
    }

    /// Every lookup fails like an unreachable database.
    pub fn failing() -> Self {
        Self {
            behaviour: Behaviour::Failing,
            ..Self::default()
        }
    }

    /// Every lookup hangs forever.
    pub fn pending() -> Self {
        Self {
            behaviour: Behaviour::Pending,
            ..Self::default()
        }
    }

    /// Shared counter of lookups started so far.
    pub fn lookups(&self) -> Arc<AtomicUsize> {
        self.lookups.clone()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        match self.behaviour {
            Behaviour::Normal => Ok(self.users.get(&user_id).cloned()),
            Behaviour::Failing => Err(RepoError::Timeout),
            Behaviour::Pending => std::future::pending().await,
        }
    }
}

pub fn pipeline_with(repo: InMemoryUserRepo) -> AdmissionPipeline {
    AdmissionPipeline::new(
        Arc::new(AllowList::new(["http://localhost:3000"])),
        TokenVerifier::new(TEST_SECRET, 0),
        IdentityResolver::new(Arc::new(repo)),
    )
}

pub fn state_with(repo: InMemoryUserRepo) -> AppState {
    AppState::new(Arc::new(pipeline_with(repo)))
}
