/*
 * Responsibility
 * - Users の response DTO
 * - Identity から組み立てる (secret 系の項目は元から持たない)
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::auth::Identity;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Identity> for UserResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            user_name: identity.user_name,
            email: identity.email,
            address: identity.address,
            created_at: identity.created_at,
        }
    }
}
