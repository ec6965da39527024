/*
 * Responsibility
 * - GET /api/v1/user/me: admission 済みの Identity をそのまま返す
 * - book/cart/order などの handler も同じく CurrentUser を受け取る想定
 */
use axum::Json;

use crate::api::v1::{dto::users::UserResponse, extractors::CurrentUser};

pub async fn me(CurrentUser(identity): CurrentUser) -> Json<UserResponse> {
    Json(identity.into())
}
