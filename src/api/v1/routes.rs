/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/user/me などは admission (route_layer) 配下
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, users::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = Router::new().route("/user/me", get(me));
    let protected = middleware::admission::apply(protected, state);

    public.merge(protected)
}
