//! bearer token 検証 → user lookup → Identity を extensions に入れる
//!
//! - credential は `Authorization: Bearer <jwt>` を優先し、無ければ `token` cookie
//! - 検証・lookup は `AdmissionPipeline` 側で実施し、ここは配線だけ
//! - 失敗時は AppError (401/404/500) を返し、handler は呼ばない

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::Stage;
use crate::state::AppState;

/// 認証が必要な route にだけ admission を掛ける。
///
/// `route_layer` なので、存在しない path は 401 ではなく 404 になる。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/user/me", get(me));
/// let protected = middleware::admission::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, admission_middleware))
}

async fn admission_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state.admission.admit(req.headers()).await?;

    tracing::debug!(
        stage = Stage::Admitted.as_str(),
        user_id = %identity.id,
        "request admitted"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode, header},
        routing::get,
    };
    use chrono::{TimeDelta, Utc};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::api::v1::extractors::CurrentUser;
    use crate::test_support::{InMemoryUserRepo, mint_token, state_with, user_row};

    fn probe_app(state: AppState, calls: Arc<AtomicUsize>) -> Router {
        let router = Router::new().route(
            "/probe",
            get(move |CurrentUser(identity): CurrentUser| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    identity.id.to_string()
                }
            }),
        );

        apply(router, state.clone()).with_state(state)
    }

    fn probe_request(subject: Uuid) -> HttpRequest<Body> {
        let token = mint_token(subject, Utc::now(), TimeDelta::hours(1));
        HttpRequest::builder()
            .uri("/probe")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn handler_observes_the_resolved_identity() {
        let row = user_row("alice");
        let calls = Arc::new(AtomicUsize::new(0));
        let app = probe_app(
            state_with(InMemoryUserRepo::with_users([row.clone()])),
            calls.clone(),
        );

        let response = app.oneshot(probe_request(row.id)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, row.id.to_string().as_bytes());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_requests_never_reach_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = probe_app(state_with(InMemoryUserRepo::default()), calls.clone());

        let response = app.oneshot(probe_request(Uuid::new_v4())).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dropped_request_during_lookup_never_reaches_the_handler() {
        let repo = InMemoryUserRepo::pending();
        let lookups = repo.lookups();
        let calls = Arc::new(AtomicUsize::new(0));
        let app = probe_app(state_with(repo), calls.clone());

        // Simulates the client going away: the in-flight future is dropped.
        let pending = app.oneshot(probe_request(Uuid::new_v4()));
        let outcome = tokio::time::timeout(Duration::from_millis(50), pending).await;

        assert!(outcome.is_err());
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
