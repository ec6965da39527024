//! Origin gate: rejects requests whose declared `Origin` is not allow-listed.
//!
//! Must sit inside the CORS layer so pre-flights are already answered and the
//! rejection goes out without an Allow-Origin header.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::AdmissionPipeline;

pub fn apply(router: Router, pipeline: Arc<AdmissionPipeline>) -> Router {
    router.layer(middleware::from_fn_with_state(pipeline, origin_gate))
}

async fn origin_gate(
    State(pipeline): State<Arc<AdmissionPipeline>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    pipeline.check_origin(req.headers().get(header::ORIGIN))?;

    Ok(next.run(req).await)
}
