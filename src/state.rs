/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - admission: AllowList / TokenVerifier / IdentityResolver をまとめた pipeline
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 起動後は read-only。リクエスト間で可変状態は共有しない
 */
use std::sync::Arc;

use crate::services::auth::AdmissionPipeline;

#[derive(Clone)]
pub struct AppState {
    pub admission: Arc<AdmissionPipeline>,
}

impl AppState {
    pub fn new(admission: Arc<AdmissionPipeline>) -> Self {
        Self { admission }
    }
}
