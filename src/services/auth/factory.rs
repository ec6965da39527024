/// Factory: build the `AdmissionPipeline` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::repos::UserRepo;
use crate::services::auth::{AdmissionPipeline, AllowList, IdentityResolver, TokenVerifier};

pub fn build_admission_pipeline(
    config: &Config,
    users: Arc<dyn UserRepo>,
) -> Arc<AdmissionPipeline> {
    let allow_list = Arc::new(AllowList::new(&config.cors_allowed_origins));
    tracing::info!(origins = allow_list.len(), "cors allow-list loaded");

    let verifier = TokenVerifier::new(&config.jwt_secret, config.token_leeway_seconds);
    let resolver = IdentityResolver::new(users);

    Arc::new(AdmissionPipeline::new(allow_list, verifier, resolver))
}
