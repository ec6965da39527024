pub mod credential;
pub mod factory;
pub mod identity;
pub mod origin;
pub mod pipeline;
pub mod token;

pub use factory::build_admission_pipeline;
pub use identity::{Identity, IdentityResolver};
pub use origin::AllowList;
pub use pipeline::{AdmissionPipeline, Stage};
pub use token::TokenVerifier;
