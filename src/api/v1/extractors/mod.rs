/*
 * Responsibility
 * - handler が使う extractor の公開
 */
mod current_user;

pub use current_user::CurrentUser;
