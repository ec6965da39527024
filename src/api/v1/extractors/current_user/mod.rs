/*!
 * Current user extractor
 *
 * Responsibility:
 * - admission 済みリクエストの Identity を handler に提供する
 * - HTTP / axum 依存は core に閉じ込める。Identity の型は services::auth 側
 *
 * Public API:
 * - CurrentUser
 */

mod core;

pub use self::core::CurrentUser;
