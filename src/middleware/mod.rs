/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 適用順 (外側から): http → cors → origin → (route ごと) admission
 */
pub mod admission;
pub mod cors;
pub mod http;
pub mod origin;
