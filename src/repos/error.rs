/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - pool の acquire timeout は Db と区別して返す (admission の待ち時間上限)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[source] sqlx::Error),
    #[error("db pool timed out")]
    Timeout,
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => RepoError::Timeout,
            e => RepoError::Db(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_distinguished() {
        assert!(matches!(
            RepoError::from(sqlx::Error::PoolTimedOut),
            RepoError::Timeout
        ));
        assert!(matches!(
            RepoError::from(sqlx::Error::RowNotFound),
            RepoError::Db(_)
        ));
    }
}
