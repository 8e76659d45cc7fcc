use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::TokenKeys;

/// Process-wide state, built once in `main` and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenKeys,
    pub info: Arc<ServiceInfo>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        tokens: TokenKeys,
        info: ServiceInfo,
        request_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            tokens,
            info: Arc::new(info),
            request_timeout,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("pool", &self.pool)
            .field("info", &self.info)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

/// Repositories advertised on `/info` for the lab tooling.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceInfo {
    pub case_repo: String,
    pub case_branch: String,
    pub infra_repo: String,
    pub infra_branch: String,
}
