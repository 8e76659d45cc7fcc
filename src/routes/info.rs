use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use crate::err::{proceeds, Payload};
use crate::state::{AppState, ServiceInfo};

#[derive(Debug, Clone, Serialize)]
pub struct Info {
    date: String,
    version: &'static str,
    config: ServiceInfo,
}

pub async fn info(State(state): State<AppState>) -> Payload<Info> {
    proceeds(Info {
        date: Utc::now().format("%d %b %y %H:%M %Z").to_string(),
        version: env!("CARGO_PKG_VERSION"),
        config: ServiceInfo::clone(&state.info),
    })
}
