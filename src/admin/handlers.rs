use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AdminState;
use crate::reconcile::{ReconcileState, TickOutcome};
use crate::settings::{ActiveConfig, ValidationBounds};

#[derive(Serialize)]
pub struct PipelineStatus {
    pub version: &'static str,
    pub state: ReconcileState,
    pub last_outcome: Option<TickOutcome>,
    pub applied_hash: String,
    pub applied_at: Option<DateTime<Utc>>,
    pub ticks: u64,
    pub config_version: String,
    pub updated_at: String,
    pub account_mode: String,
}

#[derive(Serialize)]
pub struct ConfigView {
    pub config: ActiveConfig,
    pub bounds: ValidationBounds,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<PipelineStatus> {
    let snapshot = state.handle.snapshot();
    Json(PipelineStatus {
        version: env!("CARGO_PKG_VERSION"),
        state: snapshot.state,
        last_outcome: snapshot.last_outcome.clone(),
        applied_hash: snapshot.applied_hash.clone(),
        applied_at: snapshot.applied_at,
        ticks: snapshot.ticks,
        config_version: snapshot.config.config_version.clone(),
        updated_at: snapshot.config.updated_at.clone(),
        account_mode: snapshot.config.account_mode.clone(),
    })
}

pub async fn get_config(State(state): State<AdminState>) -> Json<ConfigView> {
    let snapshot = state.handle.snapshot();
    Json(ConfigView {
        config: snapshot.config.clone(),
        bounds: snapshot.bounds,
    })
}
