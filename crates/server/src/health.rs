use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use bargainer_core::{DefaultNegotiator, ItemSet};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    negotiator: Arc<DefaultNegotiator>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub negotiator: HealthCheck,
    pub checked_at: String,
}

pub fn router(negotiator: Arc<DefaultNegotiator>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { negotiator })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let negotiator = negotiator_check(&state.negotiator);
    let ready = negotiator.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "bargainer-server runtime initialized".to_string(),
        },
        negotiator,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

/// Runs a fixed proposal through the negotiator and checks the split is a partition.
fn negotiator_check(negotiator: &DefaultNegotiator) -> HealthCheck {
    let probe = ItemSet::new(&[7, 4, 1], &[45, 72, 33])
        .and_then(|items| negotiator.propose(&items, None).map(|allocation| (items, allocation)));

    match probe {
        Ok((items, allocation)) if allocation.is_partition_of(items.quantities()) => HealthCheck {
            status: "ready",
            detail: format!(
                "probe proposal kept {} of {} (target fraction {})",
                allocation.self_value,
                allocation.total_value,
                negotiator.target_fraction()
            ),
        },
        Ok(_) => HealthCheck {
            status: "degraded",
            detail: "probe proposal did not partition the item set".to_string(),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("probe proposal failed: {error}") }
        }
    }
}
