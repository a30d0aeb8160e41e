//! Negotiation routes.
//!
//! JSON API Endpoints:
//! - `POST /negotiate` : tagged request (`action`: PROPOSE | ACCEPT_OR_REJECT)
//! - `POST /propose`   : proposal request without the tag
//! - `POST /evaluate`  : offer evaluation request without the tag
//! - `POST /message`   : free text carrying a JSON observation
//!
//! Bodies are read as raw text and decoded here, so every failure answers
//! with the same WALK payload instead of the extractor's default rejection.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use bargainer_core::protocol::{accept_or_reject, propose};
use bargainer_core::{
    handle_message, handle_request, parse_request, AcceptOrRejectRequest, ConfigurationError,
    DefaultNegotiator, InterfaceError, ProposeRequest,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const WALK_ACTION: &str = "WALK";

#[derive(Clone)]
pub struct NegotiationState {
    negotiator: Arc<DefaultNegotiator>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalkResponse {
    pub error: String,
    pub action: String,
    pub correlation_id: String,
}

type Rejection = (StatusCode, Json<WalkResponse>);
type RouteResult = Result<Json<Value>, Rejection>;

pub fn router(negotiator: Arc<DefaultNegotiator>) -> Router {
    Router::new()
        .route("/negotiate", post(negotiate))
        .route("/propose", post(propose_route))
        .route("/evaluate", post(evaluate_route))
        .route("/message", post(message_route))
        .with_state(NegotiationState { negotiator })
}

async fn negotiate(State(state): State<NegotiationState>, body: String) -> RouteResult {
    let correlation_id = Uuid::new_v4().to_string();

    let request = serde_json::from_str(&body)
        .map_err(|error| ConfigurationError::Malformed(error.to_string()))
        .and_then(parse_request)
        .map_err(|error| reject("/negotiate", error, &correlation_id))?;

    let response = handle_request(&*state.negotiator, &request)
        .map_err(|error| reject("/negotiate", error, &correlation_id))?;

    info!(
        event_name = "negotiation.request.completed",
        correlation_id = %correlation_id,
        action = request.action(),
        "negotiation request handled"
    );
    respond("/negotiate", &response, &correlation_id)
}

async fn propose_route(State(state): State<NegotiationState>, body: String) -> RouteResult {
    let correlation_id = Uuid::new_v4().to_string();

    let response = decode::<ProposeRequest>(&body)
        .and_then(|request| propose(&*state.negotiator, &request))
        .map_err(|error| reject("/propose", error, &correlation_id))?;

    info!(
        event_name = "negotiation.propose.completed",
        correlation_id = %correlation_id,
        items = response.allocation_self.len(),
        "proposal produced"
    );
    respond("/propose", &response, &correlation_id)
}

async fn evaluate_route(State(state): State<NegotiationState>, body: String) -> RouteResult {
    let correlation_id = Uuid::new_v4().to_string();

    let response = decode::<AcceptOrRejectRequest>(&body)
        .and_then(|request| accept_or_reject(&*state.negotiator, &request))
        .map_err(|error| reject("/evaluate", error, &correlation_id))?;

    info!(
        event_name = "negotiation.evaluate.completed",
        correlation_id = %correlation_id,
        verdict = %response.action,
        "offer evaluated"
    );
    respond("/evaluate", &response, &correlation_id)
}

async fn message_route(State(state): State<NegotiationState>, body: String) -> RouteResult {
    let correlation_id = Uuid::new_v4().to_string();

    let response = handle_message(&*state.negotiator, &body)
        .map_err(|error| reject("/message", error, &correlation_id))?;

    info!(
        event_name = "negotiation.message.completed",
        correlation_id = %correlation_id,
        message_bytes = body.len(),
        "negotiation message handled"
    );
    respond("/message", &response, &correlation_id)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ConfigurationError> {
    serde_json::from_str(body).map_err(|error| ConfigurationError::Malformed(error.to_string()))
}

fn respond(route: &'static str, response: &impl Serialize, correlation_id: &str) -> RouteResult {
    serde_json::to_value(response).map(Json).map_err(|source| {
        error!(
            event_name = "negotiation.response.serialization_failed",
            correlation_id = %correlation_id,
            route,
            error = %source,
            "response could not be encoded"
        );
        walk(InterfaceError::internal(source.to_string(), correlation_id))
    })
}

fn reject(route: &'static str, error: ConfigurationError, correlation_id: &str) -> Rejection {
    warn!(
        event_name = "negotiation.request.rejected",
        correlation_id = %correlation_id,
        route,
        error = %error,
        "request rejected"
    );
    walk(error.into_interface(correlation_id))
}

fn walk(error: InterfaceError) -> Rejection {
    let user_message = error.user_message();
    let (status, message, correlation_id) = match error {
        InterfaceError::BadRequest { message, correlation_id } => {
            (StatusCode::BAD_REQUEST, message, correlation_id)
        }
        // internal detail stays in the logs
        InterfaceError::Internal { correlation_id, .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, user_message.to_string(), correlation_id)
        }
    };

    (status, Json(WalkResponse { error: message, action: WALK_ACTION.to_string(), correlation_id }))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::State,
        http::{Request, StatusCode},
        Json,
    };
    use bargainer_core::{AspirationNegotiator, InterfaceError};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{
        evaluate_route, negotiate, propose_route, respond, router, walk, NegotiationState,
        WalkResponse,
    };

    fn state() -> State<NegotiationState> {
        State(NegotiationState { negotiator: Arc::new(AspirationNegotiator::default()) })
    }

    async fn post_json(uri: &str, body: String) -> (StatusCode, Value) {
        let app = router(Arc::new(AspirationNegotiator::default()));
        let response = app
            .oneshot(Request::builder().method("POST").uri(uri).body(Body::from(body)).expect("request"))
            .await
            .expect("router should respond");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn negotiate_routes_propose_action() {
        let body = json!({
            "action": "PROPOSE",
            "quantities": [7, 4, 1],
            "valuations_self": [45, 72, 33],
            "batna_self": 100
        })
        .to_string();

        let Json(response) = negotiate(state(), body).await.expect("should succeed");
        assert_eq!(response["allocation_self"], json!([5, 4, 0]));
        assert_eq!(response["allocation_other"], json!([2, 0, 1]));
    }

    #[tokio::test]
    async fn evaluate_returns_verdict_payload() {
        let body = json!({"offer_value": 150, "batna_value": 100, "counter_value": 160}).to_string();

        let Json(response) = evaluate_route(state(), body).await.expect("should succeed");
        assert_eq!(response["accept"], true);
        assert_eq!(response["action"], "ACCEPT");
    }

    #[tokio::test]
    async fn propose_rejects_mismatched_lengths_with_walk() {
        let body = json!({"quantities": [7, 4], "valuations_self": [45]}).to_string();

        let (status, Json(payload)) = propose_route(state(), body).await.expect_err("should fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload.action, "WALK");
        assert!(payload.error.contains("valuations_self"));
        assert!(!payload.correlation_id.is_empty());
    }

    #[tokio::test]
    async fn router_serves_tolerance_band_verdicts() {
        let (status, payload) = post_json(
            "/negotiate",
            json!({"action": "ACCEPT_OR_REJECT", "offer_value": 151, "batna_value": 160, "counter_value": 160})
                .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["accept"], false);
        assert_eq!(payload["action"], "REJECT");
        assert!(payload["reason"].as_str().unwrap_or_default().contains("151"));
    }

    #[tokio::test]
    async fn router_extracts_observation_from_message() {
        let message = "Your turn.\n```json\n{\"action\": \"ACCEPT_OR_REJECT\", \"offer_value\": 153, \"batna_value\": 160, \"counter_value\": 160}\n```";

        let (status, payload) = post_json("/message", message.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["accept"], true);
        assert_eq!(payload["action"], "ACCEPT");
    }

    #[tokio::test]
    async fn router_answers_invalid_json_with_walk() {
        let (status, payload) = post_json("/negotiate", "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["action"], "WALK");
        assert!(payload["error"].as_str().unwrap_or_default().starts_with("malformed request"));
    }

    #[tokio::test]
    async fn router_rejects_negative_values() {
        let (status, payload) = post_json(
            "/evaluate",
            json!({"offer_value": -1, "batna_value": 160, "counter_value": 160}).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "offer_value must be >= 0, got -1");
    }

    #[test]
    fn internal_errors_hide_details() {
        let (status, Json(WalkResponse { error, action, correlation_id })) =
            walk(InterfaceError::internal("stack trace", "req-9"));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(action, "WALK");
        assert_eq!(correlation_id, "req-9");
        assert!(!error.contains("stack trace"));
    }

    #[test]
    fn unencodable_response_answers_internal_walk() {
        // JSON object keys must be strings
        let response = BTreeMap::from([((1_u8, 2_u8), "pair")]);

        let (status, Json(payload)) =
            respond("/propose", &response, "req-11").expect_err("tuple keys cannot be encoded");

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload.action, "WALK");
        assert_eq!(payload.correlation_id, "req-11");
        assert_eq!(payload.error, "An unexpected internal error occurred.");
    }
}
