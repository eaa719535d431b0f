use std::sync::Arc;
use std::time::Duration;

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use geo::Point;
use saferoute_core::prelude::*;
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::config::ServerConfig;

/// Shared, read-only service state
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<RoadGraph>,
    pub config: Arc<ServerConfig>,
}

/// `POST /route` body, coordinates in the projected CRS of the dataset
#[derive(Debug, Deserialize)]
pub struct RouteBody {
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub k: Option<usize>,
    /// Overrides the length coefficient of the cost model
    pub alpha: Option<f64>,
    /// Overrides the safety coefficient of the cost model
    pub beta: Option<f64>,
}

pub fn app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let max_concurrent = state.config.max_concurrent_requests.max(1);

    Router::new()
        .route("/route", post(route_handler))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .concurrency_limit(max_concurrent)
                .timeout(timeout),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "nodes": state.graph.node_count(),
        "edges": state.graph.edge_count(),
    }))
}

async fn route_handler(State(state): State<AppState>, Json(body): Json<RouteBody>) -> Response {
    let k = body.k.unwrap_or(state.config.default_k);
    let mut config = state.config.router.clone();
    if let Some(alpha) = body.alpha {
        config.cost.length_weight = alpha;
    }
    if let Some(beta) = body.beta {
        config.cost.safety_weight = beta;
    }

    info!(start = ?body.start, end = ?body.end, k, "handling route request");

    let request = RouteRequest::new(
        Point::new(body.start[0], body.start[1]),
        Point::new(body.end[0], body.end[1]),
        k,
    );
    let graph = Arc::clone(&state.graph);
    let search = tokio::task::spawn_blocking(move || {
        let outcome = find_routes(&graph, &config, &request);
        routes_response(&graph, outcome)
    });

    match search.await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "route search task failed");
            problem(StatusCode::INTERNAL_SERVER_ERROR, "internal", &e.to_string())
        }
    }
}

fn routes_response(graph: &RoadGraph, outcome: Result<Vec<RouteResult>, Error>) -> Response {
    match outcome {
        Ok(routes) => {
            info!(routes = routes.len(), "route request answered");
            match routes_to_feature_collection(graph, &routes) {
                Ok(collection) => (StatusCode::OK, Json(collection)).into_response(),
                Err(e) => error_response(&e),
            }
        }
        Err(Error::Timeout { partial }) => {
            warn!(accepted = partial.len(), "route search exceeded its budget");
            let partial = assemble_routes(graph, &partial)
                .and_then(|routes| routes_to_feature_collection(graph, &routes));
            match partial {
                Ok(collection) => (
                    StatusCode::GATEWAY_TIMEOUT,
                    Json(json!({
                        "error": "timeout",
                        "detail": "route search exceeded its budget",
                        "partial": collection,
                    })),
                )
                    .into_response(),
                Err(e) => error_response(&e),
            }
        }
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &Error) -> Response {
    let (status, kind) = match err {
        Error::OutOfRange { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "out_of_range"),
        Error::InvalidParameter(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_parameter"),
        Error::NoRoute(_) => (StatusCode::NOT_FOUND, "no_route"),
        Error::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };
    if status.is_server_error() {
        error!(error = %err, "route request failed");
    } else {
        info!(error = %err, kind, "route request rejected");
    }
    problem(status, kind, &err.to_string())
}

fn problem(status: StatusCode, kind: &str, detail: &str) -> Response {
    (status, Json(json!({ "error": kind, "detail": detail }))).into_response()
}

async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        problem(StatusCode::REQUEST_TIMEOUT, "timeout", "request took too long")
    } else {
        problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            &format!("unhandled internal error: {err}"),
        )
    }
}
