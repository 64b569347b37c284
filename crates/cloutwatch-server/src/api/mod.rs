use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, Method},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use cloutwatch_pipeline::run_pipeline;
use cloutwatch_twitch::TwitchClient;

use crate::middleware::{request_id, RequestId};

/// Default follower threshold when the caller omits `minimum` or sends a
/// non-numeric value.
const DEFAULT_MINIMUM_FOLLOWERS: u64 = 1_000;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<TwitchClient>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChannelQuery {
    minimum: Option<String>,
}

/// Parses the caller-supplied threshold, falling back to the default on a
/// missing or non-numeric value.
pub(super) fn normalize_minimum(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MINIMUM_FOLLOWERS)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/{channel}", get(channel_chatters))
        .route("/{channel}/", get(channel_chatters))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn root() -> &'static str {
    "Yo"
}

/// Runs the pipeline for one channel and renders the qualifying accounts.
///
/// Every path answers 200: success is a JSON array (possibly empty), a fatal
/// pipeline failure is an opaque text message, and a blank channel segment is
/// rejected before any upstream call is made.
async fn channel_chatters(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(channel): Path<String>,
    Query(query): Query<ChannelQuery>,
) -> Response {
    if channel.trim().is_empty() {
        return "Must specify channel.".into_response();
    }

    let minimum = normalize_minimum(query.minimum.as_deref());

    match run_pipeline(&state.client, &channel, minimum).await {
        Ok(report) => Json(report.qualifying).into_response(),
        Err(e) => {
            tracing::error!(
                request_id = %req_id.0,
                channel,
                minimum,
                error = %e,
                "pipeline invocation failed"
            );
            "No chatters.".into_response()
        }
    }
}
