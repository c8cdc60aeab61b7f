use crate::api::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        PrometheusHandle::render,
    )
}

/// How a catalog request ended, as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    NotFound,
    Conflict,
    Invalid,
    Failed,
}

impl Outcome {
    fn from_status(status: StatusCode) -> Self {
        match status {
            s if s.is_server_error() => Self::Failed,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            s if s.is_client_error() => Self::Invalid,
            _ => Self::Ok,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Invalid => "invalid",
            Self::Failed => "failed",
        }
    }
}

/// Route template for metric labels. Unmatched paths collapse into one label.
fn route_label(matched: Option<&MatchedPath>) -> String {
    matched.map_or_else(|| "unmatched".to_string(), |m| m.as_str().to_string())
}

/// Runs each request inside a span tagged with a fresh request id, then
/// records `http_requests_total` / `http_request_duration_seconds` per route
/// template and outcome.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let route = route_label(req.extensions().get::<MatchedPath>());

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %req.uri().path(),
        route = %route,
    );

    async move {
        let response = next.run(req).await;
        let elapsed = start.elapsed();
        let status = response.status();
        let outcome = Outcome::from_status(status);

        let labels = [
            ("method", method.to_string()),
            ("route", route),
            ("outcome", outcome.as_str().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if outcome == Outcome::Failed {
            warn!(
                event = "http_request_finished",
                duration_ms,
                status_code = status.as_u16(),
                outcome = outcome.as_str(),
                "Request failed"
            );
        } else {
            info!(
                event = "http_request_finished",
                duration_ms,
                status_code = status.as_u16(),
                outcome = outcome.as_str(),
                "Request finished"
            );
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_status() {
        assert_eq!(Outcome::from_status(StatusCode::CREATED), Outcome::Ok);
        assert_eq!(Outcome::from_status(StatusCode::NO_CONTENT), Outcome::Ok);
        assert_eq!(Outcome::from_status(StatusCode::NOT_FOUND), Outcome::NotFound);
        assert_eq!(Outcome::from_status(StatusCode::CONFLICT), Outcome::Conflict);
        assert_eq!(
            Outcome::from_status(StatusCode::UNPROCESSABLE_ENTITY),
            Outcome::Invalid
        );
        assert_eq!(
            Outcome::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            Outcome::Failed
        );
    }

    #[test]
    fn test_unmatched_route_label() {
        assert_eq!(route_label(None), "unmatched");
    }
}
