//! Request handlers.

use crate::{ApiError, ServiceState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cw_types::PrefetchRequest;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// `POST /api/prefetch`.
///
/// Returns 400 for an undecodable body or a missing field, 200 when the
/// dedup registry leaves nothing to do, and 202 once the run is handed to a
/// detached task. The response never waits on the pipeline, and success
/// bodies are empty - after the 202, progress is visible only in logs.
pub async fn prefetch_handler(
    State(state): State<Arc<ServiceState>>,
    payload: Result<Json<PrefetchRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::Json(rejection.body_text()))?;
    request.validate().map_err(ApiError::Validation)?;

    let new_columns =
        state
            .registry
            .filter_new_columns(&request.bucket, &request.prefix, &request.columns);

    if new_columns.is_empty() {
        debug!(
            bucket = %request.bucket,
            prefix = %request.prefix,
            "All requested columns already dispatched"
        );
        return Ok(StatusCode::OK);
    }

    info!(
        bucket = %request.bucket,
        prefix = %request.prefix,
        columns = ?new_columns,
        "Dispatching prefetch run"
    );

    let engine = state.engine.clone();
    let deadline = state.prefetch_deadline;
    let run = PrefetchRequest {
        bucket: request.bucket,
        prefix: request.prefix,
        columns: new_columns,
    };

    // Detached on purpose: the run lives under its own deadline, not under
    // the inbound connection, so a client disconnect does not abort it.
    tokio::spawn(async move {
        let cancel = CancellationToken::new();
        let watchdog = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                cancel.cancel();
            })
        };

        let started = Instant::now();
        if let Err(e) = engine.prefetch(run, cancel).await {
            error!(error = %e, "Prefetch run failed");
        }
        info!(
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Prefetch run finished"
        );

        watchdog.abort();
    });

    Ok(StatusCode::ACCEPTED)
}
