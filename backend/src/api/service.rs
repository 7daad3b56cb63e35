use axum::{extract::State, Json};

use crate::gate::{ServiceGate, ServiceStatus};

/// Current service-hours state. Re-evaluates the clock on every call, so the
/// closed page's "refresh" button always sees a fresh answer.
pub async fn status(State(gate): State<ServiceGate>) -> Json<ServiceStatus> {
    Json(gate.status())
}
