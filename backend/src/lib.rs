pub mod api;
pub mod config;
pub mod despacho;
pub mod error;
pub mod gate;
pub mod notify;
pub mod store;

use gate::ServiceGate;
use notify::Notifier;
use store::SessionStore;

/// Shared application state available to all handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub gate: ServiceGate,
    pub notifier: Notifier,
    pub supervisor_phone: String,
}

impl axum::extract::FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl axum::extract::FromRef<AppState> for ServiceGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}
