use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    despacho::{
        compose,
        form::{FormEvent, FormState},
    },
    error::{AppError, Result},
    gate::ServiceOpen,
    notify::Handoff,
    store::SessionStore,
    AppState,
};

use super::despachos::SubmitResponse;

/// Session id plus the full form state, as rendered by the client.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    #[serde(flatten)]
    pub form: FormState,
}

/// Form mount: a fresh session with blank defaults. Gated on service hours,
/// like the original screen swap on the closed notice.
pub async fn create(
    _gate: ServiceOpen,
    State(store): State<SessionStore>,
) -> Result<Json<SessionView>> {
    let (id, form) = store.create()?;
    tracing::info!(%id, "despacho session created");
    Ok(Json(SessionView { id, form }))
}

pub async fn get_one(
    State(store): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let form = store
        .get(&id)?
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;
    Ok(Json(SessionView { id, form }))
}

/// Applies one form event (a field write, a mode switch, or an item
/// operation) and returns the resulting state.
pub async fn apply_event(
    State(store): State<SessionStore>,
    Path(id): Path<Uuid>,
    Json(evento): Json<FormEvent>,
) -> Result<Json<SessionView>> {
    let (resultado, form) = store
        .update(&id, |form| {
            let resultado = form.aplicar(evento);
            (resultado, form.clone())
        })?
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;

    resultado?;
    Ok(Json(SessionView { id, form }))
}

/// Submission flow: mark submitted, validate, compose, hand off, reset.
///
/// On validation failure the session keeps `enviado = true` and is left
/// otherwise untouched so the user can correct the flagged fields. On success
/// the session is reset to blank defaults before the response goes out.
pub async fn submit(
    _gate: ServiceOpen,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>> {
    let telefone = state.supervisor_phone.clone();

    let desfecho = state
        .store
        .update(&id, |form| {
            form.enviado = true;
            let despacho = form.finalizar();
            match despacho.validar() {
                Err(erros) => Err(erros),
                Ok(()) => {
                    let token = form.token.clone();
                    let mensagem = compose::compor_mensagem(&despacho, &token);
                    let link = compose::link_whatsapp(&telefone, &mensagem);
                    let modo = despacho.modo;
                    *form = FormState::new();
                    Ok((token, modo, mensagem, link))
                }
            }
        })?
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;

    let (token, modo, mensagem, link) = desfecho.map_err(AppError::Validation)?;

    // Outside the store lock: the forward is awaited but never blocks state.
    let encaminhado = state
        .notifier
        .forward(&Handoff {
            token: &token,
            modo,
            mensagem: &mensagem,
            link: &link,
        })
        .await;

    tracing::info!(%token, modo = modo.rotulo(), "despacho submitted");
    Ok(Json(SubmitResponse {
        token,
        mensagem,
        link,
        encaminhado,
    }))
}

/// Form unmount: the state is discarded, never persisted.
pub async fn discard(
    State(store): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    if !store.remove(&id)? {
        return Err(AppError::NotFound("Session not found".into()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
