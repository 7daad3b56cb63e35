use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    despacho::{compose, Despacho, DespachoEntrada},
    error::{AppError, Result},
    gate::ServiceOpen,
    notify::Handoff,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub token: String,
    pub mensagem: String,
    pub link: String,
    pub encaminhado: bool,
}

/// One-shot submission: the whole request in a single payload, normalized
/// through the same formatters the session reducer applies per keystroke.
pub async fn create(
    _gate: ServiceOpen,
    State(state): State<AppState>,
    Json(entrada): Json<DespachoEntrada>,
) -> Result<Json<SubmitResponse>> {
    let despacho = Despacho::montar(entrada);
    despacho.validar().map_err(AppError::Validation)?;

    let token = compose::gerar_token();
    let mensagem = compose::compor_mensagem(&despacho, &token);
    let link = compose::link_whatsapp(&state.supervisor_phone, &mensagem);

    let encaminhado = state
        .notifier
        .forward(&Handoff {
            token: &token,
            modo: despacho.modo,
            mensagem: &mensagem,
            link: &link,
        })
        .await;

    tracing::info!(%token, modo = despacho.modo.rotulo(), "despacho submitted");
    Ok(Json(SubmitResponse {
        token,
        mensagem,
        link,
        encaminhado,
    }))
}
