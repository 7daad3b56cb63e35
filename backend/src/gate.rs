//! Service-hours gate.
//!
//! Orders are only taken from midnight until the closing hour, local time.
//! A background task samples the wall clock once a minute and publishes the
//! result through a watch channel; gated endpoints read the last sample, and
//! the status endpoint re-evaluates on demand.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use chrono::{DateTime, Days, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::AppError;
use crate::AppState;

/// Result of one clock sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateSnapshot {
    pub aberto: bool,
    pub hora: u32,
}

/// Snapshot plus the context the closed-notice view renders.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub aberto: bool,
    pub hora: u32,
    pub hora_fechamento: u32,
    pub fuso_horario: String,
    pub reabre_em: Option<DateTime<Tz>>,
}

pub fn aberto_na_hora(hora: u32, hora_fechamento: u32) -> bool {
    hora < hora_fechamento
}

#[derive(Clone)]
pub struct ServiceGate {
    tz: Tz,
    hora_fechamento: u32,
    tx: Arc<watch::Sender<GateSnapshot>>,
}

impl ServiceGate {
    pub fn new(tz: Tz, hora_fechamento: u32) -> Self {
        let inicial = avaliar(Utc::now(), tz, hora_fechamento);
        let (tx, _rx) = watch::channel(inicial);
        ServiceGate {
            tz,
            hora_fechamento,
            tx: Arc::new(tx),
        }
    }

    /// Last sampled state, as read by gated endpoints.
    pub fn is_open(&self) -> bool {
        self.tx.borrow().aberto
    }

    /// Re-reads the clock and publishes the fresh sample.
    pub fn resample(&self) -> GateSnapshot {
        let amostra = avaliar(Utc::now(), self.tz, self.hora_fechamento);
        self.tx.send_replace(amostra);
        amostra
    }

    /// On-demand status (the "refresh" affordance re-evaluates, never caches).
    pub fn status(&self) -> ServiceStatus {
        let agora = Utc::now();
        let amostra = avaliar(agora, self.tz, self.hora_fechamento);
        self.tx.send_replace(amostra);
        ServiceStatus {
            aberto: amostra.aberto,
            hora: amostra.hora,
            hora_fechamento: self.hora_fechamento,
            fuso_horario: self.tz.name().to_string(),
            reabre_em: if amostra.aberto {
                None
            } else {
                proxima_abertura(agora, self.tz)
            },
        }
    }

    /// Samples the clock once a minute for the lifetime of the process.
    pub fn spawn_sampler(&self) {
        let gate = self.clone();
        tokio::spawn(async move {
            let mut intervalo = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                intervalo.tick().await;
                let amostra = gate.resample();
                tracing::debug!(aberto = amostra.aberto, hora = amostra.hora, "gate sampled");
            }
        });
    }
}

fn avaliar(agora: DateTime<Utc>, tz: Tz, hora_fechamento: u32) -> GateSnapshot {
    let local = agora.with_timezone(&tz);
    GateSnapshot {
        aberto: aberto_na_hora(local.hour(), hora_fechamento),
        hora: local.hour(),
    }
}

/// Service reopens at the next local midnight. `None` only when that instant
/// does not exist in the timezone (DST gap), in which case the field is
/// simply omitted from the status payload.
fn proxima_abertura(agora: DateTime<Utc>, tz: Tz) -> Option<DateTime<Tz>> {
    agora
        .with_timezone(&tz)
        .date_naive()
        .checked_add_days(Days::new(1))?
        .and_hms_opt(0, 0, 0)?
        .and_local_timezone(tz)
        .earliest()
}

/// Extractor that rejects the request with 503 while the service is closed.
/// Reads the sampled state; it never blocks on the clock.
pub struct ServiceOpen;

#[async_trait]
impl<S> FromRequestParts<S> for ServiceOpen
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        if app_state.gate.is_open() {
            Ok(ServiceOpen)
        } else {
            Err(AppError::ServiceClosed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Sao_Paulo;

    #[test]
    fn aberto_somente_antes_do_fechamento() {
        assert!(aberto_na_hora(0, 17));
        assert!(aberto_na_hora(16, 17));
        assert!(!aberto_na_hora(17, 17));
        assert!(!aberto_na_hora(23, 17));
    }

    #[test]
    fn avaliacao_usa_a_hora_local() {
        // 19:30 UTC is 16:30 in São Paulo (UTC-3): still open at closing 17.
        let agora = Utc.with_ymd_and_hms(2026, 8, 7, 19, 30, 0).unwrap();
        let amostra = avaliar(agora, Sao_Paulo, 17);
        assert_eq!(amostra, GateSnapshot { aberto: true, hora: 16 });

        // One hour later it is 17:30 local: closed.
        let agora = Utc.with_ymd_and_hms(2026, 8, 7, 20, 30, 0).unwrap();
        let amostra = avaliar(agora, Sao_Paulo, 17);
        assert_eq!(amostra, GateSnapshot { aberto: false, hora: 17 });
    }

    #[test]
    fn reabre_na_proxima_meia_noite_local() {
        let agora = Utc.with_ymd_and_hms(2026, 8, 7, 20, 30, 0).unwrap();
        let reabre = proxima_abertura(agora, Sao_Paulo).unwrap();
        assert_eq!(reabre.to_rfc3339(), "2026-08-08T00:00:00-03:00");
    }

    #[test]
    fn gate_construido_fechado_rejeita() {
        // Closing hour 0 never opens, 24 never closes.
        let fechado = ServiceGate::new(Sao_Paulo, 0);
        assert!(!fechado.is_open());
        let aberto = ServiceGate::new(Sao_Paulo, 24);
        assert!(aberto.is_open());
    }
}
