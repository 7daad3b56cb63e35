//! In-memory form session store.
//!
//! Sessions are ephemeral by design: nothing is persisted, and a sweeper task
//! evicts sessions that sat idle past the TTL (abandoned forms).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use uuid::Uuid;

use crate::despacho::form::FormState;

struct Entrada {
    form: FormState,
    tocada: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entrada>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Fresh form with blank defaults; returns its id and initial state.
    pub fn create(&self) -> anyhow::Result<(Uuid, FormState)> {
        let id = Uuid::new_v4();
        let form = FormState::new();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| anyhow!("session lock poisoned: {e}"))?;
        sessions.insert(
            id,
            Entrada {
                form: form.clone(),
                tocada: Instant::now(),
            },
        );
        Ok((id, form))
    }

    pub fn get(&self, id: &Uuid) -> anyhow::Result<Option<FormState>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| anyhow!("session lock poisoned: {e}"))?;
        Ok(sessions.get(id).map(|s| s.form.clone()))
    }

    /// Runs a closure against the session's form under the write lock,
    /// refreshing its idle timer. `None` when the session is unknown.
    pub fn update<T>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut FormState) -> T,
    ) -> anyhow::Result<Option<T>> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| anyhow!("session lock poisoned: {e}"))?;
        Ok(sessions.get_mut(id).map(|entrada| {
            entrada.tocada = Instant::now();
            f(&mut entrada.form)
        }))
    }

    pub fn remove(&self, id: &Uuid) -> anyhow::Result<bool> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| anyhow!("session lock poisoned: {e}"))?;
        Ok(sessions.remove(id).is_some())
    }

    /// Drops sessions idle past the TTL; returns how many were evicted.
    pub fn sweep(&self) -> anyhow::Result<usize> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| anyhow!("session lock poisoned: {e}"))?;
        let antes = sessions.len();
        sessions.retain(|_, entrada| entrada.tocada.elapsed() < self.ttl);
        Ok(antes - sessions.len())
    }

    /// Sweeps once a minute for the lifetime of the process.
    pub fn spawn_sweeper(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            let mut intervalo = tokio::time::interval(Duration::from_secs(60));
            loop {
                intervalo.tick().await;
                match store.sweep() {
                    Ok(0) => {}
                    Ok(n) => tracing::debug!(evicted = n, "idle sessions evicted"),
                    Err(e) => tracing::warn!("session sweep failed: {e}"),
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::despacho::Modo;

    #[test]
    fn create_get_update_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, form) = store.create().unwrap();
        assert_eq!(form.modo, Modo::Adicionar);

        let lida = store.get(&id).unwrap().unwrap();
        assert_eq!(lida.token, form.token);

        let pedido = store
            .update(&id, |form| {
                form.pedido = "123".to_string();
                form.pedido.clone()
            })
            .unwrap()
            .unwrap();
        assert_eq!(pedido, "123");

        assert!(store.remove(&id).unwrap());
        assert!(store.get(&id).unwrap().is_none());
        assert!(!store.remove(&id).unwrap());
    }

    #[test]
    fn update_de_sessao_desconhecida_e_none() {
        let store = SessionStore::new(Duration::from_secs(60));
        let resultado = store.update(&Uuid::new_v4(), |_| ()).unwrap();
        assert!(resultado.is_none());
    }

    #[test]
    fn sweep_evicta_sessoes_ociosas() {
        let store = SessionStore::new(Duration::ZERO);
        store.create().unwrap();
        store.create().unwrap();
        assert_eq!(store.sweep().unwrap(), 2);

        let viva = SessionStore::new(Duration::from_secs(3600));
        let (id, _) = viva.create().unwrap();
        assert_eq!(viva.sweep().unwrap(), 0);
        assert!(viva.get(&id).unwrap().is_some());
    }
}
