use crate::gate::SessionState;
use axum::http::{header, HeaderMap};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "ipr_session";

// Only sessions that passed the gate are kept.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: Option<Uuid>) -> SessionState {
        let Some(id) = id else {
            return SessionState::default();
        };
        let sessions = self.sessions.lock().await;
        sessions.get(&id).cloned().unwrap_or_default()
    }

    pub async fn update<R>(
        &self,
        id: Option<Uuid>,
        apply: impl FnOnce(&mut SessionState) -> R,
    ) -> (Option<Uuid>, R) {
        let mut sessions = self.sessions.lock().await;
        let known = id.filter(|id| sessions.contains_key(id));
        let mut session = known
            .and_then(|id| sessions.get(&id).cloned())
            .unwrap_or_default();
        let result = apply(&mut session);

        if known.is_none() && !session.is_authenticated() {
            return (None, result);
        }
        let id = known.unwrap_or_else(Uuid::new_v4);
        sessions.insert(id, session);
        (Some(id), result)
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Strict")
}
