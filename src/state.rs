use crate::client::RemoteClient;
use crate::config::AppConfig;
use crate::session::SessionStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: RemoteClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, client: RemoteClient) -> Self {
        Self {
            config,
            client,
            sessions: SessionStore::new(),
        }
    }
}
