use crate::auth::{SessionAuthenticator, SessionIssuer};
use crate::config::ServerConfig;
use noegle_directory::MemoryDirectory;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<MemoryDirectory>,
    pub config: Arc<ServerConfig>,
    pub issuer: Arc<SessionIssuer>,
    pub authenticator: Arc<SessionAuthenticator>,
}

impl AppState {
    /// Create a new app state. The issuer and authenticator are built from
    /// the same auth config, so they share the signing secret.
    pub fn new(directory: Arc<MemoryDirectory>, config: ServerConfig) -> Self {
        let issuer = SessionIssuer::new(directory.clone(), &config.auth);
        let authenticator = SessionAuthenticator::new(&config.auth);
        Self {
            directory,
            config: Arc::new(config),
            issuer: Arc::new(issuer),
            authenticator: Arc::new(authenticator),
        }
    }
}
