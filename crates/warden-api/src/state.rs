use std::sync::Arc;
use warden_auth::RequestAuthenticator;
use warden_store::Store;

/// Shared state handed to every handler and the auth middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub authenticator: Arc<RequestAuthenticator>,
}

impl AppState {
    pub fn new(store: Arc<Store>, authenticator: RequestAuthenticator) -> Self {
        Self {
            store,
            authenticator: Arc::new(authenticator),
        }
    }
}
