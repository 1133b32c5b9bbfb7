use crate::core::{
    domain::model::client_config::ClientConfig, infrastructure::proxmox_api::ProxmoxApi,
};
use std::sync::Arc;

/// The transport handle and settings shared by every accessor and
/// collection created from one manager.
#[derive(Clone)]
pub struct ResourceContext {
    api: Arc<dyn ProxmoxApi>,
    config: Arc<ClientConfig>,
}

impl ResourceContext {
    pub fn new(api: Arc<dyn ProxmoxApi>, config: Arc<ClientConfig>) -> Self {
        Self { api, config }
    }

    /// Uses the default [`ClientConfig`].
    pub fn from_api(api: Arc<dyn ProxmoxApi>) -> Self {
        Self::new(api, Arc::new(ClientConfig::default()))
    }

    pub fn api(&self) -> &dyn ProxmoxApi {
        self.api.as_ref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for ResourceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
