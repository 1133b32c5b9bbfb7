use crate::core::domain::value_object::{
    ProxmoxApiToken, ProxmoxPassword, ProxmoxRealm, ProxmoxUrl, ProxmoxUsername,
};

/// How the client proves its identity to the server.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Ticket login with a username, password and realm.
    Password {
        username: ProxmoxUsername,
        password: ProxmoxPassword,
        realm: ProxmoxRealm,
    },
    /// A pre-issued API token; no login round trip is needed.
    ApiToken(ProxmoxApiToken),
}

/// Everything needed to reach and authenticate against one Proxmox server.
#[derive(Debug, Clone)]
pub struct ProxmoxConnection {
    credentials: Credentials,
    accept_invalid_certs: bool,
    url: ProxmoxUrl,
}

impl ProxmoxConnection {
    pub fn new(credentials: Credentials, accept_invalid_certs: bool, url: ProxmoxUrl) -> Self {
        Self {
            credentials,
            accept_invalid_certs,
            url,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Whether self-signed certificates are accepted.
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Base URL of the server.
    pub fn url(&self) -> &ProxmoxUrl {
        &self.url
    }
}
