mod proxmox_api_token;
mod proxmox_csrf_token;
mod proxmox_host;
mod proxmox_password;
mod proxmox_port;
pub(crate) mod proxmox_realm;
mod proxmox_ticket;
mod proxmox_uri;
mod proxmox_username;
pub(crate) mod serde_helpers;
mod user_id;
mod vmid;

pub use proxmox_api_token::ProxmoxApiToken;
pub use proxmox_csrf_token::ProxmoxCSRFToken;
pub use proxmox_host::ProxmoxHost;
pub use proxmox_password::{MIN_PASSWORD_LENGTH, ProxmoxPassword};
pub use proxmox_port::{DEFAULT_PORT, ProxmoxPort};
pub use proxmox_realm::{DEFAULT_REALM, KNOWN_REALMS, ProxmoxRealm};
pub use proxmox_ticket::ProxmoxTicket;
pub use proxmox_uri::ProxmoxUrl;
pub use proxmox_username::ProxmoxUsername;
pub use user_id::UserId;
pub use vmid::Vmid;
