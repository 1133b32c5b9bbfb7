pub mod api_client;
pub mod proxmox_api;
