pub mod access;
pub mod client_config;
pub mod cluster_resource;
pub mod guest;
pub mod node_list_item;
pub mod node_status;
pub mod proxmox_auth;
pub mod proxmox_connection;
pub mod task;
