pub mod container;
pub mod guest;
pub mod node;
pub mod user;
pub mod vm;
