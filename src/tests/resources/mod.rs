mod cluster_tests;
mod container_tests;
mod node_tests;
mod user_tests;
mod vm_tests;
