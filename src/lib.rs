pub mod config;
pub mod domain;
pub mod forms;
pub mod images;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role that may manage the tag list and the ingredient catalogue.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
