// Library exports for laboissim
// This allows integration tests and the binary to share the client modules

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod views;
