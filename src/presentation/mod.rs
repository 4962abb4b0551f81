// Presentation layer - CLI, views and rendering
pub mod app_state;
pub mod cli;
pub mod handlers;
pub mod render;
pub mod routes;
