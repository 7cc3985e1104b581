pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod openapi;
pub mod seed;
pub mod state;
