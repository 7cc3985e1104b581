//! Static HTML rendition of the marketing dashboard.
//!
//! [`client::DashboardClient`] pulls the four read endpoints concurrently and
//! [`render::render_dashboard`] turns the result into a standalone page.

pub mod client;
pub mod error;
pub mod render;
pub mod view;

pub use client::{DashboardClient, DashboardData, DEFAULT_API_BASE};
pub use error::{ClientError, Result};
pub use render::render_dashboard;
