//! Offline precomputation step: reads a raw advertising spend export (CSV),
//! rolls it up per channel, month and campaign, derives the efficiency ratios,
//! drafts the strategic insights and writes the seed document consumed by
//! `pulse-server seed`.

pub mod analyzer;
pub mod error;
pub mod insights;

pub use analyzer::{export_summary, MarketingAnalytics, SpendRecord};
pub use error::{AnalyticsError, Result};
