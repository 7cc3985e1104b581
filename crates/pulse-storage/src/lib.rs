//! Relational store for precomputed marketing metrics.
//!
//! The default implementation ([`engine::SqliteMarketingStore`]) keeps the
//! five tables (`channels`, `monthly_performance`, `campaigns`, `insights`,
//! `summary`) in a single SQLite file. Loading replaces every table wholesale;
//! everything else is a read.

pub mod engine;
pub mod error;
pub mod query;
pub mod schema;


pub use engine::SqliteMarketingStore;
pub use error::{Result, StorageError};
pub use query::{CampaignFilter, ChannelSort, ChannelSortColumn, MinRoas, SortOrder};

use pulse_common::types::{Campaign, Channel, MonthlyPerformance, SeedDocument, Summary};

/// Persistence backend for the dashboard metrics.
///
/// Implementations must be `Send + Sync`: one handle is created at startup
/// and shared by every HTTP handler.
pub trait MarketingStore: Send + Sync {
    /// Creates any missing table. Idempotent.
    fn init_schema(&self) -> Result<()>;

    /// Clears all five tables and inserts the document's rows in input order.
    ///
    /// Not atomic: if an insert fails, tables already processed keep their
    /// new contents and the remaining ones stay cleared.
    fn load_document(&self, doc: &SeedDocument) -> Result<LoadReport>;

    /// The summary singleton, or `None` when nothing has been loaded.
    fn summary(&self) -> Result<Option<Summary>>;

    fn list_channels(&self, sort: ChannelSort) -> Result<Vec<Channel>>;

    /// Monthly rows ordered by the month label (lexicographic).
    fn list_monthly(&self) -> Result<Vec<MonthlyPerformance>>;

    /// Campaigns matching `filter`, highest ROAS first.
    fn list_campaigns(&self, filter: &CampaignFilter) -> Result<Vec<Campaign>>;

    /// Insight strings in insertion order.
    fn list_insights(&self) -> Result<Vec<String>>;

    /// Row count per table, in load order.
    fn table_counts(&self) -> Result<Vec<(&'static str, u64)>>;
}

/// Rows inserted per table by one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub channels: usize,
    pub monthly: usize,
    pub campaigns: usize,
    pub insights: usize,
}
