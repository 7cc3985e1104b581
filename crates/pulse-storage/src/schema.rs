use rusqlite::Connection;

use crate::error::Result;

const CHANNELS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS channels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE,
    spend REAL,
    impressions INTEGER,
    clicks INTEGER,
    conversions INTEGER,
    revenue REAL,
    ctr REAL,
    cpc REAL,
    roas REAL,
    cpa REAL,
    cvr REAL
);
";

const MONTHLY_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS monthly_performance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    month TEXT UNIQUE,
    spend REAL,
    revenue REAL,
    conversions INTEGER
);
";

// `channel` is a free-text label; there is deliberately no REFERENCES clause.
const CAMPAIGNS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS campaigns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    channel TEXT,
    campaign_name TEXT,
    spend REAL,
    impressions INTEGER,
    clicks INTEGER,
    conversions INTEGER,
    revenue REAL,
    roas REAL,
    cpa REAL
);
";

const INSIGHTS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS insights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT
);
";

const SUMMARY_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS summary (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_spend REAL,
    total_revenue REAL,
    total_conversions INTEGER,
    overall_roas REAL
);
";

/// Table names in load order. Clearing and inserting follow this order.
pub const TABLES: [&str; 5] = [
    "channels",
    "monthly_performance",
    "campaigns",
    "insights",
    "summary",
];

/// Applies connection pragmas and creates any missing table. Safe to run on
/// every open.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    for ddl in [
        CHANNELS_SCHEMA,
        MONTHLY_SCHEMA,
        CAMPAIGNS_SCHEMA,
        INSIGHTS_SCHEMA,
        SUMMARY_SCHEMA,
    ] {
        conn.execute_batch(ddl)?;
    }
    tracing::debug!(tables = TABLES.len(), "Database schema ready");
    Ok(())
}
