use crate::error::Result;
use crate::query::{CampaignFilter, ChannelSort};
use crate::schema::{self, TABLES};
use crate::{LoadReport, MarketingStore};
use pulse_common::types::{Campaign, Channel, MonthlyPerformance, SeedDocument, Summary};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed marketing store holding a single connection.
///
/// Each operation locks the connection for its duration, so calls are
/// serialized; SQLite itself serializes writers on the file.
pub struct SqliteMarketingStore {
    conn: Mutex<Connection>,
}

impl SqliteMarketingStore {
    /// Opens (creating if needed) the database file and ensures the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        schema::init_schema(&conn)?;
        tracing::info!(path = %path.display(), "Opened marketing store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the connection, recovering from a poisoned Mutex if necessary.
    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MarketingStore for SqliteMarketingStore {
    fn init_schema(&self) -> Result<()> {
        schema::init_schema(&self.lock_conn())
    }

    fn load_document(&self, doc: &SeedDocument) -> Result<LoadReport> {
        let conn = self.lock_conn();

        // Each statement autocommits: a failure below leaves whatever was
        // already cleared or inserted in place.
        for table in TABLES {
            conn.execute(&format!("DELETE FROM {table}"), [])?;
        }

        let mut report = LoadReport::default();

        {
            let mut stmt = conn.prepare_cached(
                "INSERT INTO channels (name, spend, impressions, clicks, conversions, revenue, ctr, cpc, roas, cpa, cvr)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for ch in &doc.channels {
                stmt.execute(params![
                    &ch.channel,
                    ch.spend,
                    ch.impressions,
                    ch.clicks,
                    ch.conversions,
                    ch.revenue,
                    ch.ctr,
                    ch.cpc,
                    ch.roas,
                    ch.cpa,
                    ch.cvr,
                ])?;
                report.channels += 1;
            }
        }

        {
            let mut stmt = conn.prepare_cached(
                "INSERT INTO monthly_performance (month, spend, revenue, conversions) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for m in &doc.monthly_performance {
                stmt.execute(params![&m.month, m.spend, m.revenue, m.conversions])?;
                report.monthly += 1;
            }
        }

        {
            let mut stmt = conn.prepare_cached(
                "INSERT INTO campaigns (channel, campaign_name, spend, impressions, clicks, conversions, revenue, roas, cpa)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for c in &doc.campaigns {
                stmt.execute(params![
                    &c.channel,
                    &c.campaign_name,
                    c.spend,
                    c.impressions,
                    c.clicks,
                    c.conversions,
                    c.revenue,
                    c.roas,
                    c.cpa,
                ])?;
                report.campaigns += 1;
            }
        }

        {
            let mut stmt = conn.prepare_cached("INSERT INTO insights (content) VALUES (?1)")?;
            for insight in &doc.insights {
                stmt.execute(params![insight])?;
                report.insights += 1;
            }
        }

        let s = &doc.total_metrics;
        conn.execute(
            "INSERT INTO summary (id, total_spend, total_revenue, total_conversions, overall_roas)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                s.total_spend,
                s.total_revenue,
                s.total_conversions,
                s.overall_roas
            ],
        )?;

        Ok(report)
    }

    fn summary(&self) -> Result<Option<Summary>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached(
            "SELECT total_spend, total_revenue, total_conversions, overall_roas FROM summary WHERE id = 1",
        )?;
        let mut rows = stmt.query_map([], |row| {
            Ok(Summary {
                total_spend: row.get(0)?,
                total_revenue: row.get(1)?,
                total_conversions: row.get(2)?,
                overall_roas: row.get(3)?,
            })
        })?;
        Ok(rows.next().transpose()?)
    }

    fn list_channels(&self, sort: ChannelSort) -> Result<Vec<Channel>> {
        let conn = self.lock_conn();
        let sql = format!(
            "SELECT id, name, spend, impressions, clicks, conversions, revenue, ctr, cpc, roas, cpa, cvr
             FROM channels {}",
            sort.order_by_clause()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], channel_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn list_monthly(&self) -> Result<Vec<MonthlyPerformance>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached(
            "SELECT id, month, spend, revenue, conversions FROM monthly_performance ORDER BY month ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(MonthlyPerformance {
                id: row.get(0)?,
                month: row.get(1)?,
                spend: row.get(2)?,
                revenue: row.get(3)?,
                conversions: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn list_campaigns(&self, filter: &CampaignFilter) -> Result<Vec<Campaign>> {
        let conn = self.lock_conn();
        let mut sql = String::from(
            "SELECT id, channel, campaign_name, spend, impressions, clicks, conversions, revenue, roas, cpa
             FROM campaigns",
        );
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(channel) = &filter.channel {
            params.push(Box::new(channel.clone()));
            conditions.push(format!("channel = ?{}", params.len()));
        }
        if let Some(min_roas) = filter.min_roas {
            params.push(Box::new(min_roas.bound_value()));
            conditions.push(format!("roas >= ?{}", params.len()));
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY roas DESC");

        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(param_refs.as_slice(), campaign_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn list_insights(&self) -> Result<Vec<String>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached("SELECT content FROM insights ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn table_counts(&self) -> Result<Vec<(&'static str, u64)>> {
        let conn = self.lock_conn();
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let count: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            counts.push((table, count as u64));
        }
        Ok(counts)
    }
}

fn channel_from_row(row: &Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        name: row.get(1)?,
        spend: row.get(2)?,
        impressions: row.get(3)?,
        clicks: row.get(4)?,
        conversions: row.get(5)?,
        revenue: row.get(6)?,
        ctr: row.get(7)?,
        cpc: row.get(8)?,
        roas: row.get(9)?,
        cpa: row.get(10)?,
        cvr: row.get(11)?,
    })
}

fn campaign_from_row(row: &Row<'_>) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: row.get(0)?,
        channel: row.get(1)?,
        campaign_name: row.get(2)?,
        spend: row.get(3)?,
        impressions: row.get(4)?,
        clicks: row.get(5)?,
        conversions: row.get(6)?,
        revenue: row.get(7)?,
        roas: row.get(8)?,
        cpa: row.get(9)?,
    })
}
