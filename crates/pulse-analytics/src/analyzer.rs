use crate::error::{AnalyticsError, Result};
use crate::insights;
use chrono::{NaiveDate, NaiveDateTime};
use pulse_common::types::{SeedCampaign, SeedChannel, SeedDocument, SeedMonthly, Summary};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// One cleaned row of the spend export.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendRecord {
    /// `YYYY-MM` bucket derived from the row date
    pub month: String,
    pub channel: String,
    pub campaign_name: String,
    pub spend: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub revenue: f64,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    channel: String,
    campaign_name: String,
    spend: String,
    impressions: String,
    clicks: String,
    conversions: String,
    revenue: String,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn parse_month(value: &str) -> Option<String> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .map(|d| d.format("%Y-%m").to_string())
}

/// Unparseable or non-finite numbers count as zero.
fn coerce_number(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn label_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    spend: f64,
    impressions: f64,
    clicks: f64,
    conversions: f64,
    revenue: f64,
}

impl Totals {
    fn add(&mut self, r: &SpendRecord) {
        self.spend += r.spend;
        self.impressions += r.impressions;
        self.clicks += r.clicks;
        self.conversions += r.conversions;
        self.revenue += r.revenue;
    }
}

/// Rollups over a cleaned spend export.
pub struct MarketingAnalytics {
    records: Vec<SpendRecord>,
}

impl MarketingAnalytics {
    pub fn from_path(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "Loading spend export");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads and cleans CSV rows with the header
    /// `date,channel,campaign_name,spend,impressions,clicks,conversions,revenue`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, row) in rdr.deserialize::<RawRow>().enumerate() {
            let row = row?;
            let month = parse_month(&row.date).ok_or_else(|| AnalyticsError::InvalidDate {
                row: idx + 1,
                value: row.date.clone(),
            })?;
            records.push(SpendRecord {
                month,
                channel: label_or(&row.channel, "Unknown"),
                campaign_name: label_or(&row.campaign_name, "Unnamed"),
                spend: coerce_number(&row.spend),
                impressions: coerce_number(&row.impressions),
                clicks: coerce_number(&row.clicks),
                conversions: coerce_number(&row.conversions),
                revenue: coerce_number(&row.revenue),
            });
        }

        if records.is_empty() {
            return Err(AnalyticsError::Empty);
        }
        tracing::info!(rows = records.len(), "Spend export cleaned");
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<SpendRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SpendRecord] {
        &self.records
    }

    /// Per-channel sums with derived ratios, highest ROAS first.
    pub fn summarize_by_channel(&self) -> Vec<SeedChannel> {
        let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
        for r in &self.records {
            groups.entry(r.channel.as_str()).or_default().add(r);
        }

        let mut channels: Vec<SeedChannel> = groups
            .into_iter()
            .map(|(channel, t)| SeedChannel {
                channel: channel.to_string(),
                spend: t.spend,
                impressions: t.impressions.round() as i64,
                clicks: t.clicks.round() as i64,
                conversions: t.conversions.round() as i64,
                revenue: t.revenue,
                ctr: ratio(t.clicks, t.impressions) * 100.0,
                cpc: ratio(t.spend, t.clicks),
                roas: ratio(t.revenue, t.spend),
                cpa: ratio(t.spend, t.conversions),
                cvr: ratio(t.conversions, t.clicks) * 100.0,
            })
            .collect();
        channels.sort_by(|a, b| b.roas.total_cmp(&a.roas));
        channels
    }

    /// Per-month sums, ordered by month label.
    pub fn summarize_by_month(&self) -> Vec<SeedMonthly> {
        let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
        for r in &self.records {
            groups.entry(r.month.as_str()).or_default().add(r);
        }
        groups
            .into_iter()
            .map(|(month, t)| SeedMonthly {
                month: month.to_string(),
                spend: t.spend,
                revenue: t.revenue,
                conversions: t.conversions.round() as i64,
            })
            .collect()
    }

    /// Per (channel, campaign) sums with ROAS and CPA, in key order.
    pub fn summarize_campaigns(&self) -> Vec<SeedCampaign> {
        let mut groups: BTreeMap<(&str, &str), Totals> = BTreeMap::new();
        for r in &self.records {
            groups
                .entry((r.channel.as_str(), r.campaign_name.as_str()))
                .or_default()
                .add(r);
        }
        groups
            .into_iter()
            .map(|((channel, campaign_name), t)| SeedCampaign {
                channel: channel.to_string(),
                campaign_name: campaign_name.to_string(),
                spend: t.spend,
                impressions: t.impressions.round() as i64,
                clicks: t.clicks.round() as i64,
                conversions: t.conversions.round() as i64,
                revenue: t.revenue,
                roas: ratio(t.revenue, t.spend),
                cpa: ratio(t.spend, t.conversions),
            })
            .collect()
    }

    pub fn total_metrics(&self) -> Summary {
        let mut t = Totals::default();
        for r in &self.records {
            t.add(r);
        }
        Summary {
            total_spend: t.spend,
            total_revenue: t.revenue,
            total_conversions: t.conversions.trunc() as i64,
            overall_roas: ratio(t.revenue, t.spend),
        }
    }

    /// Assembles the full seed document, insights included.
    pub fn build_document(&self) -> SeedDocument {
        let channels = self.summarize_by_channel();
        let monthly_performance = self.summarize_by_month();
        let campaigns = self.summarize_campaigns();
        let insights = insights::generate(&channels, &monthly_performance, &campaigns);

        tracing::info!(
            channels = channels.len(),
            months = monthly_performance.len(),
            campaigns = campaigns.len(),
            insights = insights.len(),
            "Marketing summary computed"
        );

        SeedDocument {
            channels,
            monthly_performance,
            campaigns,
            insights,
            total_metrics: self.total_metrics(),
        }
    }
}

/// Writes the document as pretty-printed JSON.
pub fn export_summary(doc: &SeedDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Summary exported");
    Ok(())
}
