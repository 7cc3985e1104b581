#![allow(dead_code)]

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use pulse_common::types::{
    Campaign, Channel, MonthlyPerformance, SeedCampaign, SeedChannel, SeedDocument, SeedMonthly,
    Summary,
};
use pulse_server::app;
use pulse_server::config::ServerConfig;
use pulse_server::state::AppState;
use pulse_storage::{
    CampaignFilter, ChannelSort, LoadReport, MarketingStore, SqliteMarketingStore, StorageError,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub struct TestContext {
    pub store: Arc<SqliteMarketingStore>,
    pub state: AppState,
    pub app: axum::Router,
}

pub fn build_test_context() -> Result<TestContext> {
    let store = Arc::new(SqliteMarketingStore::open_in_memory()?);
    let state = AppState::new(store.clone(), ServerConfig::default());
    let app = app::build_http_app(state.clone());
    Ok(TestContext { store, state, app })
}

/// Context whose store is already loaded with [`sample_document`].
pub fn build_seeded_context() -> Result<TestContext> {
    let ctx = build_test_context()?;
    ctx.store.load_document(&sample_document())?;
    Ok(ctx)
}

/// Store that fails every call, for exercising the 500 path.
pub struct BrokenStore;

fn broken<T>() -> pulse_storage::Result<T> {
    Err(StorageError::Other("disk I/O error".to_string()))
}

impl MarketingStore for BrokenStore {
    fn init_schema(&self) -> pulse_storage::Result<()> {
        broken()
    }
    fn load_document(&self, _doc: &SeedDocument) -> pulse_storage::Result<LoadReport> {
        broken()
    }
    fn summary(&self) -> pulse_storage::Result<Option<Summary>> {
        broken()
    }
    fn list_channels(&self, _sort: ChannelSort) -> pulse_storage::Result<Vec<Channel>> {
        broken()
    }
    fn list_monthly(&self) -> pulse_storage::Result<Vec<MonthlyPerformance>> {
        broken()
    }
    fn list_campaigns(&self, _filter: &CampaignFilter) -> pulse_storage::Result<Vec<Campaign>> {
        broken()
    }
    fn list_insights(&self) -> pulse_storage::Result<Vec<String>> {
        broken()
    }
    fn table_counts(&self) -> pulse_storage::Result<Vec<(&'static str, u64)>> {
        broken()
    }
}

pub fn build_broken_app() -> axum::Router {
    let state = AppState::new(Arc::new(BrokenStore), ServerConfig::default());
    app::build_http_app(state)
}

fn channel(name: &str, spend: f64, revenue: f64, impressions: i64, clicks: i64, conversions: i64) -> SeedChannel {
    SeedChannel {
        channel: name.to_string(),
        spend,
        impressions,
        clicks,
        conversions,
        revenue,
        ctr: clicks as f64 / impressions as f64 * 100.0,
        cpc: spend / clicks as f64,
        roas: revenue / spend,
        cpa: spend / conversions as f64,
        cvr: conversions as f64 / clicks as f64 * 100.0,
    }
}

fn campaign(channel: &str, name: &str, spend: f64, roas: f64, conversions: i64) -> SeedCampaign {
    SeedCampaign {
        channel: channel.to_string(),
        campaign_name: name.to_string(),
        spend,
        impressions: 25_000,
        clicks: 800,
        conversions,
        revenue: spend * roas,
        roas,
        cpa: spend / conversions as f64,
    }
}

pub fn sample_document() -> SeedDocument {
    SeedDocument {
        channels: vec![
            channel("Google", 1000.0, 5000.0, 40_000, 900, 50),
            channel("Meta", 2400.0, 4320.0, 95_000, 1400, 60),
            channel("TikTok", 800.0, 3600.0, 120_000, 2100, 30),
            channel("Email", 200.0, 300.0, 8_000, 400, 25),
        ],
        monthly_performance: vec![
            SeedMonthly {
                month: "2024-02".to_string(),
                spend: 2200.0,
                revenue: 6500.0,
                conversions: 80,
            },
            SeedMonthly {
                month: "2024-01".to_string(),
                spend: 2200.0,
                revenue: 6720.0,
                conversions: 85,
            },
        ],
        campaigns: vec![
            campaign("Google", "Brand Search", 600.0, 6.0, 30),
            campaign("Google", "Generic Search", 400.0, 3.5, 20),
            campaign("Meta", "Prospecting", 1400.0, 1.4, 35),
            campaign("Meta", "Retargeting", 1000.0, 2.36, 25),
            campaign("TikTok", "Spark Ads", 800.0, 4.5, 30),
            campaign("Email", "Newsletter", 200.0, 1.5, 25),
        ],
        insights: vec![
            "Scale Google: Currently the highest-performing channel with a ROAS of 5.00.".to_string(),
            "Re-evaluate Email: Lowest efficiency with a ROAS of 1.50. Consider reallocating budget.".to_string(),
        ],
        total_metrics: Summary {
            total_spend: 1000.0,
            total_revenue: 4000.0,
            total_conversions: 50,
            overall_roas: 4.0,
        },
    }
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
}

pub async fn get_json(app: &axum::Router, uri: &str) -> Value {
    let (status, body, _) = request_no_body(app, "GET", uri).await;
    assert_eq!(status, StatusCode::OK, "GET {uri} returned {body}");
    body
}

/// Field `key` of every object in a JSON array.
pub fn column<'a>(rows: &'a Value, key: &str) -> Vec<&'a Value> {
    rows.as_array()
        .expect("response should be an array")
        .iter()
        .map(|row| &row[key])
        .collect()
}
