use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// ---- Seed document (produced by the analytics step, consumed by the loader) ----

/// The precomputed metrics document loaded by `pulse-server seed`.
///
/// Every top-level field is required; a document missing any of them is
/// rejected before the store is touched.
///
/// # Examples
///
/// ```
/// use pulse_common::types::SeedDocument;
///
/// let doc: SeedDocument = serde_json::from_str(r#"{
///     "channels": [],
///     "monthly_performance": [],
///     "campaigns": [],
///     "insights": ["Scale Google"],
///     "total_metrics": {
///         "total_spend": 1000.0,
///         "total_revenue": 4000.0,
///         "total_conversions": 50,
///         "overall_roas": 4.0
///     }
/// }"#).unwrap();
/// assert_eq!(doc.insights.len(), 1);
/// assert_eq!(doc.total_metrics.total_conversions, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedDocument {
    pub channels: Vec<SeedChannel>,
    pub monthly_performance: Vec<SeedMonthly>,
    pub campaigns: Vec<SeedCampaign>,
    pub insights: Vec<String>,
    pub total_metrics: Summary,
}

/// Channel rollup as emitted by the analytics step. The label travels under
/// `channel` and is stored in the `name` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedChannel {
    pub channel: String,
    pub spend: f64,
    #[serde(deserialize_with = "count")]
    pub impressions: i64,
    #[serde(deserialize_with = "count")]
    pub clicks: i64,
    #[serde(deserialize_with = "count")]
    pub conversions: i64,
    pub revenue: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub roas: f64,
    pub cpa: f64,
    pub cvr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedMonthly {
    pub month: String,
    pub spend: f64,
    pub revenue: f64,
    #[serde(deserialize_with = "count")]
    pub conversions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCampaign {
    pub channel: String,
    pub campaign_name: String,
    pub spend: f64,
    #[serde(deserialize_with = "count")]
    pub impressions: i64,
    #[serde(deserialize_with = "count")]
    pub clicks: i64,
    #[serde(deserialize_with = "count")]
    pub conversions: i64,
    pub revenue: f64,
    pub roas: f64,
    pub cpa: f64,
}

// ---- API rows ----

/// Aggregate totals across all channels (the summary singleton).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    #[schema(example = 1000.0)]
    pub total_spend: f64,
    #[schema(example = 4000.0)]
    pub total_revenue: f64,
    #[serde(deserialize_with = "count")]
    #[schema(example = 50)]
    pub total_conversions: i64,
    #[schema(example = 4.0)]
    pub overall_roas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Channel {
    pub id: i64,
    #[schema(example = "Google")]
    pub name: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub revenue: f64,
    pub ctr: f64,
    pub cpc: f64,
    #[schema(example = 5.0)]
    pub roas: f64,
    pub cpa: f64,
    pub cvr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyPerformance {
    pub id: i64,
    #[schema(example = "2024-03")]
    pub month: String,
    pub spend: f64,
    pub revenue: f64,
    pub conversions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Campaign {
    pub id: i64,
    /// Free-text channel label, not a reference to `channels.name`
    #[schema(example = "Google")]
    pub channel: String,
    pub campaign_name: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub revenue: f64,
    pub roas: f64,
    pub cpa: f64,
}

/// Accepts any JSON number for a count column. Integral floats such as
/// `1234.0` are common in generated documents; fractions are truncated.
fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() => Ok(f.trunc() as i64),
        _ => Err(serde::de::Error::custom(format!(
            "count out of range: {value}"
        ))),
    }
}
