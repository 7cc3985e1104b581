use crate::error::{ClientError, Result};
use pulse_common::types::{Channel, MonthlyPerformance, Summary};
use serde::de::DeserializeOwned;

pub const DEFAULT_API_BASE: &str = "http://localhost:5001/api";

/// Everything the page shows, exactly as the API returned it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub summary: Option<Summary>,
    pub channels: Vec<Channel>,
    pub monthly: Vec<MonthlyPerformance>,
    pub insights: Vec<String>,
}

pub struct DashboardClient {
    base_url: String,
    client: reqwest::Client,
}

impl DashboardClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.json::<T>().await?)
    }

    pub async fn fetch_summary(&self) -> Result<Option<Summary>> {
        self.get_json("summary").await
    }

    pub async fn fetch_channels(&self) -> Result<Vec<Channel>> {
        self.get_json("channels").await
    }

    pub async fn fetch_monthly(&self) -> Result<Vec<MonthlyPerformance>> {
        self.get_json("monthly").await
    }

    pub async fn fetch_insights(&self) -> Result<Vec<String>> {
        self.get_json("insights").await
    }

    /// Issues the four requests concurrently and waits for all of them.
    /// The first failure, in request order, is returned.
    pub async fn try_fetch_all(&self) -> Result<DashboardData> {
        let (summary, channels, monthly, insights) = tokio::join!(
            self.fetch_summary(),
            self.fetch_channels(),
            self.fetch_monthly(),
            self.fetch_insights(),
        );
        Ok(DashboardData {
            summary: summary?,
            channels: channels?,
            monthly: monthly?,
            insights: insights?,
        })
    }

    /// Like [`try_fetch_all`](Self::try_fetch_all), but a failure is only
    /// logged and every section comes back empty.
    pub async fn fetch_all(&self) -> DashboardData {
        tracing::info!(api = %self.base_url, "Loading dashboard data");
        match self.try_fetch_all().await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(api = %self.base_url, error = %e, "Failed to fetch data");
                DashboardData::default()
            }
        }
    }
}
