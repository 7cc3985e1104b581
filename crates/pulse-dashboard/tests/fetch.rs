use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pulse_dashboard::{render_dashboard, ClientError, DashboardClient, DashboardData};
use serde_json::{json, Value};

async fn spawn_api(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("listener should have an address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}/api")
}

fn channels_body() -> Value {
    json!([
        {"id": 1, "name": "Google", "spend": 1000.0, "impressions": 40000, "clicks": 900,
         "conversions": 50, "revenue": 5000.0, "ctr": 2.25, "cpc": 1.11, "roas": 5.0,
         "cpa": 20.0, "cvr": 5.56}
    ])
}

fn full_api(monthly_fails: bool) -> Router {
    let monthly = if monthly_fails {
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "no such table: monthly_performance"})),
            )
        })
    } else {
        get(|| async {
            Json(json!([{"id": 1, "month": "2024-01", "spend": 1000.0,
                         "revenue": 5000.0, "conversions": 50}]))
        })
    };
    Router::new()
        .route(
            "/api/summary",
            get(|| async {
                Json(json!({"total_spend": 1000.0, "total_revenue": 5000.0,
                            "total_conversions": 50, "overall_roas": 5.0}))
            }),
        )
        .route("/api/channels", get(|| async { Json(channels_body()) }))
        .route("/api/monthly", monthly)
        .route(
            "/api/insights",
            get(|| async { Json(json!(["Scale Google: Currently the highest-performing channel."])) }),
        )
}

#[tokio::test]
async fn fetch_all_collects_every_endpoint() {
    let base = spawn_api(full_api(false)).await;
    let client = DashboardClient::new(&format!("{base}/"));
    assert_eq!(client.base_url(), base);

    let data = client.fetch_all().await;
    let summary = data.summary.as_ref().expect("summary should be present");
    assert_eq!(summary.total_conversions, 50);
    assert_eq!(data.channels.len(), 1);
    assert_eq!(data.channels[0].name, "Google");
    assert_eq!(data.monthly[0].month, "2024-01");
    assert_eq!(data.insights.len(), 1);

    let html = render_dashboard(&data, "09:00:00");
    assert!(html.contains(r#"<div class="kpi-value">$1,000</div>"#));
    assert!(html.contains("status-success"));
}

#[tokio::test]
async fn null_summary_is_accepted() {
    let router = Router::new()
        .route("/api/summary", get(|| async { Json(Value::Null) }))
        .route("/api/channels", get(|| async { Json(json!([])) }))
        .route("/api/monthly", get(|| async { Json(json!([])) }))
        .route("/api/insights", get(|| async { Json(json!([])) }));
    let base = spawn_api(router).await;

    let data = DashboardClient::new(&base)
        .try_fetch_all()
        .await
        .expect("empty store should fetch cleanly");
    assert_eq!(data, DashboardData::default());
}

#[tokio::test]
async fn one_failing_endpoint_empties_every_section() {
    let base = spawn_api(full_api(true)).await;
    let client = DashboardClient::new(&base);

    let err = client
        .try_fetch_all()
        .await
        .expect_err("monthly failure should surface");
    assert!(matches!(
        err,
        ClientError::Status { ref endpoint, status: 500 } if endpoint == "monthly"
    ));

    assert_eq!(client.fetch_all().await, DashboardData::default());
}

#[tokio::test]
async fn unreachable_api_renders_empty_dashboard() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("listener should have an address");
    drop(listener);

    let client = DashboardClient::new(&format!("http://{addr}/api"));
    assert!(matches!(
        client.try_fetch_all().await,
        Err(ClientError::Http(_))
    ));

    let html = render_dashboard(&client.fetch_all().await, "09:00:00");
    assert!(!html.contains("<tr><td"));
}
