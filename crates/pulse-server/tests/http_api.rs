mod common;

use axum::http::StatusCode;
use common::{
    build_broken_app, build_seeded_context, build_test_context, column, get_json, request_no_body,
};
use serde_json::{json, Value};

fn names(rows: &Value) -> Vec<&str> {
    column(rows, "name")
        .into_iter()
        .filter_map(Value::as_str)
        .collect()
}

fn campaign_names(rows: &Value) -> Vec<&str> {
    column(rows, "campaign_name")
        .into_iter()
        .filter_map(Value::as_str)
        .collect()
}

#[tokio::test]
async fn summary_is_null_before_first_load() {
    let ctx = build_test_context().expect("test context should build");
    let (status, body, trace) = request_no_body(&ctx.app, "GET", "/api/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    assert!(trace.is_some());
}

#[tokio::test]
async fn empty_store_lists_are_empty_arrays() {
    let ctx = build_test_context().expect("test context should build");
    for uri in ["/api/channels", "/api/monthly", "/api/campaigns", "/api/insights"] {
        assert_eq!(get_json(&ctx.app, uri).await, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn summary_returns_loaded_totals_without_id() {
    let ctx = build_seeded_context().expect("seeded context should build");
    let body = get_json(&ctx.app, "/api/summary").await;
    assert_eq!(
        body,
        json!({
            "total_spend": 1000.0,
            "total_revenue": 4000.0,
            "total_conversions": 50,
            "overall_roas": 4.0
        })
    );
}

#[tokio::test]
async fn channels_default_to_roas_descending() {
    let ctx = build_seeded_context().expect("seeded context should build");
    let body = get_json(&ctx.app, "/api/channels").await;
    assert_eq!(names(&body), vec!["Google", "TikTok", "Meta", "Email"]);

    let first = &body[0];
    assert!(first["id"].is_i64());
    assert_eq!(first["spend"], json!(1000.0));
    assert_eq!(first["impressions"], json!(40000));
    assert_eq!(first["roas"], json!(5.0));
}

#[tokio::test]
async fn channels_sort_by_requested_column_and_order() {
    let ctx = build_seeded_context().expect("seeded context should build");

    let body = get_json(&ctx.app, "/api/channels?sort_by=spend&order=asc").await;
    assert_eq!(names(&body), vec!["Email", "TikTok", "Google", "Meta"]);

    let body = get_json(&ctx.app, "/api/channels?sort_by=name&order=ASC").await;
    assert_eq!(names(&body), vec!["Email", "Google", "Meta", "TikTok"]);

    let body = get_json(&ctx.app, "/api/channels?sort_by=impressions").await;
    assert_eq!(names(&body), vec!["TikTok", "Meta", "Google", "Email"]);
}

#[tokio::test]
async fn channels_every_sort_column_is_non_increasing_by_default() {
    let ctx = build_seeded_context().expect("seeded context should build");
    for key in [
        "spend",
        "impressions",
        "clicks",
        "conversions",
        "revenue",
        "ctr",
        "cpc",
        "roas",
        "cpa",
        "cvr",
    ] {
        let body = get_json(&ctx.app, &format!("/api/channels?sort_by={key}")).await;
        let values: Vec<f64> = column(&body, key)
            .into_iter()
            .filter_map(Value::as_f64)
            .collect();
        assert_eq!(values.len(), 4, "{key}");
        assert!(
            values.windows(2).all(|w| w[0] >= w[1]),
            "{key} not descending: {values:?}"
        );
    }
}

#[tokio::test]
async fn channels_unknown_sort_and_order_fall_back_to_roas_desc() {
    let ctx = build_seeded_context().expect("seeded context should build");
    let expected = get_json(&ctx.app, "/api/channels").await;

    for uri in [
        "/api/channels?sort_by=bogus",
        "/api/channels?sort_by=ROAS",
        "/api/channels?sort_by=roas;DROP%20TABLE%20channels",
        "/api/channels?order=sideways",
    ] {
        assert_eq!(get_json(&ctx.app, uri).await, expected, "{uri}");
    }

    // Table survives the injection attempt.
    let body = get_json(&ctx.app, "/api/channels").await;
    assert_eq!(names(&body).len(), 4);
}

#[tokio::test]
async fn monthly_rows_are_ordered_by_month_label() {
    let ctx = build_seeded_context().expect("seeded context should build");
    let body = get_json(&ctx.app, "/api/monthly").await;
    let months: Vec<&str> = column(&body, "month")
        .into_iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(months, vec!["2024-01", "2024-02"]);
    assert_eq!(body[0]["revenue"], json!(6720.0));
    assert_eq!(body[0]["conversions"], json!(85));
}

#[tokio::test]
async fn campaigns_are_ordered_by_roas_descending() {
    let ctx = build_seeded_context().expect("seeded context should build");
    let body = get_json(&ctx.app, "/api/campaigns").await;
    assert_eq!(
        campaign_names(&body),
        vec![
            "Brand Search",
            "Spark Ads",
            "Generic Search",
            "Retargeting",
            "Newsletter",
            "Prospecting"
        ]
    );
    assert_eq!(body[0]["channel"], json!("Google"));
}

#[tokio::test]
async fn campaigns_filter_by_channel_exactly() {
    let ctx = build_seeded_context().expect("seeded context should build");

    let body = get_json(&ctx.app, "/api/campaigns?channel=Google").await;
    assert_eq!(campaign_names(&body), vec!["Brand Search", "Generic Search"]);

    let body = get_json(&ctx.app, "/api/campaigns?channel=google").await;
    assert_eq!(body, json!([]));

    let body = get_json(&ctx.app, "/api/campaigns?channel=").await;
    assert_eq!(campaign_names(&body).len(), 6);
}

#[tokio::test]
async fn campaigns_filter_by_min_roas() {
    let ctx = build_seeded_context().expect("seeded context should build");

    let body = get_json(&ctx.app, "/api/campaigns?min_roas=3").await;
    assert_eq!(
        campaign_names(&body),
        vec!["Brand Search", "Spark Ads", "Generic Search"]
    );

    // Numeric prefix is honoured.
    let prefixed = get_json(&ctx.app, "/api/campaigns?min_roas=3abc").await;
    assert_eq!(prefixed, body);

    // Inclusive bound.
    let body = get_json(&ctx.app, "/api/campaigns?min_roas=4.5").await;
    assert_eq!(campaign_names(&body), vec!["Brand Search", "Spark Ads"]);

    let body = get_json(&ctx.app, "/api/campaigns?min_roas=abc").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn campaigns_combine_filters_with_and() {
    let ctx = build_seeded_context().expect("seeded context should build");
    let body = get_json(&ctx.app, "/api/campaigns?channel=Meta&min_roas=2").await;
    assert_eq!(campaign_names(&body), vec!["Retargeting"]);
}

#[tokio::test]
async fn insights_keep_load_order() {
    let ctx = build_seeded_context().expect("seeded context should build");
    let body = get_json(&ctx.app, "/api/insights").await;
    let Some(items) = body.as_array() else {
        panic!("insights should be an array: {body}");
    };
    assert_eq!(items.len(), 2);
    assert!(items[0].as_str().is_some_and(|s| s.starts_with("Scale Google")));
    assert!(items[1].as_str().is_some_and(|s| s.starts_with("Re-evaluate Email")));
}

#[tokio::test]
async fn store_failures_return_500_with_error_message() {
    let app = build_broken_app();
    for uri in [
        "/api/summary",
        "/api/channels",
        "/api/monthly",
        "/api/campaigns",
        "/api/insights",
    ] {
        let (status, body, trace) = request_no_body(&app, "GET", uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(
            body["error"].as_str().is_some_and(|e| e.contains("disk I/O error")),
            "{uri}: {body}"
        );
        assert!(trace.is_some());
    }
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let ctx = build_test_context().expect("test context should build");
    let (status, body, trace) = request_no_body(&ctx.app, "GET", "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
    assert!(trace.is_some());
}

#[tokio::test]
async fn trace_id_header_is_sixteen_hex_chars() {
    let ctx = build_test_context().expect("test context should build");
    let (_, _, trace) = request_no_body(&ctx.app, "GET", "/api/insights").await;
    let Some(trace) = trace else {
        panic!("x-trace-id header missing");
    };
    assert_eq!(trace.len(), 16);
    assert!(trace.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    let ctx = build_test_context().expect("test context should build");
    let req = Request::builder()
        .uri("/api/summary")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .expect("request should build");
    let resp = ctx.app.clone().oneshot(req).await.expect("request should be handled");
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|h| h.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn repeated_query_keys_return_json_error() {
    let ctx = build_seeded_context().expect("seeded context should build");
    for uri in [
        "/api/campaigns?channel=Google&channel=Meta",
        "/api/channels?sort_by=roas&sort_by=spend",
    ] {
        let (status, body, trace) = request_no_body(&ctx.app, "GET", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(
            body["error"].as_str().is_some_and(|e| e.contains("duplicate field")),
            "{uri}: {body}"
        );
        assert!(trace.is_some());
    }
}
