use crate::client::DashboardData;
use crate::view::{
    format_count, format_currency, html_escape, kpi_cards, render_area_chart, RoasStatus,
};
use pulse_common::types::Channel;
use std::fmt::Write;

fn render_kpi_cards(data: &DashboardData) -> String {
    let mut out = String::new();
    for card in kpi_cards(data.summary.as_ref()) {
        let _ = writeln!(
            out,
            r#"    <div class="card kpi-card"><div class="kpi-head"><span class="kpi-label">{}</span><span class="kpi-dot" style="background: {}"></span></div><div class="kpi-value">{}</div></div>"#,
            card.label,
            card.color,
            html_escape(&card.value)
        );
    }
    out
}

fn render_insights(insights: &[String]) -> String {
    let mut out = String::new();
    for insight in insights {
        let _ = writeln!(out, "        <li>{}</li>", html_escape(insight));
    }
    out
}

fn render_channel_row(chan: &Channel) -> String {
    let status = RoasStatus::from_roas(chan.roas);
    format!(
        r#"          <tr><td class="channel-name">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><span class="status-chip {}">{:.2}x</span></td><td>${:.2}</td></tr>"#,
        html_escape(&chan.name),
        format_currency(chan.spend),
        format_count(chan.impressions),
        format_count(chan.clicks),
        format_currency(chan.revenue),
        status.css_class(),
        chan.roas,
        chan.cpa
    )
}

/// Substitutes every `{{key}}` of `template` in one left-to-right pass.
/// Inserted values are never rescanned; unknown keys are left as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Renders the standalone dashboard page.
///
/// `updated_at` is shown verbatim (escaped) in the header.
pub fn render_dashboard(data: &DashboardData, updated_at: &str) -> String {
    let template = include_str!("templates/dashboard.html");

    let channel_rows = data
        .channels
        .iter()
        .map(render_channel_row)
        .collect::<Vec<_>>()
        .join("\n");

    fill_template(
        template,
        &[
            ("updated_at", &html_escape(updated_at)),
            ("kpi_cards", &render_kpi_cards(data)),
            ("trend_chart", &render_area_chart(&data.monthly)),
            ("insights", &render_insights(&data.insights)),
            ("channel_rows", &channel_rows),
        ],
    )
}
