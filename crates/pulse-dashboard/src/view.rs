//! Formatting helpers and the inline SVG trend chart.
//!
//! Nothing here computes metrics: every number comes straight from the API
//! response and is only formatted for display.

use pulse_common::types::{MonthlyPerformance, Summary};
use std::fmt::Write;

/// Shown in a KPI card when no summary has been loaded.
pub const MISSING_VALUE: &str = "-";

/// Escapes text for use in HTML element content and attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// en-US grouping with at most three fraction digits (`1234567.891` ->
/// `1,234,567.891`, `2.50` -> `2.5`).
pub fn format_grouped(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + 4);
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_count(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_currency(value: f64) -> String {
    format!("${}", format_grouped(value))
}

pub fn format_roas(value: f64) -> String {
    format!("{value:.2}x")
}

/// Colour band for a ROAS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoasStatus {
    Success,
    Warning,
    Danger,
}

impl RoasStatus {
    pub fn from_roas(roas: f64) -> Self {
        if roas > 4.0 {
            Self::Success
        } else if roas < 2.0 {
            Self::Danger
        } else {
            Self::Warning
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "status-success",
            Self::Warning => "status-warning",
            Self::Danger => "status-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
    pub color: &'static str,
}

pub fn kpi_cards(summary: Option<&Summary>) -> [KpiCard; 4] {
    let value = |f: &dyn Fn(&Summary) -> String| {
        summary.map_or_else(|| MISSING_VALUE.to_string(), f)
    };
    [
        KpiCard {
            label: "Total Spend",
            value: value(&|s| format_currency(s.total_spend)),
            color: "#6366f1",
        },
        KpiCard {
            label: "Total Revenue",
            value: value(&|s| format_currency(s.total_revenue)),
            color: "#10b981",
        },
        KpiCard {
            label: "Conversions",
            value: value(&|s| format_count(s.total_conversions)),
            color: "#f59e0b",
        },
        KpiCard {
            label: "Overall ROAS",
            value: value(&|s| format_roas(s.overall_roas)),
            color: "#8b5cf6",
        },
    ]
}

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 350.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 32.0;
const TICK_COUNT: usize = 5;

const REVENUE_COLOR: &str = "#10b981";
const SPEND_COLOR: &str = "#6366f1";

/// Smallest of 1, 2, 2.5, 5, 10 (times a power of ten) that is `>= raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|f| normalized <= *f)
        .unwrap_or(10.0);
    factor * magnitude
}

/// Evenly spaced y-axis ticks from zero covering `max`.
pub fn y_ticks(max: f64) -> Vec<f64> {
    let max = if max.is_finite() && max > 0.0 { max } else { 1000.0 };
    let step = nice_step(max / (TICK_COUNT - 1) as f64);
    (0..TICK_COUNT).map(|i| i as f64 * step).collect()
}

/// `$<v/1000>k`, e.g. `2500` -> `$2.5k`.
pub fn tick_label(value: f64) -> String {
    let thousands = (value / 1000.0 * 1e6).round() / 1e6;
    format!("${thousands}k")
}

struct Plot {
    top_value: f64,
    count: usize,
}

impl Plot {
    fn x(&self, idx: usize) -> f64 {
        let width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        if self.count <= 1 {
            MARGIN_LEFT + width / 2.0
        } else {
            MARGIN_LEFT + width * idx as f64 / (self.count - 1) as f64
        }
    }

    fn y(&self, value: f64) -> f64 {
        let height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        CHART_HEIGHT - MARGIN_BOTTOM - value / self.top_value * height
    }

    fn baseline(&self) -> f64 {
        CHART_HEIGHT - MARGIN_BOTTOM
    }

    fn line_path(&self, values: &[f64]) -> String {
        let mut d = String::new();
        for (i, v) in values.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{:.1},{:.1} ", self.x(i), self.y(*v));
        }
        d.trim_end().to_string()
    }

    fn area_path(&self, values: &[f64]) -> String {
        if values.is_empty() {
            return String::new();
        }
        format!(
            "{} L{:.1},{:.1} L{:.1},{:.1} Z",
            self.line_path(values),
            self.x(values.len() - 1),
            self.baseline(),
            self.x(0),
            self.baseline()
        )
    }
}

/// Revenue and spend per month as an inline SVG area chart.
pub fn render_area_chart(monthly: &[MonthlyPerformance]) -> String {
    let revenue: Vec<f64> = monthly.iter().map(|m| m.revenue).collect();
    let spend: Vec<f64> = monthly.iter().map(|m| m.spend).collect();
    let max = revenue.iter().chain(&spend).copied().fold(0.0, f64::max);
    let ticks = y_ticks(max);
    let plot = Plot {
        top_value: ticks.last().copied().unwrap_or(1000.0),
        count: monthly.len(),
    };

    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg class="trend-chart" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="Revenue vs Spend Trend">
<defs>
<linearGradient id="colorRev" x1="0" y1="0" x2="0" y2="1"><stop offset="5%" stop-color="{REVENUE_COLOR}" stop-opacity="0.3"/><stop offset="95%" stop-color="{REVENUE_COLOR}" stop-opacity="0"/></linearGradient>
<linearGradient id="colorSpend" x1="0" y1="0" x2="0" y2="1"><stop offset="5%" stop-color="{SPEND_COLOR}" stop-opacity="0.3"/><stop offset="95%" stop-color="{SPEND_COLOR}" stop-opacity="0"/></linearGradient>
</defs>
"##
    );

    for tick in &ticks {
        let y = plot.y(*tick);
        let _ = writeln!(
            svg,
            r#"<line class="grid" x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}"/><text class="axis" x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            CHART_WIDTH - MARGIN_RIGHT,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            tick_label(*tick)
        );
    }

    for (i, m) in monthly.iter().enumerate() {
        let _ = writeln!(
            svg,
            r#"<text class="axis" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            plot.x(i),
            CHART_HEIGHT - 8.0,
            html_escape(&m.month)
        );
    }

    for (values, color, fill) in [
        (&revenue, REVENUE_COLOR, "colorRev"),
        (&spend, SPEND_COLOR, "colorSpend"),
    ] {
        if values.is_empty() {
            continue;
        }
        let _ = writeln!(
            svg,
            r#"<path d="{}" fill="url(#{fill})" stroke="none"/><path d="{}" fill="none" stroke="{color}" stroke-width="3"/>"#,
            plot.area_path(values),
            plot.line_path(values)
        );
    }

    svg.push_str("</svg>");
    svg
}
