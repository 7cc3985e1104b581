//! Rule-based recommendations drafted from the rollups.
//!
//! Each rule contributes at most one sentence. A rule whose candidate set is
//! empty is skipped rather than failing the whole run.

use pulse_common::types::{SeedCampaign, SeedChannel, SeedMonthly};

/// Campaign spend above which a campaign qualifies as a budget "star".
const STAR_MIN_SPEND: f64 = 1000.0;
/// Clicks above which a low conversion rate is worth flagging.
const ALERT_MIN_CLICKS: i64 = 500;
/// Conversions above which a campaign's CPA is considered meaningful.
const AUDIT_MIN_CONVERSIONS: i64 = 10;

fn campaign_cvr(c: &SeedCampaign) -> f64 {
    if c.clicks == 0 {
        0.0
    } else {
        c.conversions as f64 / c.clicks as f64 * 100.0
    }
}

/// First element with the greatest key (ties keep the earlier element).
fn first_max_by<'a, T>(items: impl Iterator<Item = &'a T>, key: impl Fn(&T) -> f64) -> Option<&'a T> {
    items.fold(None, |best, item| match best {
        Some(b) if key(item) <= key(b) => Some(b),
        _ => Some(item),
    })
}

/// `channels` must already be sorted by ROAS descending.
pub fn generate(
    channels: &[SeedChannel],
    monthly: &[SeedMonthly],
    campaigns: &[SeedCampaign],
) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(best) = channels.first() {
        insights.push(format!(
            "Scale {}: Currently the highest-performing channel with a ROAS of {:.2}.",
            best.channel, best.roas
        ));
    }

    if let Some(worst) = channels.last() {
        insights.push(format!(
            "Re-evaluate {}: Lowest efficiency with a ROAS of {:.2}. Consider reallocating budget.",
            worst.channel, worst.roas
        ));
    }

    if let Some(star) = first_max_by(
        campaigns.iter().filter(|c| c.spend > STAR_MIN_SPEND),
        |c| c.roas,
    ) {
        insights.push(format!(
            "Star Campaign: '{}' in {} is over-performing. Increase budget for this specific campaign.",
            star.campaign_name, star.channel
        ));
    }

    if let Some(low) = first_max_by(
        campaigns.iter().filter(|c| c.clicks > ALERT_MIN_CLICKS),
        |c| -campaign_cvr(c),
    ) {
        insights.push(format!(
            "Performance Alert: '{}' has high traffic but low conversion rate ({:.2}%). Audit the landing page.",
            low.campaign_name,
            campaign_cvr(low)
        ));
    }

    if let [.., prev, last] = monthly {
        if prev.revenue != 0.0 {
            let growth = (last.revenue - prev.revenue) / prev.revenue * 100.0;
            let trend = if growth > 0.0 { "upward" } else { "downward" };
            insights.push(format!(
                "Overall Trend: Revenue is on a {trend} trend ({growth:+.1}% vs previous month)."
            ));
        }
    }

    if let Some(costly) = first_max_by(
        campaigns
            .iter()
            .filter(|c| c.conversions > AUDIT_MIN_CONVERSIONS),
        |c| c.cpa,
    ) {
        insights.push(format!(
            "Cost Audit: '{}' has an unusually high CPA of ${:.2}. Optimize targeting to lower acquisition costs.",
            costly.campaign_name, costly.cpa
        ));
    }

    insights
}
