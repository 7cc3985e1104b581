use anyhow::{anyhow, Result};
use pulse_common::types::SeedDocument;
use pulse_storage::{LoadReport, MarketingStore};
use std::path::Path;

/// Reads and parses a seed document.
pub fn read_seed_document(seed_path: &Path) -> Result<SeedDocument> {
    let content = std::fs::read_to_string(seed_path).map_err(|e| {
        anyhow!(
            "Failed to read seed file '{}': {}",
            seed_path.display(),
            e
        )
    })?;
    let doc: SeedDocument = serde_json::from_str(&content).map_err(|e| {
        anyhow!(
            "Failed to parse seed file '{}': {}",
            seed_path.display(),
            e
        )
    })?;
    Ok(doc)
}

/// Replaces the store contents with the seed document at `seed_path`.
///
/// The schema is ensured first. A missing seed file aborts the run: the
/// document comes from the separate `analyze` step and there is nothing
/// sensible to load without it.
pub fn run_seed(store: &dyn MarketingStore, seed_path: &Path) -> Result<LoadReport> {
    store.init_schema()?;

    if !seed_path.exists() {
        tracing::error!(
            path = %seed_path.display(),
            "Summary data not found. Run `pulse-server analyze` first."
        );
        return Err(anyhow!(
            "Summary data not found at '{}'",
            seed_path.display()
        ));
    }

    let doc = read_seed_document(seed_path)?;
    let report = store.load_document(&doc)?;

    tracing::info!(
        channels = report.channels,
        monthly = report.monthly,
        campaigns = report.campaigns,
        insights = report.insights,
        "Seeding complete"
    );
    Ok(report)
}
