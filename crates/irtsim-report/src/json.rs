//! JSON run summaries.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty-printed JSON for any serializable summary.
pub fn generate_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize summary")
}

/// Write a summary to `path`, creating parent directories.
pub fn write_json_summary<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = generate_json(value)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use irtsim_core::statistics::AdaptiveSummary;

    #[test]
    fn summary_round_trips_through_file() {
        let summary = AdaptiveSummary {
            items_administered: 3,
            correct: 2,
            true_ability: 1.2,
            final_estimate: 0.9,
            absolute_error: 0.3,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("summary.json");
        write_json_summary(&summary, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["items_administered"], 3);
        assert_eq!(value["final_estimate"], 0.9);
    }
}
