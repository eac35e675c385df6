//! Export der zusammengesetzten Punktliste.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::Spline;

/// Serialisiert die Punktliste der Spline als JSON-Array.
pub fn export_points(spline: &Spline) -> Result<String> {
    serde_json::to_string_pretty(spline.all_points())
        .context("Punktliste konnte nicht serialisiert werden")
}

/// Schreibt die Punktliste der Spline in eine Datei.
pub fn save_points(path: &Path, spline: &Spline) -> Result<()> {
    let content = export_points(spline)?;
    std::fs::write(path, content)
        .with_context(|| format!("Datei nicht schreibbar: {}", path.display()))?;
    log::info!(
        "{} Punkte exportiert nach: {}",
        spline.all_points().len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SplinePoint;

    #[test]
    fn test_export_contains_every_point() {
        let spline = Spline::default();
        let json = export_points(&spline).expect("Export erwartet");
        let points: Vec<SplinePoint> = serde_json::from_str(&json).expect("JSON erwartet");
        assert_eq!(points.len(), spline.all_points().len());
        assert_eq!(points.first(), spline.all_points().first());
    }
}
