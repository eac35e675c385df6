//! Spline-Dokument: Optionen plus Nodes als JSON.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Spline, SplineNode};
use crate::shared::SplineOptions;

/// Aktuelle Format-Version. Neuere Dokumente werden abgelehnt.
pub const DOCUMENT_VERSION: u32 = 1;

/// Persistierbarer Zustand einer Spline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineDocument {
    /// Format-Version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Optionen (fehlende Felder nehmen die Standardwerte an)
    #[serde(default)]
    pub options: SplineOptions,
    /// Kontroll-Nodes in Kurvenreihenfolge
    #[serde(default)]
    pub nodes: Vec<SplineNode>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl SplineDocument {
    /// Erstellt ein Dokument aus dem aktuellen Zustand einer Spline.
    pub fn from_spline(spline: &Spline) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            options: spline.options.clone(),
            nodes: spline.nodes.clone(),
        }
    }

    /// Baut die Spline auf und berechnet sie vollständig.
    pub fn into_spline(self) -> Spline {
        Spline::from_nodes(self.nodes, self.options)
    }
}

/// Parst ein Spline-Dokument aus JSON.
///
/// Lehnt unbekannte Versionen und nicht-endliche Koordinaten ab.
pub fn parse_spline_document(json: &str) -> Result<SplineDocument> {
    let document: SplineDocument =
        serde_json::from_str(json).context("Spline-Dokument ist kein gültiges JSON")?;

    if document.version > DOCUMENT_VERSION {
        bail!(
            "Spline-Dokument hat Version {}, unterstützt wird bis {}",
            document.version,
            DOCUMENT_VERSION
        );
    }

    for (index, node) in document.nodes.iter().enumerate() {
        let finite = [
            node.position,
            node.up_vector,
            node.left_control,
            node.right_control,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            bail!("Node {} enthält ungültige Koordinaten", index);
        }
    }

    Ok(document)
}

/// Schreibt ein Spline-Dokument als formatiertes JSON.
pub fn write_spline_document(document: &SplineDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Spline-Dokument konnte nicht serialisiert werden")
}

/// Lädt ein Spline-Dokument aus einer Datei.
pub fn load_spline_document(path: &Path) -> Result<SplineDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Datei nicht lesbar: {}", path.display()))?;
    let document = parse_spline_document(&content)
        .with_context(|| format!("Fehler beim Laden von {}", path.display()))?;
    log::info!(
        "Spline-Dokument geladen: {} ({} Nodes)",
        path.display(),
        document.nodes.len()
    );
    Ok(document)
}

/// Speichert ein Spline-Dokument in eine Datei.
pub fn save_spline_document(path: &Path, document: &SplineDocument) -> Result<()> {
    let content = write_spline_document(document)?;
    std::fs::write(path, content)
        .with_context(|| format!("Datei nicht schreibbar: {}", path.display()))?;
    log::info!("Spline-Dokument gespeichert: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_minimal_document_uses_defaults() {
        let doc = parse_spline_document(r#"{ "nodes": [ { "position": [0.0, 0.0, 0.0] } ] }"#)
            .expect("Parsing erwartet");
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert_eq!(doc.options, SplineOptions::default());
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].up_vector, Vec3::Y);
    }

    #[test]
    fn test_rejects_newer_version() {
        let result = parse_spline_document(r#"{ "version": 99, "nodes": [] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_spline_document("not json").is_err());
        assert!(parse_spline_document(r#"{ "nodes": 3 }"#).is_err());
    }

    #[test]
    fn test_written_document_parses_back() {
        let spline = Spline::from_positions(
            &[Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0), Vec3::new(10.0, 1.0, 0.0)],
            SplineOptions {
                looped: true,
                ..SplineOptions::default()
            },
        );
        let doc = SplineDocument::from_spline(&spline);
        let json = write_spline_document(&doc).expect("Export erwartet");
        let parsed = parse_spline_document(&json).expect("Re-Parsing erwartet");

        assert_eq!(parsed, doc);
        let rebuilt = parsed.into_spline();
        assert_eq!(rebuilt.segments().len(), 3);
        assert!((rebuilt.length() - spline.length()).abs() < 1e-3);
    }
}
