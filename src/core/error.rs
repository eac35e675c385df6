//! Fehler für strukturelle Änderungen an einer Spline.

use thiserror::Error;

/// Fehler bei strukturellen Änderungen (Einfügen/Entfernen von Nodes).
///
/// Abfragen und Sampling erzeugen keine Fehler, sie klemmen oder liefern
/// das beste gefundene Ergebnis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    /// Ungültiger Zeitwert (NaN, negativ oder unendlich)
    #[error("Ungültige Einfüge-Zeit: {time}")]
    InvalidTime { time: f32 },
    /// Segment-Index außerhalb der vorhandenen Segmente
    #[error("Segment-Index {index} außerhalb des Bereichs (Segmente: {count})")]
    SegmentOutOfRange { index: usize, count: usize },
    /// Kein Node besitzt das Segment als rechten Nachbarn
    #[error("Kein Node verweist auf Segment {index} als rechtes Segment")]
    NoOwningNode { index: usize },
    /// Node-Index außerhalb der vorhandenen Nodes
    #[error("Node-Index {index} außerhalb des Bereichs (Nodes: {count})")]
    NodeOutOfRange { index: usize, count: usize },
}
