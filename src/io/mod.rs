//! JSON Import/Export für Spline-Dokumente und Punktlisten.
//!
//! Ein Dokument enthält nur Optionen und Nodes. Segmente, Punktlisten und
//! Fingerabdrücke werden nach dem Laden vollständig neu berechnet.

pub mod document;
pub mod export;

pub use document::{
    load_spline_document, parse_spline_document, save_spline_document, write_spline_document,
    SplineDocument, DOCUMENT_VERSION,
};
pub use export::{export_points, save_points};
