//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Konfiguration und reine Geometrie, die von `core`, `ops` und `io`
//! gemeinsam genutzt werden, um direkte Abhängigkeiten zu vermeiden.

pub mod options;
pub mod spline_geometry;

pub use options::{CornerParameters, FlatTangentMode, SplineOptions};
pub use spline_geometry::{bezier_point, bezier_velocity, frame_rotation, polyline_length, Ray3};
