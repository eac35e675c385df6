//! Core-Domänentypen: Sample-Punkte, Bounds, Nodes, Segmente und die Spline.

pub mod bounds;
pub mod error;
pub mod node;
pub mod point;
pub mod segment;
/// Spline-Aggregat
///
/// Besitzt die Nodes (Arena) und die daraus abgeleiteten Segmente:
/// - Neuberechnung mit Fingerabdruck-basiertem Dirty-Tracking
/// - Einfügen und Entfernen von Nodes
/// - zusammengesetzte Punktliste mit Eck-Rundung und Vereinfachung
pub mod spline;

pub use bounds::Bounds3;
pub use error::SplineError;
pub use node::{ControlMode, SplineNode};
pub use point::{SplinePoint, UNSET_UNIFORM_TIME};
pub use segment::{ControlEndpoint, SplineSegment};
pub use spline::{expected_segment_count, InvalidationListener, Spline};
