//! Bezier-Spline-Engine.
//! Kurvenmodell, Neuberechnung und Abfragen als Library exportiert für Tests und Wiederverwendung.

pub mod core;
pub mod io;
pub mod ops;
pub mod shared;

pub use core::{
    Bounds3, ControlEndpoint, ControlMode, Spline, SplineError, SplineNode, SplinePoint,
    SplineSegment,
};
pub use io::{load_spline_document, parse_spline_document, write_spline_document, SplineDocument};
pub use shared::{CornerParameters, FlatTangentMode, Ray3, SplineOptions};
