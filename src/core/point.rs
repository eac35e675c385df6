//! Sample-Punkt einer Spline.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Sentinel für eine noch nicht berechnete uniforme Zeit.
///
/// `SplineSegment::recalculate` setzt die uniforme Zeit aller Samples sofort.
/// Außerhalb der Segment-Tabelle per `SplinePoint::new` gebaute Punkte behalten
/// den Sentinel.
pub const UNSET_UNIFORM_TIME: f32 = -1.0;

/// Ein gesampelter Punkt auf einem Segment.
///
/// `normal` enthält die Ableitung (Geschwindigkeit) der Kurve an dieser Stelle,
/// keine senkrechte Normale. Eck-Rundung und Platzierung nutzen sie als Laufrichtung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplinePoint {
    /// Weltposition
    pub position: Vec3,
    /// Ableitung der Kurve (Laufrichtung, nicht normiert)
    pub normal: Vec3,
    /// Bezier-Parameter innerhalb des Segments, ∈ [0, 1]
    pub natural_time: f32,
    /// Bogenlängen-Anteil innerhalb des Segments, ∈ [0, 1] oder `UNSET_UNIFORM_TIME`
    pub uniform_time: f32,
    /// Kumulierte Länge ab Segment-Anfang
    pub accum_length: f32,
}

impl SplinePoint {
    /// Erstellt einen Punkt ohne uniforme Zeit.
    pub fn new(position: Vec3, normal: Vec3, natural_time: f32, accum_length: f32) -> Self {
        Self {
            position,
            normal,
            natural_time,
            uniform_time: UNSET_UNIFORM_TIME,
            accum_length,
        }
    }

    /// Prüft ob die uniforme Zeit bereits gesetzt wurde.
    ///
    /// Für Samples aus `SplineSegment::points` immer `true`.
    pub fn has_uniform_time(&self) -> bool {
        self.uniform_time >= 0.0
    }

    /// Normierte Laufrichtung (Nullvektor bei Stillstand).
    pub fn direction(&self) -> Vec3 {
        self.normal.normalize_or_zero()
    }
}
