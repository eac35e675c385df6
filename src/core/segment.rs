//! Ein kubisches Bezier-Segment zwischen zwei Kontroll-Endpunkten.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::{Bounds3, SplinePoint};
use crate::shared::options::clamp_resolution;
use crate::shared::{bezier_point, bezier_velocity, frame_rotation};

/// Obergrenze der Sample-Schritte pro Segment.
const MAX_SAMPLE_STEPS: usize = 10_000;

/// Endpunkt eines Segments: Position plus Tangenten-Offset.
///
/// Spiegelt nach jeder Neuberechnung Position und Handle des zugehörigen Nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlEndpoint {
    /// Weltposition
    pub position: Vec3,
    /// Tangenten-Offset relativ zu `position`
    pub control: Vec3,
    /// Up-Vektor des Nodes
    pub up_vector: Vec3,
    /// Orientierung für Verdrehung (None wenn der Handle degeneriert ist)
    pub rotation: Option<Quat>,
}

impl Default for ControlEndpoint {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl ControlEndpoint {
    /// Erstellt einen Endpunkt ohne Orientierung mit +Y als Up-Vektor.
    pub fn new(position: Vec3, control: Vec3) -> Self {
        Self {
            position,
            control,
            up_vector: Vec3::Y,
            rotation: None,
        }
    }

    /// Absoluter Kontrollpunkt (`position + control`).
    pub fn control_point(&self) -> Vec3 {
        self.position + self.control
    }
}

/// Eine kubische Bezier-Spanne mit gecachter Sample-Tabelle.
///
/// Reine Funktion der beiden Endpunkte: `recalculate()` ersetzt die Tabelle vollständig.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplineSegment {
    /// Start-Endpunkt
    pub first: ControlEndpoint,
    /// End-Endpunkt
    pub second: ControlEndpoint,
    /// Natürliche-Zeit-Schrittweite beim Sampling
    pub resolution: f32,
    points: Vec<SplinePoint>,
    length: f32,
    bounds: Bounds3,
}

impl Default for SplineSegment {
    fn default() -> Self {
        Self::new(
            ControlEndpoint::default(),
            ControlEndpoint::default(),
            crate::shared::options::SEGMENT_RESOLUTION,
        )
    }
}

impl SplineSegment {
    /// Erstellt ein Segment ohne Sample-Tabelle. `recalculate()` füllt sie.
    pub fn new(first: ControlEndpoint, second: ControlEndpoint, resolution: f32) -> Self {
        Self {
            first,
            second,
            resolution,
            points: Vec::new(),
            length: 0.0,
            bounds: Bounds3::from_point(first.position),
        }
    }

    /// Gesampelte Punkte (natürliche Zeit aufsteigend).
    pub fn points(&self) -> &[SplinePoint] {
        &self.points
    }

    /// Summe der Sehnenlängen der Sample-Tabelle.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Bounding-Box aller gesampelten Positionen.
    pub fn bounds(&self) -> Bounds3 {
        self.bounds
    }

    /// Die vier Bezier-Kontrollpunkte P0..P3 in absoluten Koordinaten.
    pub fn control_points(&self) -> [Vec3; 4] {
        [
            self.first.position,
            self.first.control_point(),
            self.second.control_point(),
            self.second.position,
        ]
    }

    /// Punkt auf der Kurve bei natürlicher Zeit `t`.
    pub fn point_at_natural(&self, t: f32) -> Vec3 {
        bezier_point(self.control_points(), t)
    }

    /// Ableitung der Kurve bei natürlicher Zeit `t` (das `normal` der Sample-Punkte).
    pub fn velocity(&self, t: f32) -> Vec3 {
        bezier_velocity(self.control_points(), t)
    }

    /// Linear interpolierter Up-Vektor der beiden Endpunkte.
    pub fn up_vector(&self, t: f32) -> Vec3 {
        self.first.up_vector.lerp(self.second.up_vector, t)
    }

    /// Seitwärts-Vektor `velocity × up`.
    pub fn side_vector(&self, t: f32) -> Vec3 {
        self.velocity(t).cross(self.up_vector(t))
    }

    /// Orientierung bei natürlicher Zeit `t`.
    ///
    /// Interpoliert die Endpunkt-Orientierungen wenn beide gesetzt sind,
    /// sonst wird sie aus Laufrichtung und Up-Vektor aufgebaut.
    pub fn rotation(&self, t: f32) -> Option<Quat> {
        match (self.first.rotation, self.second.rotation) {
            (Some(a), Some(b)) => Some(a.slerp(b, t)),
            _ => frame_rotation(self.velocity(t), self.up_vector(t)),
        }
    }

    /// Anzahl der Sample-Schritte (Punkte = Schritte + 1).
    pub fn sample_steps(&self) -> usize {
        let step = clamp_resolution(self.resolution);
        ((1.0 / step).ceil() as usize).clamp(1, MAX_SAMPLE_STEPS)
    }

    /// Sampelt das Segment neu und ersetzt Tabelle, Länge und Bounds.
    pub fn recalculate(&mut self) {
        let control = self.control_points();
        let steps = self.sample_steps();

        self.points.clear();
        self.points.reserve(steps + 1);

        let mut accum = 0.0f32;
        let mut last: Option<Vec3> = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let position = bezier_point(control, t);
            if let Some(prev) = last {
                accum += prev.distance(position);
            }
            last = Some(position);
            self.points
                .push(SplinePoint::new(position, bezier_velocity(control, t), t, accum));
        }

        self.length = accum;
        for p in &mut self.points {
            p.uniform_time = if accum > f32::EPSILON {
                p.accum_length / accum
            } else {
                p.natural_time
            };
        }
        self.bounds = Bounds3::from_points(self.points.iter().map(|p| p.position));
    }

    /// Wendet eine Transformation auf Endpunkte und Tabelle an.
    ///
    /// Positionen werden als Punkte, Handles als Vektoren transformiert.
    /// Längen werden nicht neu berechnet (bei Skalierung `recalculate()` aufrufen).
    pub fn apply_transform(&mut self, mat: glam::Mat4) {
        for endpoint in [&mut self.first, &mut self.second] {
            endpoint.position = mat.transform_point3(endpoint.position);
            endpoint.control = mat.transform_vector3(endpoint.control);
        }
        for p in &mut self.points {
            p.position = mat.transform_point3(p.position);
        }
        self.bounds = Bounds3::from_points(self.points.iter().map(|p| p.position));
    }
}
