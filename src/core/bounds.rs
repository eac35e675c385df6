//! Achsenparallele Bounding-Box über gesampelte Punkte.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Achsenparallele Box im Raum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    /// Minimale Ecke
    pub min: Vec3,
    /// Maximale Ecke
    pub max: Vec3,
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

impl Bounds3 {
    /// Box um genau einen Punkt.
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Kleinste Box um alle Punkte; leere Eingabe ergibt die Null-Box.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(Self::from_point(first), |mut bounds, p| {
            bounds.encapsulate(p);
            bounds
        })
    }

    /// Erweitert die Box so, dass `point` enthalten ist.
    pub fn encapsulate(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Vergrößert die Box um `amount` in alle Richtungen.
    ///
    /// Wie bei Unity-Bounds ist `amount` die Gesamtzunahme der Kantenlänge,
    /// jede Seite wächst also um `amount / 2`.
    pub fn expanded(&self, amount: f32) -> Self {
        let half = Vec3::splat(amount * 0.5);
        Self {
            min: self.min - half,
            max: self.max + half,
        }
    }

    /// Prüft ob der Punkt innerhalb (inklusive Rand) liegt.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Nächster Punkt innerhalb der Box.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Mittelpunkt der Box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_and_contains() {
        let b = Bounds3::from_points([Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 5.0)]);
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 3.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 5.0));
        assert!(b.contains(Vec3::new(0.0, 1.0, 4.0)));
        assert!(b.contains(b.max));
        assert!(!b.contains(Vec3::new(0.0, 1.0, 6.0)));
    }

    #[test]
    fn test_expanded_grows_each_side_by_half() {
        let b = Bounds3::from_point(Vec3::ZERO).expanded(2.0);
        assert_eq!(b.min, Vec3::splat(-1.0));
        assert_eq!(b.max, Vec3::splat(1.0));
    }

    #[test]
    fn test_closest_point_clamps() {
        let b = Bounds3::from_points([Vec3::ZERO, Vec3::ONE]);
        assert_eq!(b.closest_point(Vec3::new(2.0, 0.5, -1.0)), Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(b.center(), Vec3::splat(0.5));
    }

    #[test]
    fn test_empty_input_yields_zero_box() {
        assert_eq!(Bounds3::from_points(std::iter::empty()), Bounds3::default());
    }
}
