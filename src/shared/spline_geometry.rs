//! Reine Geometrie-Funktionen für kubische Bezier-Kurven und Strahlen.
//!
//! Layer-neutral: kann von `core`, `ops` und `io` importiert werden ohne
//! Zirkel-Abhängigkeiten zu erzeugen.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Strahl im Raum (z.B. Maus-Strahl aus einer Kamera-Projektion).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray3 {
    /// Ursprung des Strahls
    pub origin: Vec3,
    /// Normierte Richtung (Nullvektor bei degeneriertem Strahl)
    pub direction: Vec3,
}

impl Ray3 {
    /// Erstellt einen Strahl; die Richtung wird normiert.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Nächster Punkt auf dem Strahl zu `position`.
    ///
    /// Die Projektion wird auf die vordere Hälfte geklemmt (Strahl, keine Gerade).
    pub fn closest_point(&self, position: Vec3) -> Vec3 {
        let projection = (position - self.origin).dot(self.direction).max(0.0);
        self.origin + self.direction * projection
    }

    /// Quadratischer Abstand von `position` zum Strahl.
    pub fn distance_squared(&self, position: Vec3) -> f32 {
        position.distance_squared(self.closest_point(position))
    }
}

/// Berechnet einen Punkt auf einer kubischen Bezier-Kurve (t ∈ [0, 1]).
///
/// `p`: die vier Kontrollpunkte P0..P3 in absoluten Koordinaten.
pub fn bezier_point(p: [Vec3; 4], t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;
    p[0] * mt3 + p[1] * (3.0 * mt2 * t) + p[2] * (3.0 * mt * t2) + p[3] * t3
}

/// Erste Ableitung (Geschwindigkeit) einer kubischen Bezier-Kurve.
pub fn bezier_velocity(p: [Vec3; 4], t: f32) -> Vec3 {
    let mt = 1.0 - t;
    (p[1] - p[0]) * (3.0 * mt * mt)
        + (p[2] - p[1]) * (6.0 * mt * t)
        + (p[3] - p[2]) * (3.0 * t * t)
}

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Baut eine Orientierung aus Blickrichtung und Up-Vektor.
///
/// Gibt `None` zurück wenn `forward` degeneriert ist. Ist `up` parallel zu
/// `forward`, wird ein beliebiger orthogonaler Vektor verwendet.
pub fn frame_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let right = up
        .cross(forward)
        .try_normalize()
        .unwrap_or_else(|| forward.any_orthonormal_vector());
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn straight() -> [Vec3; 4] {
        [
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 10.0),
        ]
    }

    #[test]
    fn test_bezier_point_endpoints() {
        let p = straight();
        assert_eq!(bezier_point(p, 0.0), p[0]);
        assert_eq!(bezier_point(p, 1.0), p[3]);
        assert_abs_diff_eq!(bezier_point(p, 0.5).z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_bezier_velocity_points_forward() {
        let v = bezier_velocity(straight(), 0.5);
        assert!(v.z > 0.0);
        assert_abs_diff_eq!(v.x, 0.0);
    }

    #[test]
    fn test_ray_closest_point_clamped_to_origin() {
        let ray = Ray3::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        // Hinter dem Ursprung → Ursprung
        assert_eq!(ray.closest_point(Vec3::new(1.0, 0.0, -5.0)), Vec3::ZERO);
        assert_eq!(
            ray.closest_point(Vec3::new(1.0, 0.0, 5.0)),
            Vec3::new(0.0, 0.0, 5.0)
        );
        assert_abs_diff_eq!(ray.distance_squared(Vec3::new(3.0, 0.0, 5.0)), 9.0);
    }

    #[test]
    fn test_frame_rotation_maps_z_to_forward() {
        let rot = frame_rotation(Vec3::X, Vec3::Y).expect("Orientierung erwartet");
        let forward = rot * Vec3::Z;
        assert_abs_diff_eq!(forward.x, 1.0, epsilon = 1e-5);
        assert!(frame_rotation(Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn test_polyline_length() {
        let pts = [Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0), Vec3::new(3.0, 4.0, 2.0)];
        assert_abs_diff_eq!(polyline_length(&pts), 7.0);
    }
}
