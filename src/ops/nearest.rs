//! Nächster-Punkt-Abfragen gegen Samples, Nodes und Endpunkte.
//!
//! Alle Scans sind erschöpfend (O(n)) und vergleichen quadratische Abstände.
//! Die Abfragen scheitern nie: bei einer Spline ohne Daten gibt es `None`.

use glam::{Vec2, Vec3};

use super::time::{natural_to_uniform, uniform_point, uniform_to_natural};
use crate::core::{ControlEndpoint, Spline, SplinePoint, SplineSegment};
use crate::shared::options::clamp_ray_step;
use crate::shared::Ray3;

/// Obergrenze der Bisektionsschritte (Intervallbreite < 2^-48).
const MAX_BISECTION_STEPS: usize = 48;

/// Treffer einer Strahl-Abfrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index des getroffenen Segments
    pub segment_index: usize,
    /// Punkt auf dem Segment (natürliche und uniforme Zeit gesetzt)
    pub point: SplinePoint,
    /// Quadratischer Abstand zum Strahl
    pub distance_squared: f32,
}

impl RayHit {
    /// Kontinuierliche Zeit `segment_index + natural_time` (Eingabe für `insert_node`).
    pub fn continuous_time(&self) -> f32 {
        self.segment_index as f32 + self.point.natural_time
    }
}

/// Welcher Endpunkt eines Segments getroffen wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSide {
    /// `segment.first`
    First,
    /// `segment.second`
    Second,
}

/// Treffer einer Endpunkt-Abfrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointHit {
    /// Index des Segments
    pub segment_index: usize,
    /// Getroffene Seite
    pub side: EndpointSide,
    /// Kopie des Endpunkts
    pub endpoint: ControlEndpoint,
}

/// Nächster Sample-Punkt eines Segments zu `world`.
pub fn closest_sample_on_segment(segment: &SplineSegment, world: Vec3) -> Option<SplinePoint> {
    segment
        .points()
        .iter()
        .min_by(|a, b| {
            a.position
                .distance_squared(world)
                .total_cmp(&b.position.distance_squared(world))
        })
        .copied()
}

/// Nächste Sample-Position der gesamten Spline zu `world`.
pub fn closest_point(spline: &Spline, world: Vec3) -> Option<Vec3> {
    spline
        .segments()
        .iter()
        .filter_map(|segment| closest_sample_on_segment(segment, world))
        .map(|p| p.position)
        .min_by(|a, b| a.distance_squared(world).total_cmp(&b.distance_squared(world)))
}

/// Uniforme Zeit des Samples, das in der XZ-Ebene am nächsten an `world_xz` liegt.
pub fn closest_uniform_time_xz(segment: &SplineSegment, world_xz: Vec2) -> f32 {
    let mut best_time = 0.0;
    let mut best_dist = f32::MAX;
    for p in segment.points() {
        let dist = Vec2::new(p.position.x, p.position.z).distance_squared(world_xz);
        if dist < best_dist {
            best_dist = dist;
            best_time = p.uniform_time;
        }
    }
    best_time
}

/// Nächster Punkt auf den Segment-Bounding-Boxen zu `world`.
pub fn closest_point_on_bounds(spline: &Spline, world: Vec3) -> Option<Vec3> {
    spline
        .segments()
        .iter()
        .map(|segment| segment.bounds().closest_point(world))
        .min_by(|a, b| a.distance_squared(world).total_cmp(&b.distance_squared(world)))
}

/// Nächster Punkt eines Segments zu einem Strahl.
///
/// Tastet das Segment in uniformen Schritten `step` ab (inklusive Ende).
/// `step` wird per `clamp_ray_step` begrenzt.
/// Gibt den Punkt und den quadratischen Abstand zum Strahl zurück.
pub fn closest_point_to_ray_on_segment(
    segment: &SplineSegment,
    ray: &Ray3,
    step: f32,
) -> (SplinePoint, f32) {
    let step = clamp_ray_step(step);
    let steps = (1.0 / step).ceil() as usize;

    let mut best_u = 0.0f32;
    let mut best_dist = f32::MAX;
    let mut best_pos = segment.first.position;
    for i in 0..=steps {
        let u = (i as f32 * step).min(1.0);
        let pos = uniform_point(segment, u);
        let dist = ray.distance_squared(pos);
        if dist < best_dist {
            best_dist = dist;
            best_pos = pos;
            best_u = u;
        }
    }

    let natural = uniform_to_natural(segment, best_u);
    let point = SplinePoint {
        position: best_pos,
        normal: segment.velocity(natural),
        natural_time: natural,
        uniform_time: best_u,
        accum_length: best_u * segment.length(),
    };
    (point, best_dist)
}

/// Nächster Punkt der gesamten Spline zu einem Strahl.
pub fn closest_point_to_ray(spline: &Spline, ray: &Ray3, step: f32) -> Option<RayHit> {
    spline
        .segments()
        .iter()
        .enumerate()
        .map(|(segment_index, segment)| {
            let (point, distance_squared) = closest_point_to_ray_on_segment(segment, ray, step);
            RayHit {
                segment_index,
                point,
                distance_squared,
            }
        })
        .min_by(|a, b| a.distance_squared.total_cmp(&b.distance_squared))
}

/// Index des Nodes, der dem Strahl am nächsten liegt.
pub fn closest_node_to_ray(spline: &Spline, ray: &Ray3) -> Option<usize> {
    spline
        .nodes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            ray.distance_squared(a.position)
                .total_cmp(&ray.distance_squared(b.position))
        })
        .map(|(i, _)| i)
}

/// Index des Nodes, der `world` am nächsten liegt.
pub fn closest_node(spline: &Spline, world: Vec3) -> Option<usize> {
    spline
        .nodes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.position
                .distance_squared(world)
                .total_cmp(&b.position.distance_squared(world))
        })
        .map(|(i, _)| i)
}

/// Nächster Segment-Endpunkt zu `world` (beide Enden jedes Segments).
pub fn closest_control_endpoint(spline: &Spline, world: Vec3) -> Option<EndpointHit> {
    let mut best: Option<(f32, EndpointHit)> = None;
    for (segment_index, segment) in spline.segments().iter().enumerate() {
        for (side, endpoint) in [
            (EndpointSide::First, segment.first),
            (EndpointSide::Second, segment.second),
        ] {
            let dist = endpoint.position.distance_squared(world);
            if best.as_ref().is_none_or(|(d, _)| dist < *d) {
                best = Some((
                    dist,
                    EndpointHit {
                        segment_index,
                        side,
                        endpoint,
                    },
                ));
            }
        }
    }
    best.map(|(_, hit)| hit)
}

/// Nächste uniforme Zeit zu `world` per Bisektion.
///
/// Halbiert das Zeitintervall und folgt der Hälfte, deren äußere Grenze näher
/// an `world` liegt, bis die Abstände der Intervallgrenzen sich um weniger als
/// `threshold` unterscheiden. Nur eine Näherung: bei stark gekrümmten oder
/// sich zurückwindenden Segmenten kann ein lokales Minimum gefunden werden.
pub fn closest_uniform_time(segment: &SplineSegment, world: Vec3, threshold: f32) -> f32 {
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    let mut mid = 0.5;
    for _ in 0..MAX_BISECTION_STEPS {
        mid = (lo + hi) * 0.5;
        let first_dist = uniform_point(segment, lo).distance(world);
        let second_dist = uniform_point(segment, hi).distance(world);

        if (first_dist - second_dist).abs() < threshold {
            return mid;
        }
        if first_dist < second_dist {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    mid
}

/// Nächster Punkt zu `world` über die Bisektion, als vollständiger Sample-Punkt.
pub fn closest_point_by_bisection(
    segment: &SplineSegment,
    world: Vec3,
    threshold: f32,
) -> SplinePoint {
    let uniform = closest_uniform_time(segment, world, threshold);
    let natural = uniform_to_natural(segment, uniform);
    SplinePoint {
        position: uniform_point(segment, uniform),
        normal: segment.velocity(natural),
        natural_time: natural,
        uniform_time: natural_to_uniform(segment, natural),
        accum_length: uniform * segment.length(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::SplineOptions;
    use approx::assert_abs_diff_eq;

    fn line_spline() -> Spline {
        Spline::from_positions(
            &[Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::new(10.0, 0.0, 10.0)],
            SplineOptions::default(),
        )
    }

    #[test]
    fn test_closest_point_scans_all_segments() {
        let spline = line_spline();
        let p = closest_point(&spline, Vec3::new(7.0, 3.0, 11.0)).expect("Treffer erwartet");
        assert_abs_diff_eq!(p.z, 10.0, epsilon = 0.2);
        assert!(p.x > 5.0);
    }

    #[test]
    fn test_closest_node_and_ray_node() {
        let spline = line_spline();
        assert_eq!(closest_node(&spline, Vec3::new(9.0, 0.0, 9.0)), Some(2));

        let ray = Ray3::new(Vec3::new(0.0, 10.0, 10.0), Vec3::NEG_Y);
        assert_eq!(closest_node_to_ray(&spline, &ray), Some(1));
    }

    #[test]
    fn test_closest_point_to_ray_reports_segment_and_time() {
        let spline = line_spline();
        // Senkrecht von oben auf die Mitte des ersten Segments
        let ray = Ray3::new(Vec3::new(0.0, 10.0, 5.0), Vec3::NEG_Y);
        let hit = closest_point_to_ray(&spline, &ray, 0.01).expect("Treffer erwartet");
        assert_eq!(hit.segment_index, 0);
        assert_abs_diff_eq!(hit.point.position.z, 5.0, epsilon = 0.1);
        assert_abs_diff_eq!(hit.point.uniform_time, 0.5, epsilon = 0.01);
        assert!(hit.distance_squared < 0.01);
        assert!(hit.continuous_time() > 0.0 && hit.continuous_time() < 1.0);
    }

    #[test]
    fn test_degenerate_ray_step_is_clamped() {
        let spline = line_spline();
        let segment = &spline.segments()[0];
        let ray = Ray3::new(Vec3::new(0.0, 10.0, 5.0), Vec3::NEG_Y);

        let started = std::time::Instant::now();
        for step in [1e-12, 0.0, -1.0, f32::NAN, f32::INFINITY] {
            let (point, dist) = closest_point_to_ray_on_segment(segment, &ray, step);
            assert_abs_diff_eq!(point.position.z, 5.0, epsilon = 0.1);
            assert!(dist < 0.01, "Schritt {}: Abstand {}", step, dist);
        }
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_closest_control_endpoint() {
        let spline = line_spline();
        let hit = closest_control_endpoint(&spline, Vec3::new(0.5, 0.0, 9.0)).expect("Treffer");
        assert_eq!(hit.endpoint.position, Vec3::new(0.0, 0.0, 10.0));
        // Erster Treffer gewinnt bei Gleichstand: Ende von Segment 0
        assert_eq!(hit.segment_index, 0);
        assert_eq!(hit.side, EndpointSide::Second);
    }

    #[test]
    fn test_bisection_finds_projection_on_straight_segment() {
        let spline = line_spline();
        let segment = &spline.segments()[0];
        let u = closest_uniform_time(segment, Vec3::new(1.0, 0.0, 7.0), 0.01);
        assert_abs_diff_eq!(u, 0.7, epsilon = 0.05);

        let p = closest_point_by_bisection(segment, Vec3::new(1.0, 0.0, 7.0), 0.01);
        assert_abs_diff_eq!(p.position.z, 7.0, epsilon = 0.5);
    }

    #[test]
    fn test_closest_uniform_time_xz_ignores_height() {
        let spline = line_spline();
        let segment = &spline.segments()[0];
        let u = closest_uniform_time_xz(segment, Vec2::new(0.0, 2.5));
        assert_abs_diff_eq!(u, 0.25, epsilon = 0.05);
    }

    #[test]
    fn test_closest_point_on_bounds() {
        let spline = line_spline();
        let p = closest_point_on_bounds(&spline, Vec3::new(-5.0, 0.0, 5.0)).expect("Treffer");
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.z, 5.0, epsilon = 1e-5);
    }
}
