//! Ausdünnung nahezu gerader Abschnitte der Punktliste.

use crate::core::SplinePoint;

/// Entfernt innere Punkte, deren Laufrichtung kaum von den Nachbarn abweicht.
///
/// Für jeden inneren Punkt wird der Mittelwert von |dot| der normierten
/// Richtungen zu Vorgänger und Nachfolger gebildet. Liegt er über `threshold`,
/// gilt der Punkt als gerade und wird entfernt. Kleinere Schwellen entfernen
/// mehr Punkte, ab 1.0 bleibt die Liste unverändert. Erster und letzter Punkt
/// bleiben immer erhalten.
pub fn simplify(points: &mut Vec<SplinePoint>, threshold: f32) {
    if threshold >= 1.0 || points.len() < 3 {
        return;
    }
    let before = points.len();

    // Rückwärts, damit der noch nicht besuchte Präfix stabil bleibt
    let mut i = points.len() - 2;
    while i >= 1 {
        let dir = points[i].direction();
        let prev = points[i - 1].direction();
        let next = points[i + 1].direction();
        let straightness = (prev.dot(dir).abs() + next.dot(dir).abs()) * 0.5;
        if straightness > threshold {
            points.remove(i);
        }
        i -= 1;
    }

    log::trace!("Vereinfacht: {} → {} Punkte", before, points.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn straight_line(count: usize) -> Vec<SplinePoint> {
        (0..count)
            .map(|i| SplinePoint::new(Vec3::new(0.0, 0.0, i as f32), Vec3::Z * 3.0, 0.0, i as f32))
            .collect()
    }

    #[test]
    fn test_threshold_one_is_noop() {
        let mut pts = straight_line(20);
        simplify(&mut pts, 1.0);
        assert_eq!(pts.len(), 20);
    }

    #[test]
    fn test_straight_line_collapses_to_endpoints() {
        let mut pts = straight_line(20);
        simplify(&mut pts, 0.01);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].position, Vec3::ZERO);
        assert_eq!(pts[1].position, Vec3::new(0.0, 0.0, 19.0));
    }

    #[test]
    fn test_sharp_turn_is_kept() {
        let mut pts = vec![
            SplinePoint::new(Vec3::ZERO, Vec3::X, 0.0, 0.0),
            SplinePoint::new(Vec3::X, Vec3::X, 0.0, 0.0),
            SplinePoint::new(Vec3::new(1.0, 0.0, 1.0), Vec3::Z, 0.0, 0.0),
            SplinePoint::new(Vec3::new(1.0, 0.0, 2.0), Vec3::Z, 0.0, 0.0),
        ];
        simplify(&mut pts, 0.9);
        // Punkt 2 hat |dot| 0 zum Vorgänger, Mittel 0.5 → bleibt
        assert!(pts.iter().any(|p| p.position == Vec3::new(1.0, 0.0, 1.0)));
        assert!(pts.iter().any(|p| p.position == Vec3::X));
    }
}
