//! Eck-Rundung der zusammengesetzten Punktliste.
//!
//! Scharfe Knicke (A, B, C) werden durch einen kurzen Bezier-Bogen um B ersetzt.
//! Eingangspunkte innerhalb der erweiterten Bogen-Box werden verworfen, damit
//! keine Schleifen an der Ecke entstehen.

use glam::Vec3;

use crate::core::{ControlEndpoint, SplinePoint, SplineSegment};
use crate::shared::CornerParameters;

/// Wie viele Punkte vor und nach einer Ecke auf Überlappung geprüft werden.
const LOOK_DISTANCE: usize = 10;

/// Mindestlänge eines Laufs, darunter ist die Richtung undefiniert.
const RUN_EPSILON: f32 = 1.0e-6;

/// Ersetzt scharfe Ecken durch Bögen mit `parameters.radius`.
///
/// Gibt eine neue Liste zurück; bei deaktivierter Rundung oder weniger als drei
/// Punkten eine unveränderte Kopie. Erster und letzter Punkt bleiben immer erhalten.
pub fn add_corners(points: &[SplinePoint], parameters: &CornerParameters) -> Vec<SplinePoint> {
    let count = points.len();
    if count < 3 || !parameters.is_enabled() {
        return points.to_vec();
    }

    let mut out: Vec<SplinePoint> = Vec::with_capacity(count);
    let mut corners = 0usize;
    let mut i = 0;
    while i < count {
        let arc = if i + 2 < count {
            corner_arc(&points[i], &points[i + 1], &points[i + 2], parameters)
        } else {
            None
        };
        let Some(arc) = arc else {
            out.push(points[i]);
            i += 1;
            continue;
        };

        let bounds = arc.bounds().expanded(parameters.radius * 0.5);

        // Rückwärts: bereits ausgegebene Punkte im Bogenbereich verwerfen (Start bleibt)
        let keep_from = out.len().saturating_sub(LOOK_DISTANCE).max(1);
        let mut k = out.len();
        while k > keep_from {
            k -= 1;
            if bounds.contains(out[k].position) {
                out.remove(k);
            }
        }

        let apex_start = points[i];
        if out.is_empty() || !bounds.contains(apex_start.position) {
            out.push(apex_start);
        }
        out.extend_from_slice(arc.points());
        corners += 1;

        // Vorwärts: Punkte im Bogenbereich überspringen, nie den letzten
        let limit = (i + 2 + LOOK_DISTANCE).min(count - 1);
        let mut next = i + 2;
        while next < limit && bounds.contains(points[next].position) {
            next += 1;
        }
        i = next;
    }

    log::trace!("{} Ecken gerundet, {} → {} Punkte", corners, count, out.len());
    out
}

/// Baut den Bogen für das Tripel (A, B, C) oder `None` wenn die Ecke zu flach ist.
fn corner_arc(
    a: &SplinePoint,
    b: &SplinePoint,
    c: &SplinePoint,
    parameters: &CornerParameters,
) -> Option<SplineSegment> {
    let incoming = b.position - a.position;
    let outgoing = c.position - b.position;
    let (run_in, run_out) = (incoming.length(), outgoing.length());
    if run_in <= RUN_EPSILON || run_out <= RUN_EPSILON {
        return None;
    }
    if run_in + run_out <= parameters.radius {
        return None;
    }
    let dot = (incoming / run_in).dot(outgoing / run_out).abs();
    if dot >= parameters.threshold {
        return None;
    }

    let dir_in = travel_direction(a, incoming / run_in);
    let dir_out = travel_direction(c, outgoing / run_out);
    let radius = parameters.radius;

    let mut arc = SplineSegment::new(
        ControlEndpoint::new(b.position - dir_in * radius, dir_in * radius),
        ControlEndpoint::new(b.position + dir_out * radius, -dir_out * radius),
        parameters.resolution,
    );
    arc.recalculate();
    Some(arc)
}

/// Normierte Ableitung des Punkts, ersatzweise die Sehnenrichtung.
fn travel_direction(point: &SplinePoint, fallback: Vec3) -> Vec3 {
    let dir = point.direction();
    if dir == Vec3::ZERO {
        fallback
    } else {
        dir
    }
}
