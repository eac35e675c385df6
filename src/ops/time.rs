//! Umrechnung natürliche ↔ uniforme Zeit und Punkte entlang der Bogenlänge.
//!
//! Alle Funktionen arbeiten auf der Sample-Tabelle eines Segments (lineare
//! Interpolation zwischen benachbarten Samples) und klemmen statt zu scheitern.

use glam::Vec3;

use crate::core::{Spline, SplineSegment};

/// Natürliche Zeit → uniforme Zeit (Bogenlängen-Anteil).
///
/// Liefert 1.0 wenn `natural_t` über die Tabelle hinausgeht.
pub fn natural_to_uniform(segment: &SplineSegment, natural_t: f32) -> f32 {
    let points = segment.points();
    let length = segment.length();
    if length <= f32::EPSILON {
        return natural_t.clamp(0.0, 1.0);
    }
    let natural_t = natural_t.max(0.0);

    for pair in points.windows(2) {
        let (last, this) = (&pair[0], &pair[1]);
        if natural_t > this.natural_time {
            continue;
        }
        let span = this.natural_time - last.natural_time;
        let lerp = if span > 0.0 {
            (natural_t - last.natural_time) / span
        } else {
            1.0
        };
        let from = last.accum_length / length;
        let to = this.accum_length / length;
        return from + (to - from) * lerp;
    }
    1.0
}

/// Uniforme Zeit → natürliche Zeit.
///
/// Liefert 1.0 wenn `uniform_t` über die Tabelle hinausgeht.
pub fn uniform_to_natural(segment: &SplineSegment, uniform_t: f32) -> f32 {
    let points = segment.points();
    let length = segment.length();
    if length <= f32::EPSILON {
        return uniform_t.clamp(0.0, 1.0);
    }
    let uniform_t = uniform_t.max(0.0);

    for pair in points.windows(2) {
        let (last, this) = (&pair[0], &pair[1]);
        let this_ut = this.accum_length / length;
        if uniform_t > this_ut {
            continue;
        }
        let last_ut = last.accum_length / length;
        let span = this_ut - last_ut;
        // Stillstand (Sample-Punkte fallen zusammen): Ende des Intervalls
        if span <= f32::EPSILON {
            return this.natural_time;
        }
        let lerp = (uniform_t - last_ut) / span;
        return last.natural_time + (this.natural_time - last.natural_time) * lerp;
    }
    1.0
}

/// Punkt bei uniformer Zeit auf einem Segment.
///
/// Läuft die Tabelle entlang bis der Längenanteil `uniform_t` erreicht, dann
/// lineare Interpolation zwischen den beiden umschließenden Samples.
pub fn uniform_point(segment: &SplineSegment, uniform_t: f32) -> Vec3 {
    let points = segment.points();
    let Some(first) = points.first() else {
        return segment.first.position;
    };
    let total = segment.length();
    if total <= f32::EPSILON {
        return first.position;
    }

    for (i, this) in points.iter().enumerate() {
        let this_pct = this.accum_length / total;
        if this_pct < uniform_t {
            continue;
        }
        if i == 0 {
            return this.position;
        }
        let last = &points[i - 1];
        let last_pct = last.accum_length / total;
        let span = this_pct - last_pct;
        if span <= f32::EPSILON {
            return this.position;
        }
        return last.position.lerp(this.position, (uniform_t - last_pct) / span);
    }
    points[points.len() - 1].position
}

/// Punkt in `distance` Welteinheiten ab Segment-Anfang, geklemmt auf die Endpunkte.
pub fn segment_point_at_distance(segment: &SplineSegment, distance: f32) -> Vec3 {
    let length = segment.length();
    if distance >= length {
        return segment.second.position;
    }
    if distance <= 0.0 {
        return segment.first.position;
    }
    uniform_point(segment, distance / length)
}

/// Punkt in `distance` Welteinheiten ab Spline-Anfang.
///
/// Distanzen außerhalb `[0, length]` werden auf Start bzw. Ende geklemmt.
pub fn point_at_distance(spline: &Spline, distance: f32) -> Vec3 {
    if distance >= spline.length() {
        return spline.end();
    }
    if distance <= 0.0 {
        return spline.start();
    }

    let mut accum = 0.0f32;
    for segment in spline.segments() {
        if accum + segment.length() <= distance {
            accum += segment.length();
            continue;
        }
        return segment_point_at_distance(segment, distance - accum);
    }
    // Rundungsfehler der Längensumme
    spline.end()
}

/// Punkt bei uniformer Zeit über die gesamte Spline (0 = Start, 1 = Ende).
pub fn point_at(spline: &Spline, uniform_t: f32) -> Vec3 {
    point_at_distance(spline, uniform_t.clamp(0.0, 1.0) * spline.length())
}
