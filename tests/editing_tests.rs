//! Integrationstests für Editier-Abläufe:
//! - Einfügen und Entfernen von Nodes mit Link-Reparatur
//! - Invalidierung über Listener und Revision
//! - Abfragen nach Änderungen

use bezier_spline_engine::ops::{
    closest_node, closest_point_to_ray, natural_to_uniform, point_at_distance,
};
use bezier_spline_engine::{
    ControlMode, CornerParameters, Ray3, Spline, SplineNode, SplineOptions,
};
use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;

/// Prüft, dass Nodes und Segmente konsistent verknüpft sind.
fn assert_links_consistent(spline: &Spline) {
    let count = spline.nodes.len();
    let expected = if spline.options.looped {
        count
    } else {
        count - 1
    };
    assert_eq!(spline.segments().len(), expected);

    for (i, node) in spline.nodes.iter().enumerate() {
        if let Some(right) = node.right_segment_index {
            let segment = &spline.segments()[right];
            assert_eq!(segment.first.position, node.position, "Node {}", i);
        }
        if let Some(left) = node.left_segment_index {
            let segment = &spline.segments()[left];
            assert_eq!(segment.second.position, node.position, "Node {}", i);
        }
    }
    let sum: f32 = spline.segments().iter().map(|s| s.length()).sum();
    assert!((spline.length() - sum).abs() < 1e-3);
}

/// Zickzack-Linie mit `n` Nodes.
fn zigzag(n: usize) -> Vec<Vec3> {
    (0..n)
        .map(|i| Vec3::new(if i % 2 == 0 { 0.0 } else { 5.0 }, 0.0, i as f32 * 10.0))
        .collect()
}

#[test]
fn test_repeated_inserts_keep_links_consistent() {
    let mut spline = Spline::from_positions(&zigzag(4), SplineOptions::default());

    for time in [0.5, 2.25, 4.75, 1.1] {
        spline.insert_node(time).expect("Einfügen erwartet");
        assert_links_consistent(&spline);
    }
    assert_eq!(spline.nodes.len(), 8);
}

#[test]
fn test_insert_then_remove_restores_shape() {
    let positions = zigzag(3);
    let mut spline = Spline::from_positions(&positions, SplineOptions::default());
    let before = spline.length();

    let index = spline.insert_node(1.5).expect("Einfügen erwartet");
    assert_links_consistent(&spline);
    spline.remove_node(index).expect("Entfernen erwartet");
    assert_links_consistent(&spline);

    let restored: Vec<Vec3> = spline.nodes.iter().map(|n| n.position).collect();
    assert_eq!(restored, positions);
    assert!((spline.length() - before).abs() < 1e-3);
}

#[test]
fn test_looped_spline_insert_on_closing_segment() {
    let options = SplineOptions {
        looped: true,
        ..SplineOptions::default()
    };
    let mut spline = Spline::from_positions(&zigzag(3), options);

    let index = spline.insert_node(2.5).expect("Einfügen erwartet");
    assert_eq!(index, 3);
    assert_eq!(spline.nodes.len(), 4);
    assert_links_consistent(&spline);
    assert_eq!(spline.end(), spline.start());
}

#[test]
fn test_listener_sees_recalculated_state() {
    let mut spline = Spline::from_positions(&zigzag(3), SplineOptions::default());
    let seen: Rc<RefCell<Vec<(u64, usize)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    spline.set_invalidation_listener(move |s| {
        sink.borrow_mut().push((s.revision(), s.nodes.len()));
    });

    spline.push_node(SplineNode::new(Vec3::new(0.0, 0.0, 40.0)));
    spline.recalculate();
    spline.nodes[0].mode = ControlMode::Flat;
    spline.recalculate();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].1, 4);
    assert!(seen[1].0 > seen[0].0);
}

#[test]
fn test_queries_follow_edits() {
    let mut spline = Spline::from_positions(&zigzag(3), SplineOptions::default());
    spline.nodes[2].position = Vec3::new(50.0, 0.0, 20.0);
    spline.recalculate();

    assert_eq!(closest_node(&spline, Vec3::new(49.0, 0.0, 21.0)), Some(2));
    let end = point_at_distance(&spline, spline.length() * 2.0);
    assert_eq!(end, Vec3::new(50.0, 0.0, 20.0));

    let ray = Ray3::new(Vec3::new(50.0, 10.0, 20.0), Vec3::NEG_Y);
    let hit = closest_point_to_ray(&spline, &ray, spline.options.ray_step).expect("Treffer");
    assert_eq!(hit.segment_index, 1);
    assert!(hit.point.position.distance(Vec3::new(50.0, 0.0, 20.0)) < 0.5);
}

#[test]
fn test_uniform_time_tables_are_monotonic_after_edit() {
    let mut spline = Spline::from_positions(&zigzag(5), SplineOptions::default());
    spline.nodes[2].position.x = -15.0;
    spline.recalculate();

    for segment in spline.segments() {
        let mut last = 0.0;
        for i in 0..=20 {
            let u = natural_to_uniform(segment, i as f32 / 20.0);
            assert!(u >= last - 1e-6);
            last = u;
        }
    }
}

#[test]
fn test_post_processing_keeps_endpoints() {
    let options = SplineOptions {
        simplify_threshold: 0.99,
        corners: CornerParameters {
            radius: 1.0,
            ..CornerParameters::default()
        },
        ..SplineOptions::default()
    };
    let spline = Spline::from_positions(&zigzag(6), options);

    let points = spline.all_points();
    assert!(points.len() >= 2);
    assert_eq!(points.first().map(|p| p.position), Some(spline.start()));
    assert_eq!(points.last().map(|p| p.position), Some(spline.end()));
}
