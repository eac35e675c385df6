//! Die zentrale Spline-Datenstruktur mit Nodes, Segmenten und gecachter Punktliste.

use glam::Vec3;

use super::{ControlEndpoint, SplineError, SplineNode, SplinePoint, SplineSegment};
use crate::ops::{add_corners, closest_point_to_ray, simplify};
use crate::shared::{frame_rotation, Ray3, SplineOptions};

/// Callback, der nach jeder Neuberechnung mit echter Arbeit aufgerufen wird.
///
/// Erhält nur eine geteilte Referenz: Nodes können im Callback nicht editiert werden.
pub type InvalidationListener = Box<dyn FnMut(&Spline)>;

/// Abstand des zweiten Default-Nodes entlang +Z.
const DEFAULT_NODE_DISTANCE: f32 = 10.0;

/// Fingerabdruck der Nachbearbeitungs-Parameter (Ecken + Vereinfachung).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PostProcessFingerprint {
    corners: [u32; 3],
    simplify_threshold: u32,
}

impl PostProcessFingerprint {
    fn of(options: &SplineOptions) -> Self {
        Self {
            corners: options.corners.fingerprint(),
            simplify_threshold: options.simplify_threshold.to_bits(),
        }
    }
}

/// Anzahl der Segmente für `node_count` Nodes.
pub fn expected_segment_count(node_count: usize, looped: bool) -> usize {
    if looped {
        node_count
    } else {
        node_count.saturating_sub(1)
    }
}

/// Linker und rechter Segment-Index für Node `index`.
fn segment_links(index: usize, node_count: usize, looped: bool) -> (Option<usize>, Option<usize>) {
    let count = expected_segment_count(node_count, looped);
    let left = if index > 0 {
        Some(index - 1)
    } else if looped && count > 0 {
        Some(count - 1)
    } else {
        None
    };
    let right = (index < count).then_some(index);
    (left, right)
}

/// Kubische Bezier-Spline aus editierbaren Nodes.
///
/// Nodes liegen in einer Arena (`nodes`), Segmente referenzieren sie nur über
/// Indizes. Segment `k` verläuft von Node `k` zu Node `k + 1` (bzw. Node 0 bei Loop).
pub struct Spline {
    /// Kontroll-Nodes in Kurvenreihenfolge
    pub nodes: Vec<SplineNode>,
    /// Laufzeit-Optionen
    pub options: SplineOptions,
    segments: Vec<SplineSegment>,
    all_points: Vec<SplinePoint>,
    length: f32,
    post_fingerprint: Option<PostProcessFingerprint>,
    revision: u64,
    listener: Option<InvalidationListener>,
}

impl std::fmt::Debug for Spline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spline")
            .field("nodes", &self.nodes)
            .field("options", &self.options)
            .field("segments", &self.segments.len())
            .field("all_points", &self.all_points.len())
            .field("length", &self.length)
            .field("revision", &self.revision)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Clone for Spline {
    /// Klont den Datenbestand; ein gesetzter Listener wird nicht übernommen.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            options: self.options.clone(),
            segments: self.segments.clone(),
            all_points: self.all_points.clone(),
            length: self.length,
            post_fingerprint: self.post_fingerprint,
            revision: self.revision,
            listener: None,
        }
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new(SplineOptions::default())
    }
}

impl Spline {
    /// Erstellt eine Spline mit den zwei Default-Nodes, bereits berechnet.
    pub fn new(options: SplineOptions) -> Self {
        Self::from_nodes(Vec::new(), options)
    }

    /// Erstellt eine Spline aus vorhandenen Nodes und berechnet sie vollständig.
    pub fn from_nodes(nodes: Vec<SplineNode>, options: SplineOptions) -> Self {
        let mut spline = Self {
            nodes,
            options,
            segments: Vec::new(),
            all_points: Vec::new(),
            length: 0.0,
            post_fingerprint: None,
            revision: 0,
            listener: None,
        };
        spline.recalculate();
        spline
    }

    /// Erstellt eine Spline aus Positionen (alle Nodes im `Straight`-Modus).
    pub fn from_positions(positions: &[Vec3], options: SplineOptions) -> Self {
        Self::from_nodes(positions.iter().copied().map(SplineNode::new).collect(), options)
    }

    /// Abgeleitete Segmente.
    pub fn segments(&self) -> &[SplineSegment] {
        &self.segments
    }

    /// Zusammengesetzte (ggf. gerundete und vereinfachte) Punktliste.
    pub fn all_points(&self) -> &[SplinePoint] {
        &self.all_points
    }

    /// Gesamtlänge als Summe der Segment-Längen.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Zähler der Neuberechnungen mit echter Arbeit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Startpunkt der Kurve.
    pub fn start(&self) -> Vec3 {
        self.segments
            .first()
            .map(|s| s.first.position)
            .or_else(|| self.nodes.first().map(|n| n.position))
            .unwrap_or(Vec3::ZERO)
    }

    /// Endpunkt der Kurve (bei Loop identisch mit dem Start).
    pub fn end(&self) -> Vec3 {
        self.segments
            .last()
            .map(|s| s.second.position)
            .or_else(|| self.nodes.last().map(|n| n.position))
            .unwrap_or(Vec3::ZERO)
    }

    /// Registriert den Invalidierungs-Callback (ersetzt einen vorhandenen).
    pub fn set_invalidation_listener(&mut self, listener: impl FnMut(&Spline) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Entfernt den Invalidierungs-Callback.
    pub fn clear_invalidation_listener(&mut self) {
        self.listener = None;
    }

    /// Prüft ob die nächste Neuberechnung Arbeit verrichten würde.
    pub fn is_dirty(&self) -> bool {
        let expected = expected_segment_count(self.nodes.len(), self.options.looped);
        self.nodes.is_empty()
            || self.segments.len() != expected
            || self.post_fingerprint != Some(PostProcessFingerprint::of(&self.options))
            || self
                .segments
                .iter()
                .any(|s| s.resolution != self.options.effective_resolution())
            || self.nodes.iter().enumerate().any(|(i, node)| {
                let (left, right) = segment_links(i, self.nodes.len(), self.options.looped);
                node.left_segment_index != left
                    || node.right_segment_index != right
                    || node.is_dirty()
            })
    }

    /// Erzwingt eine vollständige Neuberechnung beim nächsten Aufruf.
    pub fn invalidate_all(&mut self) {
        for node in &mut self.nodes {
            node.invalidate();
        }
        self.post_fingerprint = None;
    }

    /// Berechnet geänderte Segmente und die Punktliste neu.
    ///
    /// Idempotent: ohne Änderung seit dem letzten Aufruf wird nichts getan und
    /// `false` zurückgegeben. Sonst wird die Revision erhöht und der Listener
    /// genau einmal benachrichtigt.
    pub fn recalculate(&mut self) -> bool {
        if self.nodes.is_empty() {
            self.seed_default_nodes();
        }

        let resolution = self.options.effective_resolution();
        let looped = self.options.looped;
        let node_count = self.nodes.len();
        let expected = expected_segment_count(node_count, looped);

        let mut stale = vec![false; expected];
        for (i, segment) in self.segments.iter_mut().enumerate() {
            if segment.resolution != resolution {
                segment.resolution = resolution;
                if let Some(flag) = stale.get_mut(i) {
                    *flag = true;
                }
            }
        }

        for i in 0..node_count {
            let (left, right) = segment_links(i, node_count, looped);
            for index in [left, right].into_iter().flatten() {
                self.ensure_segment(index, resolution, &mut stale);
            }

            let prev = left.map(|_| self.nodes[(i + node_count - 1) % node_count].position);
            let next = right.map(|_| self.nodes[(i + 1) % node_count].position);

            let node = &mut self.nodes[i];
            node.left_segment_index = left;
            node.right_segment_index = right;
            node.derive_handles(prev, next, self.options.flat_tangents);

            if node.is_dirty() {
                for index in [left, right].into_iter().flatten() {
                    stale[index] = true;
                }
                node.mark_clean();
            }
        }

        let mut dirty = false;
        let mut resampled = 0usize;
        for (index, _) in stale.iter().enumerate().filter(|(_, s)| **s) {
            let first = &self.nodes[index];
            let second = &self.nodes[(index + 1) % node_count];
            let segment = &mut self.segments[index];
            segment.first = ControlEndpoint {
                position: first.position,
                control: first.right_control,
                up_vector: first.up_vector,
                rotation: frame_rotation(first.right_control, first.up_vector),
            };
            segment.second = ControlEndpoint {
                position: second.position,
                control: second.left_control,
                up_vector: second.up_vector,
                rotation: frame_rotation(-second.left_control, second.up_vector),
            };
            segment.recalculate();
            resampled += 1;
            dirty = true;
        }

        if self.segments.len() > expected {
            self.segments.truncate(expected);
            dirty = true;
        }

        let post_fingerprint = PostProcessFingerprint::of(&self.options);
        if self.post_fingerprint != Some(post_fingerprint) {
            self.post_fingerprint = Some(post_fingerprint);
            dirty = true;
        }

        if !dirty {
            return false;
        }

        self.rebuild_points();
        self.length = self.segments.iter().map(SplineSegment::length).sum();
        self.revision += 1;

        log::debug!(
            "Spline neu berechnet: {} Segmente ({} neu gesampelt), {} Punkte, Länge {:.3}",
            self.segments.len(),
            resampled,
            self.all_points.len(),
            self.length
        );

        if let Some(mut listener) = self.listener.take() {
            listener(self);
            self.listener = Some(listener);
        }
        true
    }

    /// Fügt einen Node an der Position `segment_index + natürliche Zeit` ein.
    ///
    /// Der ganzzahlige Anteil wählt das Segment, der Bruchteil die natürliche Zeit
    /// darin. Gibt den Index des neuen Nodes zurück.
    pub fn insert_node(&mut self, time: f32) -> Result<usize, SplineError> {
        if !time.is_finite() || time < 0.0 {
            log::warn!("Einfügen abgelehnt: ungültige Zeit {}", time);
            return Err(SplineError::InvalidTime { time });
        }
        self.recalculate();

        let segment_index = time.floor() as usize;
        let fraction = time - time.floor();
        let count = self.segments.len();
        if segment_index >= count {
            log::warn!(
                "Einfügen abgelehnt: Segment {} existiert nicht ({} Segmente)",
                segment_index,
                count
            );
            return Err(SplineError::SegmentOutOfRange {
                index: segment_index,
                count,
            });
        }

        let owner = self
            .nodes
            .iter()
            .position(|n| n.right_segment_index == Some(segment_index))
            .ok_or(SplineError::NoOwningNode {
                index: segment_index,
            })?;

        let segment = &self.segments[segment_index];
        let mut node = SplineNode::new(segment.point_at_natural(fraction))
            .with_mode(self.nodes[owner].mode);
        node.up_vector = segment.up_vector(fraction);
        node.left_segment_index = Some(segment_index);
        node.right_segment_index = Some(segment_index + 1);

        let insert_at = owner + 1;
        self.nodes.insert(insert_at, node);
        self.segments.insert(
            segment_index + 1,
            SplineSegment::new(
                ControlEndpoint::default(),
                ControlEndpoint::default(),
                self.options.effective_resolution(),
            ),
        );

        self.invalidate_all();
        self.recalculate();
        log::debug!("Node {} bei Zeit {:.3} eingefügt", insert_at, time);
        Ok(insert_at)
    }

    /// Fügt einen Node an der Stelle ein, die dem Strahl am nächsten liegt.
    ///
    /// Tastet mit `options.ray_step` ab. Gibt den Index des neuen Nodes zurück.
    pub fn insert_node_at_ray(&mut self, ray: &Ray3) -> Result<usize, SplineError> {
        self.recalculate();
        let hit = closest_point_to_ray(self, ray, self.options.ray_step).ok_or(
            SplineError::SegmentOutOfRange {
                index: 0,
                count: 0,
            },
        )?;
        // Bruchteil 1.0 würde auf das nächste Segment springen
        let time = hit.segment_index as f32 + hit.point.natural_time.min(0.999);
        self.insert_node(time)
    }

    /// Hängt einen Node am Ende an und berechnet neu.
    pub fn push_node(&mut self, node: SplineNode) -> usize {
        self.nodes.push(node);
        self.recalculate();
        self.nodes.len() - 1
    }

    /// Entfernt den Node `index` und berechnet neu.
    pub fn remove_node(&mut self, index: usize) -> Result<SplineNode, SplineError> {
        let count = self.nodes.len();
        if index >= count {
            log::warn!("Entfernen abgelehnt: Node {} existiert nicht", index);
            return Err(SplineError::NodeOutOfRange { index, count });
        }
        let removed = self.nodes.remove(index);
        self.invalidate_all();
        self.recalculate();
        Ok(removed)
    }

    /// Öffnet oder schließt die Kurve.
    pub fn set_looped(&mut self, looped: bool) {
        if self.options.looped != looped {
            self.options.looped = looped;
            self.invalidate_all();
        }
    }

    /// Setzt alle Handles auf null zurück (nur `Flat`-Nodes behalten danach eine
    /// Fallback-Länge, `Straight`-Nodes leiten ihre Handles ohnehin neu ab).
    pub fn reset_controls(&mut self) {
        for node in &mut self.nodes {
            node.left_control = Vec3::ZERO;
            node.right_control = Vec3::ZERO;
        }
    }

    /// Wendet eine Transformation auf alle Nodes an (Positionen und Handles).
    pub fn apply_transform(&mut self, mat: glam::Mat4) {
        for node in &mut self.nodes {
            node.position = mat.transform_point3(node.position);
            node.left_control = mat.transform_vector3(node.left_control);
            node.right_control = mat.transform_vector3(node.right_control);
            node.up_vector = mat.transform_vector3(node.up_vector).normalize_or(Vec3::Y);
        }
    }

    fn seed_default_nodes(&mut self) {
        log::debug!("Spline ohne Nodes, lege Default-Nodes an");
        self.nodes.push(SplineNode::new(Vec3::ZERO));
        self.nodes
            .push(SplineNode::new(Vec3::new(0.0, 0.0, DEFAULT_NODE_DISTANCE)));
    }

    fn ensure_segment(&mut self, index: usize, resolution: f32, stale: &mut [bool]) {
        while self.segments.len() <= index {
            stale[self.segments.len()] = true;
            self.segments.push(SplineSegment::new(
                ControlEndpoint::default(),
                ControlEndpoint::default(),
                resolution,
            ));
        }
    }

    /// Setzt die Punktliste aus den Segmenten zusammen und wendet die Nachbearbeitung an.
    fn rebuild_points(&mut self) {
        let capacity = self.segments.iter().map(|s| s.points().len()).sum();
        let mut points: Vec<SplinePoint> = Vec::with_capacity(capacity);
        let last = self.segments.len().saturating_sub(1);
        for (i, segment) in self.segments.iter().enumerate() {
            let pts = segment.points();
            if i == last {
                points.extend_from_slice(pts);
            } else if let Some((_, head)) = pts.split_last() {
                points.extend_from_slice(head);
            }
        }

        if self.options.corners.is_enabled() {
            points = add_corners(&points, &self.options.corners);
        }
        if self.options.simplify_enabled() {
            simplify(&mut points, self.options.simplify_threshold);
        }
        self.all_points = points;
    }
}
