//! Editierbarer Kontroll-Node einer Spline.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::shared::FlatTangentMode;

/// Unterhalb dieser Länge gilt ein Handle als nicht gesetzt.
const HANDLE_EPSILON: f32 = 1.0e-6;

/// Wie die Tangenten-Handles eines Nodes aus den Nachbarn abgeleitet werden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Handles zeigen jeweils auf den halben Weg zum Nachbarn (Knick erlaubt)
    #[default]
    Straight,
    /// Beide Handles liegen auf einer Geraden durch den Node, Längen bleiben erhalten
    Flat,
}

/// Ein editierbarer Kontroll-Node.
///
/// Handles sind Offsets relativ zu `position`, keine absoluten Punkte.
/// Segment-Indizes werden bei jeder Neuberechnung repariert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplineNode {
    /// Weltposition
    pub position: Vec3,
    /// Up-Vektor für Orientierung entlang der Kurve
    #[serde(default = "default_up_vector")]
    pub up_vector: Vec3,
    /// Handle Richtung vorheriger Node
    #[serde(default)]
    pub left_control: Vec3,
    /// Handle Richtung nächster Node
    #[serde(default)]
    pub right_control: Vec3,
    /// Index des linken Segments (None am Anfang einer offenen Kurve)
    #[serde(default)]
    pub left_segment_index: Option<usize>,
    /// Index des rechten Segments (None am Ende einer offenen Kurve)
    #[serde(default)]
    pub right_segment_index: Option<usize>,
    /// Handle-Modus
    #[serde(default)]
    pub mode: ControlMode,
    /// Fingerabdruck bei der letzten Neuberechnung (transient)
    #[serde(skip)]
    last_fingerprint: Option<u64>,
}

fn default_up_vector() -> Vec3 {
    Vec3::Y
}

impl Default for SplineNode {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl PartialEq for SplineNode {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.up_vector == other.up_vector
            && self.left_control == other.left_control
            && self.right_control == other.right_control
            && self.left_segment_index == other.left_segment_index
            && self.right_segment_index == other.right_segment_index
            && self.mode == other.mode
    }
}

impl SplineNode {
    /// Erstellt einen Node im `Straight`-Modus ohne Handles.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            up_vector: Vec3::Y,
            left_control: Vec3::ZERO,
            right_control: Vec3::ZERO,
            left_segment_index: None,
            right_segment_index: None,
            mode: ControlMode::Straight,
            last_fingerprint: None,
        }
    }

    /// Setzt den Handle-Modus (Builder).
    pub fn with_mode(mut self, mode: ControlMode) -> Self {
        self.mode = mode;
        self
    }

    /// Setzt beide Handles (Builder).
    pub fn with_controls(mut self, left: Vec3, right: Vec3) -> Self {
        self.left_control = left;
        self.right_control = right;
        self
    }

    /// Fingerabdruck aller editierbaren und abgeleiteten Felder.
    ///
    /// Floats gehen bitgenau ein, damit jede Änderung erkannt wird.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for v in [
            self.position,
            self.up_vector,
            self.left_control,
            self.right_control,
        ] {
            v.to_array().map(f32::to_bits).hash(&mut hasher);
        }
        self.left_segment_index.hash(&mut hasher);
        self.right_segment_index.hash(&mut hasher);
        self.mode.hash(&mut hasher);
        hasher.finish()
    }

    /// Prüft ob sich der Node seit der letzten Neuberechnung geändert hat.
    pub fn is_dirty(&self) -> bool {
        self.last_fingerprint != Some(self.fingerprint())
    }

    /// Merkt den aktuellen Zustand als berechnet.
    pub(crate) fn mark_clean(&mut self) {
        self.last_fingerprint = Some(self.fingerprint());
    }

    /// Erzwingt eine Neuberechnung beim nächsten Durchlauf.
    pub fn invalidate(&mut self) {
        self.last_fingerprint = None;
    }

    /// Leitet die Handles aus den Positionen der Nachbar-Nodes ab.
    ///
    /// `prev`/`next` sind `None` wenn auf der jeweiligen Seite kein Segment existiert.
    pub(crate) fn derive_handles(
        &mut self,
        prev: Option<Vec3>,
        next: Option<Vec3>,
        flat_tangents: FlatTangentMode,
    ) {
        match self.mode {
            ControlMode::Straight => self.derive_straight(prev, next),
            ControlMode::Flat => {
                let dir = flat_direction(self.position, prev, next, flat_tangents);
                if dir == Vec3::ZERO {
                    self.derive_straight(prev, next);
                    return;
                }
                let left = match prev {
                    Some(p) => -dir * handle_length(self.left_control, self.position, p),
                    None => Vec3::ZERO,
                };
                let right = match next {
                    Some(n) => dir * handle_length(self.right_control, self.position, n),
                    None => Vec3::ZERO,
                };
                self.left_control = settle(self.left_control, left);
                self.right_control = settle(self.right_control, right);
            }
        }
    }

    fn derive_straight(&mut self, prev: Option<Vec3>, next: Option<Vec3>) {
        self.left_control = prev.map_or(Vec3::ZERO, |p| (p - self.position) * 0.5);
        self.right_control = next.map_or(Vec3::ZERO, |n| (n - self.position) * 0.5);
    }
}

/// Laufrichtung durch den Node für den `Flat`-Modus.
fn flat_direction(
    position: Vec3,
    prev: Option<Vec3>,
    next: Option<Vec3>,
    flat_tangents: FlatTangentMode,
) -> Vec3 {
    let incoming = prev.map(|p| (position - p).normalize_or_zero());
    let outgoing = next.map(|n| (n - position).normalize_or_zero());
    match (flat_tangents, incoming, outgoing) {
        (FlatTangentMode::Averaged, Some(i), Some(o)) => (i + o).normalize_or_zero(),
        (FlatTangentMode::LeftNeighbor, Some(i), _) => i,
        (_, Some(i), None) => i,
        (_, None, Some(o)) => o,
        (_, None, None) => Vec3::ZERO,
    }
}

/// Behält den alten Handle bei Rundungsrauschen, sonst bliebe der Node dauerhaft dirty.
fn settle(current: Vec3, derived: Vec3) -> Vec3 {
    if current.abs_diff_eq(derived, HANDLE_EPSILON * current.length().max(1.0)) {
        current
    } else {
        derived
    }
}

/// Bestehende Handle-Länge, ersatzweise der halbe Abstand zum Nachbarn.
fn handle_length(current: Vec3, position: Vec3, neighbor: Vec3) -> f32 {
    let len = current.length();
    if len > HANDLE_EPSILON {
        len
    } else {
        position.distance(neighbor) * 0.5
    }
}
