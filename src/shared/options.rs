//! Zentrale Konfiguration für Spline-Berechnung und Abfragen.
//!
//! `SplineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Sampling ────────────────────────────────────────────────────────

/// Standard-Schrittweite der natürlichen Zeit beim Sampling eines Segments.
pub const SEGMENT_RESOLUTION: f32 = 0.05;
/// Kleinste erlaubte Schrittweite (begrenzt die Tabellengröße pro Segment).
pub const MIN_RESOLUTION: f32 = 1.0e-4;

// ── Nachbearbeitung ─────────────────────────────────────────────────

/// Vereinfachungs-Schwelle; 1.0 deaktiviert die Vereinfachung.
pub const SIMPLIFY_THRESHOLD: f32 = 1.0;
/// Eck-Radius; 0.0 deaktiviert die Eck-Rundung.
pub const CORNER_RADIUS: f32 = 0.0;
/// Schrittweite für die Bögen der Eck-Rundung.
pub const CORNER_RESOLUTION: f32 = 0.1;
/// Richtungs-Schwelle (|dot| der Laufrichtungen) unterhalb derer eine Ecke gerundet wird.
pub const CORNER_THRESHOLD: f32 = 0.7;

// ── Abfragen ────────────────────────────────────────────────────────

/// Schrittweite (uniforme Zeit) für Strahl-Abfragen.
pub const RAY_STEP: f32 = 0.01;
/// Kleinste zulässige Schrittweite für Strahl-Abfragen (max. 10000 Proben pro Segment).
pub const MIN_RAY_STEP: f32 = 1.0e-4;
/// Abbruch-Schwelle der Bisektion für die nächste uniforme Zeit.
pub const BISECTION_THRESHOLD: f32 = 0.01;

/// Parameter der Eck-Rundung.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CornerParameters {
    /// Abstand der Bogen-Endpunkte von der Ecke (0 = aus)
    pub radius: f32,
    /// Natürliche-Zeit-Schrittweite beim Sampling des Bogens
    pub resolution: f32,
    /// Ecken mit |dot| der Laufrichtungen unterhalb dieses Werts werden gerundet
    pub threshold: f32,
}

impl Default for CornerParameters {
    fn default() -> Self {
        Self {
            radius: CORNER_RADIUS,
            resolution: CORNER_RESOLUTION,
            threshold: CORNER_THRESHOLD,
        }
    }
}

impl CornerParameters {
    /// Prüft ob die Eck-Rundung aktiv ist.
    pub fn is_enabled(&self) -> bool {
        self.radius != 0.0
    }

    /// Vergleichbarer Fingerabdruck der Parameter (bitgenau).
    pub fn fingerprint(&self) -> [u32; 3] {
        [
            self.radius.to_bits(),
            self.resolution.to_bits(),
            self.threshold.to_bits(),
        ]
    }
}

/// Richtungsquelle für Nodes im `Flat`-Modus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FlatTangentMode {
    /// Mittelt die Richtungen zum vorherigen und zum nächsten Node
    #[default]
    Averaged,
    /// Nutzt nur den linken Nachbarn (Verhalten älterer Datenbestände)
    LeftNeighbor,
}

/// Alle zur Laufzeit änderbaren Spline-Optionen.
/// Kann als TOML-Datei neben der Binary liegen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplineOptions {
    // ── Sampling ────────────────────────────────────────────────
    /// Natürliche-Zeit-Schrittweite pro Segment (kleiner = dichter)
    pub resolution: f32,
    /// Geschlossene Kurve (letzter Node verbindet zum ersten)
    #[serde(default)]
    pub looped: bool,

    // ── Nachbearbeitung ─────────────────────────────────────────
    /// Vereinfachungs-Schwelle der Punktliste (1.0 = aus)
    pub simplify_threshold: f32,
    /// Eck-Rundung
    #[serde(default)]
    pub corners: CornerParameters,
    /// Richtungsquelle für `Flat`-Nodes
    #[serde(default)]
    pub flat_tangents: FlatTangentMode,

    // ── Abfragen ────────────────────────────────────────────────
    /// Schrittweite für Strahl-Abfragen
    #[serde(default = "default_ray_step")]
    pub ray_step: f32,
    /// Abbruch-Schwelle der Bisektion
    #[serde(default = "default_bisection_threshold")]
    pub bisection_threshold: f32,
}

impl Default for SplineOptions {
    fn default() -> Self {
        Self {
            resolution: SEGMENT_RESOLUTION,
            looped: false,
            simplify_threshold: SIMPLIFY_THRESHOLD,
            corners: CornerParameters::default(),
            flat_tangents: FlatTangentMode::default(),
            ray_step: RAY_STEP,
            bisection_threshold: BISECTION_THRESHOLD,
        }
    }
}

/// Serde-Default für `ray_step` (Abwärtskompatibilität).
fn default_ray_step() -> f32 {
    RAY_STEP
}

/// Serde-Default für `bisection_threshold` (Abwärtskompatibilität).
fn default_bisection_threshold() -> f32 {
    BISECTION_THRESHOLD
}

impl SplineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("spline-engine"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("spline_engine.toml")
    }

    /// Effektive Schrittweite: auf `[MIN_RESOLUTION, 1]` geklemmt.
    pub fn effective_resolution(&self) -> f32 {
        clamp_resolution(self.resolution)
    }

    /// Prüft ob die Vereinfachung aktiv ist.
    pub fn simplify_enabled(&self) -> bool {
        self.simplify_threshold < 1.0
    }
}

/// Klemmt eine Schrittweite auf den gültigen Bereich; NaN fällt auf den Default zurück.
pub fn clamp_resolution(resolution: f32) -> f32 {
    if resolution.is_nan() {
        return SEGMENT_RESOLUTION;
    }
    resolution.clamp(MIN_RESOLUTION, 1.0)
}

/// Klemmt die Strahl-Schrittweite auf `[MIN_RAY_STEP, 1]`; NaN, unendlich oder
/// nicht-positive Werte fallen auf `RAY_STEP` zurück.
pub fn clamp_ray_step(step: f32) -> f32 {
    if !step.is_finite() || step <= 0.0 {
        return RAY_STEP;
    }
    step.clamp(MIN_RAY_STEP, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_post_processing() {
        let opts = SplineOptions::default();
        assert!(!opts.simplify_enabled());
        assert!(!opts.corners.is_enabled());
        assert!(!opts.looped);
    }

    #[test]
    fn test_toml_without_optional_fields_uses_defaults() {
        let opts: SplineOptions =
            toml::from_str("resolution = 0.1\nsimplify_threshold = 0.95\n").expect("TOML gültig");
        assert_eq!(opts.resolution, 0.1);
        assert_eq!(opts.corners, CornerParameters::default());
        assert_eq!(opts.ray_step, RAY_STEP);
        assert_eq!(opts.flat_tangents, FlatTangentMode::Averaged);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut opts = SplineOptions::default();
        opts.looped = true;
        opts.corners.radius = 2.5;
        opts.flat_tangents = FlatTangentMode::LeftNeighbor;
        let text = toml::to_string_pretty(&opts).expect("Serialisierung");
        let back: SplineOptions = toml::from_str(&text).expect("Deserialisierung");
        assert_eq!(back, opts);
    }

    #[test]
    fn test_clamp_resolution() {
        assert_eq!(clamp_resolution(0.0), MIN_RESOLUTION);
        assert_eq!(clamp_resolution(5.0), 1.0);
        assert_eq!(clamp_resolution(f32::NAN), SEGMENT_RESOLUTION);
    }

    #[test]
    fn test_clamp_ray_step() {
        assert_eq!(clamp_ray_step(1e-12), MIN_RAY_STEP);
        assert_eq!(clamp_ray_step(f32::NAN), RAY_STEP);
        assert_eq!(clamp_ray_step(-0.5), RAY_STEP);
        assert_eq!(clamp_ray_step(3.0), 1.0);
        assert_eq!(clamp_ray_step(0.05), 0.05);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let path = std::env::temp_dir().join("spline_engine_options_roundtrip_test.toml");
        let _ = std::fs::remove_file(&path);

        let mut opts = SplineOptions::default();
        opts.resolution = 0.02;
        opts.looped = true;
        opts.corners.radius = 1.5;
        opts.ray_step = 0.005;
        opts.save_to_file(&path).expect("Speichern erwartet");

        assert_eq!(SplineOptions::load_from_file(&path), opts);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("spline_engine_missing_options_test.toml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(SplineOptions::load_from_file(&path), SplineOptions::default());
    }
}
