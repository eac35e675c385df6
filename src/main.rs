//! Spline-Engine Kommandozeile.
//!
//! Lädt ein Spline-Dokument, berechnet es und gibt Kennzahlen aus.
//! Aufruf: spline-engine [dokument.json] [--options optionen.toml] [--export punkte.json]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bezier_spline_engine::io::{load_spline_document, save_points};
use bezier_spline_engine::shared::polyline_length;
use bezier_spline_engine::{Spline, SplineOptions};

/// Geparste Kommandozeilen-Argumente.
#[derive(Debug, Default)]
struct CliArgs {
    document: Option<PathBuf>,
    options: Option<PathBuf>,
    export: Option<PathBuf>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--options" => {
                    let path = args.next().context("--options erwartet einen Pfad")?;
                    parsed.options = Some(PathBuf::from(path));
                }
                "--export" => {
                    let path = args.next().context("--export erwartet einen Pfad")?;
                    parsed.export = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => bail!("Unbekannte Option: {}", flag),
                _ if parsed.document.is_none() => parsed.document = Some(PathBuf::from(arg)),
                _ => bail!("Mehr als ein Dokument angegeben: {}", arg),
            }
        }
        Ok(parsed)
    }
}

fn main() -> Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Spline-Engine v{} startet...", env!("CARGO_PKG_VERSION"));

    let args = CliArgs::parse(std::env::args().skip(1))?;

    let mut spline = match &args.document {
        Some(path) => load_spline_document(path)?.into_spline(),
        None => {
            log::info!("Kein Dokument angegeben, nutze Default-Spline");
            Spline::default()
        }
    };

    let options_path = args.options.clone().or_else(|| {
        let path = SplineOptions::config_path();
        path.exists().then_some(path)
    });
    if let Some(path) = options_path {
        spline.options = SplineOptions::load_from_file(&path);
        spline.invalidate_all();
        spline.recalculate();
    }

    println!("Nodes:    {}", spline.nodes.len());
    println!("Segmente: {}", spline.segments().len());
    println!("Punkte:   {}", spline.all_points().len());
    println!("Länge:    {:.3}", spline.length());
    let polyline: Vec<_> = spline.all_points().iter().map(|p| p.position).collect();
    println!("Polyline: {:.3}", polyline_length(&polyline));
    println!("Start:    {}", spline.start());
    println!("Ende:     {}", spline.end());

    if let Some(path) = &args.export {
        save_points(path, &spline)?;
    }
    Ok(())
}
