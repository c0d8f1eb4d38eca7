//! Diagram Editor (Kommandozeile).
//!
//! Importiert einen Snapshot, wendet optionale Layout-Operationen an, prüft
//! das Ergebnis und schreibt den exportierten Snapshot.

mod cli;

use anyhow::Context;
use clap::Parser;
use diagram_editor::app::use_cases::{analysis, layout, transfer};
use diagram_editor::{EditorController, EditorOptions, EditorState};

fn main() -> anyhow::Result<()> {
    // Logger initialisieren, RUST_LOG hat Vorrang
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    log::info!("Diagram Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.clone().unwrap_or_else(EditorOptions::config_path);
    let options = EditorOptions::load_from_file(&config_path);
    let mut state = EditorState::with_options(options);
    let mut controller = EditorController::new();

    let json = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("Snapshot nicht lesbar: {}", args.snapshot.display()))?;
    let report = transfer::import_json(&mut state, &json)
        .with_context(|| format!("Import fehlgeschlagen: {}", args.snapshot.display()))?;
    log::info!(
        "{} Shapes und {} Verbindungen importiert",
        report.counts.shapes,
        report.counts.connections
    );

    if let Some(edge) = args.align {
        layout::align_shapes(&mut state, edge);
    }
    if let Some(axis) = args.distribute {
        layout::distribute_shapes(&mut state, axis);
    }
    controller.process_queued_commands(&mut state)?;

    let validation = analysis::validate_diagram(&state);
    if validation.valid {
        log::info!("Diagramm konsistent");
    } else {
        log::warn!("{} Konsistenzprobleme gefunden", validation.messages.len());
    }
    let overlaps = analysis::overlapping_shapes(&state);
    if !overlaps.is_empty() {
        log::warn!("{} überlappende Shape-Paare: {:?}", overlaps.len(), overlaps);
    }
    let unlabeled = analysis::unlabeled_connections(&state);
    if !unlabeled.is_empty() {
        log::info!("Verbindungen ohne Label: {:?}", unlabeled);
    }

    let output = transfer::export_json(&state)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Export nicht schreibbar: {}", path.display()))?;
            log::info!("Snapshot geschrieben nach: {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}
