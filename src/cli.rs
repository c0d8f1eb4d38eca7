use clap::Parser;
use diagram_editor::app::use_cases::layout::{AlignEdge, DistributeAxis};
use std::path::PathBuf;

/// Importiert einen Diagramm-Snapshot, ordnet ihn optional an und exportiert ihn wieder.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Snapshot-Datei (JSON) zum Import
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Optionen-Datei (TOML); Standard: diagram_editor.toml neben der Binary
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Entsperrte Shapes an einer Kante ausrichten
    #[arg(long = "align", value_name = "left|right|top|bottom", value_parser = parse_edge)]
    pub align: Option<AlignEdge>,

    /// Entsperrte Shapes gleichmäßig verteilen
    #[arg(long = "distribute", value_name = "horizontal|vertical", value_parser = parse_axis)]
    pub distribute: Option<DistributeAxis>,

    /// Zieldatei für den Export; ohne Angabe auf stdout
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,
}

fn parse_edge(value: &str) -> Result<AlignEdge, String> {
    AlignEdge::parse(value).ok_or_else(|| format!("unbekannte Kante '{}'", value))
}

fn parse_axis(value: &str) -> Result<DistributeAxis, String> {
    DistributeAxis::parse(value).ok_or_else(|| format!("unbekannte Achse '{}'", value))
}
