//! Command-line arguments for the `gt5` binary.

use clap::Parser;
use std::path::PathBuf;

/// GT5 headless drawing engine.
///
/// Replays a JSON event script (pointer input, key presses, layer commands,
/// save and export requests) against a fresh canvas.
#[derive(Parser, Debug)]
#[command(name = "gt5", about = "Replay a GT5 event script and export the result")]
pub struct CliArgs {
    /// JSON file holding an array of events.
    #[arg(value_name = "SCRIPT.json")]
    pub script: PathBuf,

    /// Directory exports are written to.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Directory saved drawings live in. Defaults to the user data directory.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Export the final drawing in this format (png or jpeg) after the script.
    #[arg(short, long, value_name = "FORMAT")]
    pub export: Option<String>,

    /// Print the keyboard shortcuts and exit.
    #[arg(long)]
    pub shortcuts: bool,
}
