/// Crane3D - interactive tower crane in the terminal
///
/// Drive the rig with the keyboard:
///   - i/k: raise/lower the lift, w/s: raise/lower the hook
///   - a/d: trolley out/in, j/l: slew left/right, 9: open/close the jaws
///   - 1-4: view presets, arrows: orbit, 0: wireframe/solid
///   - q/ESC: quit
use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use crane3d_core::{parse_preset, CraneState, DrawStyle, RigConfig};
use crane3d_terminal::{input, CraneApp};

#[derive(Parser)]
#[command(name = "crane3d", version, about = "Interactive tower crane in the terminal")]
struct Cli {
    /// Rig preset file (one `key value` per line)
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    rig: Option<PathBuf>,

    /// Builtin rig preset
    #[arg(long, default_value = "compact")]
    preset: String,

    /// Starting view: 1 front, 2 top, 3 right, 4 axonometric
    #[arg(long, value_name = "N")]
    view: Option<u8>,

    /// Start in solid draw style instead of wireframe
    #[arg(long)]
    solid: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let rig = match &cli.rig {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            parse_preset(&text).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("{}: {}", path.display(), e))
            })?
        }
        None => RigConfig::builtin(&cli.preset).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown preset `{}` (try compact or high-mast)", cli.preset),
            )
        })?,
    };

    let mut state = CraneState::new(rig);
    if let Some(n) = cli.view {
        let view = input::view_for_index(n).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("view must be 1-4, got {}", n),
            )
        })?;
        state.set_view(view);
    }
    if cli.solid {
        state.set_draw_style(DrawStyle::Solid);
    }

    let mut app = CraneApp::new(state)?;
    app.run()
}
