/// Example: run the taller builtin rig
///
/// Usage: cargo run --example high_mast

use std::io;

use crane3d_core::{CraneState, RigConfig};
use crane3d_terminal::CraneApp;

fn main() -> io::Result<()> {
    let rig = RigConfig::high_mast();
    println!("Starting {} rig (press Q to quit)...", rig.name);
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = CraneApp::new(CraneState::new(rig))?;
    app.run()
}
