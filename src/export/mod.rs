//! The `export` subcommand: read a scene description, write one `.dae`.

pub mod collada;

use cli::Args;
use errors::Result;
use scene::Scene;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn main(args: &Args) -> Result<()> {
    let input = PathBuf::from(&args.free_args[0]);
    let output = PathBuf::from(args.get_opt("output").unwrap());

    let mut scene = Scene::from_file(&input)?;
    scene.print_status();

    export_file(&mut scene, &output)
}

/// The whole export: builds the document for `scene` and writes it to
/// `path`. Destructive on the scene (meshes get triangulated, materials
/// forced to Phong), and nothing is rolled back if the write fails.
pub fn export_file(scene: &mut Scene, path: &Path) -> Result<()> {
    let s = collada::write_dae(scene)?;
    let mut f = File::create(path)?;
    f.write_all(s.as_bytes())?;
    info!("wrote {}", path.to_string_lossy());
    Ok(())
}
