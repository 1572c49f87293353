//! The `info` subcommand: dump what a scene file contains.

use cli::Args;
use errors::Result;
use scene::Scene;
use std::path::PathBuf;

pub fn main(args: &Args) -> Result<()> {
    let input = PathBuf::from(&args.free_args[0]);
    let scene = Scene::from_file(&input)?;

    scene.print_status();

    for (id, obj) in scene.objects.iter().enumerate() {
        println!("Object {}:", id);
        println!("  Name: {:?}", obj.name);
        println!("  Kind: {}", obj.kind.as_str());
        if let Some(parent) = obj.parent {
            println!("  Parent: {:?}", scene.objects[parent].name);
        }
        if let Some(mesh) = obj.mesh {
            println!("  Mesh: {:?}", scene.meshes[mesh].name);
        }
        if !obj.properties.is_empty() {
            println!("  Properties:");
            for &(ref key, ref value) in &obj.properties {
                println!("    {} = {}", key, value);
            }
        }
        if let Some(ref action) = obj.action {
            println!("  Animation: {} curve(s)", action.curves.len());
        }
    }

    for (id, mesh) in scene.meshes.iter().enumerate() {
        println!("Mesh {}:", id);
        println!("  Name: {:?}", mesh.name);
        println!("  Vertices: {}", mesh.positions.len());
        println!("  Polygons: {}", mesh.polygons.len());
        println!("  UV Layers: {}", mesh.uv_layers.len());
        println!("  Materials: {}", mesh.materials.len());
    }

    for (id, material) in scene.materials.iter().enumerate() {
        println!("Material {}:", id);
        println!("  Name: {:?}", material.name);
        println!("  Shading: {:?}", material.shading);
        println!("  Texture Slots: {}", material.texture_slots.len());
    }

    for (id, texture) in scene.textures.iter().enumerate() {
        println!("Texture {}:", id);
        println!("  Name: {:?}", texture.name);
        match texture.image {
            Some(ref image) => println!("  Image: {}", image.filepath),
            None => println!("  Image: (none)"),
        }
    }

    Ok(())
}
