//! In-memory scene model: everything the exporter reads, plus the two
//! places it writes (mesh triangulation, forced shading models).
//!
//! This plays the part a host 3D application's data model would play if the
//! exporter ran as a plugin inside one: an object hierarchy with mesh,
//! material, texture and animation data hanging off it, addressed by index.

pub mod animation;
pub mod material;
pub mod mesh;
pub mod object;
mod read;

pub use self::animation::{Action, Curve, DataPath, Interpolation, Keyframe};
pub use self::material::{Image, Material, ShadingModel, Texture, TextureSlot};
pub use self::mesh::{Loop, Mesh, Polygon, UvLayer};
pub use self::object::{Light, ObjectKind, PropValue, SceneObject};

use errors::Result;
use std::collections::HashMap;
use std::path::Path;

pub type ObjectId = usize;
pub type MeshId = usize;
pub type MaterialId = usize;
pub type TextureId = usize;

pub struct Scene {
    pub name: String,
    /// Frames per second. Keyframes are stored in frames and divided by
    /// this at export time.
    pub frame_rate: f64,
    /// World-level ambient color.
    pub ambient_color: [f32; 3],

    pub objects: Vec<SceneObject>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,

    pub meshes_by_name: HashMap<String, MeshId>,
    pub materials_by_name: HashMap<String, MaterialId>,
    pub textures_by_name: HashMap<String, TextureId>,
}

impl Scene {
    pub fn new<S: Into<String>>(name: S) -> Scene {
        Scene {
            name: name.into(),
            frame_rate: 24.0,
            ambient_color: [0.0, 0.0, 0.0],
            objects: vec![],
            meshes: vec![],
            materials: vec![],
            textures: vec![],
            meshes_by_name: HashMap::new(),
            materials_by_name: HashMap::new(),
            textures_by_name: HashMap::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Scene> {
        read::read_scene(path)
    }

    /// Parentless objects, in stored order. This is the root-visitation
    /// order for the export walk.
    pub fn roots(&self) -> Vec<ObjectId> {
        (0..self.objects.len())
            .filter(|&id| self.objects[id].parent.is_none())
            .collect()
    }

    /// Fill out the name→id maps.
    pub fn build_by_name_maps(&mut self) {
        use std::collections::hash_map::Entry::*;

        self.meshes_by_name = HashMap::new();
        self.materials_by_name = HashMap::new();
        self.textures_by_name = HashMap::new();

        let mut name_clash = false;
        for (id, mesh) in self.meshes.iter().enumerate() {
            match self.meshes_by_name.entry(mesh.name.clone()) {
                Vacant(ve) => { ve.insert(id); },
                Occupied(_) => {
                    warn!("multiple meshes have the name {}", mesh.name);
                    name_clash = true;
                }
            }
        }
        for (id, material) in self.materials.iter().enumerate() {
            match self.materials_by_name.entry(material.name.clone()) {
                Vacant(ve) => { ve.insert(id); },
                Occupied(_) => {
                    warn!("multiple materials have the name {}", material.name);
                    name_clash = true;
                }
            }
        }
        for (id, texture) in self.textures.iter().enumerate() {
            match self.textures_by_name.entry(texture.name.clone()) {
                Vacant(ve) => { ve.insert(id); },
                Occupied(_) => {
                    warn!("multiple textures have the name {}", texture.name);
                    name_clash = true;
                }
            }
        }

        if name_clash {
            warn!("since there were name clashes, some references might resolve wrong");
        }
    }

    pub fn print_status(&self) {
        let num_objects = self.objects.len();
        let num_meshes = self.meshes.len();
        let num_materials = self.materials.len();
        let num_textures = self.textures.len();

        let plural = |x: usize| if x != 1 { "s" } else { "" };
        let plural_es = |x: usize| if x != 1 { "es" } else { "" };
        println!("\nGot {} object{}, {} mesh{}, {} material{}, {} texture{}.\n",
            num_objects, plural(num_objects), num_meshes, plural_es(num_meshes),
            num_materials, plural(num_materials), num_textures, plural(num_textures),
        );
    }
}
