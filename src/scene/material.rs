//! Materials, texture slots, and image textures.

use scene::TextureId;

pub struct Material {
    pub name: String,
    pub shading: ShadingModel,
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub mirror_color: [f32; 3],
    /// Scalar ambient factor.
    pub ambient: f64,
    pub alpha: f64,
    pub specular_hardness: i32,
    pub texture_slots: Vec<TextureSlot>,
}

/// Host shading models. The export forces every material to Phong before
/// writing effects; the engine's importer reads nothing else.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShadingModel {
    CookTorr,
    Phong,
    Blinn,
    Toon,
}

impl ShadingModel {
    pub fn from_str(s: &str) -> Option<ShadingModel> {
        match s {
            "COOKTORR" => Some(ShadingModel::CookTorr),
            "PHONG" => Some(ShadingModel::Phong),
            "BLINN" => Some(ShadingModel::Blinn),
            "TOON" => Some(ShadingModel::Toon),
            _ => None,
        }
    }

    /// Element tag inside the effect technique: the lowercased host name.
    pub fn dae_tag(&self) -> &'static str {
        match *self {
            ShadingModel::CookTorr => "cooktorr",
            ShadingModel::Phong => "phong",
            ShadingModel::Blinn => "blinn",
            ShadingModel::Toon => "toon",
        }
    }
}

/// One texture binding on a material. A slot can influence several
/// channels at once.
pub struct TextureSlot {
    pub texture: TextureId,
    pub use_diffuse: bool,
    pub use_specular: bool,
    pub use_emission: bool,
    pub use_normal: bool,
    /// Host blend mode, passed through into the MAYA technique block.
    pub blend_mode: String,
}

pub struct Texture {
    pub name: String,
    /// Textures with no image are skipped at export.
    pub image: Option<Image>,
}

pub struct Image {
    pub filepath: String,
}
