//! Materials, effects and images.
//!
//! One `<material>`/`<effect>` pair per scene material under a Phong
//! technique, with texture slots resolved into channel buckets by their
//! usage flags; one `<image>` per texture that actually has one.

use export::collada::encode;
use export::collada::xml::{Document, ElemId};
use scene::{Material, MaterialId, Scene, Texture, TextureSlot};
use smallvec::SmallVec;

/// Texture slots sorted into the channels they influence. A slot may sit
/// in several buckets at once.
pub struct SlotBuckets<'a> {
    pub diffuse: SmallVec<[&'a TextureSlot; 4]>,
    pub specular: SmallVec<[&'a TextureSlot; 4]>,
    pub emission: SmallVec<[&'a TextureSlot; 4]>,
    /// Collected like the others but consumed by no channel.
    /// TODO: emit these as a bump technique once the engine importer
    /// grows one.
    pub normal: SmallVec<[&'a TextureSlot; 4]>,
}

pub fn partition_slots(material: &Material) -> SlotBuckets {
    let mut buckets = SlotBuckets {
        diffuse: SmallVec::new(),
        specular: SmallVec::new(),
        emission: SmallVec::new(),
        normal: SmallVec::new(),
    };
    for slot in &material.texture_slots {
        if slot.use_diffuse { buckets.diffuse.push(slot); }
        if slot.use_specular { buckets.specular.push(slot); }
        if slot.use_emission { buckets.emission.push(slot); }
        if slot.use_normal { buckets.normal.push(slot); }
    }
    buckets
}

pub fn write_material(
    doc: &mut Document,
    lib_materials: ElemId,
    lib_effects: ElemId,
    scene: &Scene,
    material_id: MaterialId,
) {
    let material = &scene.materials[material_id];
    let fx_id = format!("{}-fx", material.name);

    let this_material = doc.add(lib_materials, "material");
    doc.set_attr(this_material, "id", material.name.clone());
    doc.set_attr(this_material, "name", material.name.clone());
    let instance = doc.add(this_material, "instance_effect");
    doc.set_attr(instance, "url", format!("#{}", fx_id));

    let effect = doc.add(lib_effects, "effect");
    doc.set_attr(effect, "id", fx_id);
    doc.set_attr(effect, "name", material.name.clone());
    let profile = doc.add(effect, "profile_COMMON");
    let technique = doc.add(profile, "technique");
    doc.set_attr(technique, "sid", "standard");
    let shader = doc.add(technique, material.shading.dae_tag());

    let buckets = partition_slots(material);
    if !buckets.normal.is_empty() {
        warn!("material {}: normal-map textures are not exported", material.name);
    }

    // Emission: the diffuse color as the base, emission textures on top
    let emission = doc.add(shader, "emission");
    let color = doc.add(emission, "color");
    doc.set_attr(color, "sid", "emission");
    doc.set_text(color, encode::color(material.diffuse_color));
    for &slot in &buckets.emission {
        texture_ref(doc, emission, scene, slot);
    }

    // Ambient: world ambient color with the material's scalar factor as a
    // fourth token; the engine reads the four-token form
    let ambient = doc.add(shader, "ambient");
    let color = doc.add(ambient, "color");
    doc.set_attr(color, "sid", "ambient");
    doc.set_text(color, format!("{} {}",
        encode::color(scene.ambient_color),
        encode::float(material.ambient),
    ));

    // Diffuse: a flat color only when untextured
    let diffuse = doc.add(shader, "diffuse");
    if buckets.diffuse.is_empty() {
        let color = doc.add(diffuse, "color");
        doc.set_attr(color, "sid", "diffuse");
        doc.set_text(color, encode::color(material.diffuse_color));
    }
    for &slot in &buckets.diffuse {
        texture_ref(doc, diffuse, scene, slot);
    }

    // Specular: flat color always, textures appended after
    let specular = doc.add(shader, "specular");
    let color = doc.add(specular, "color");
    doc.set_attr(color, "sid", "specular");
    doc.set_text(color, encode::color(material.specular_color));
    for &slot in &buckets.specular {
        texture_ref(doc, specular, scene, slot);
    }
    let shininess = doc.add(shader, "shininess");
    let shine = doc.add(shininess, "float");
    doc.set_attr(shine, "sid", "shininess");
    doc.set_text(shine, format!("{}", material.specular_hardness));

    // Reflective: never textured
    let reflective = doc.add(shader, "reflective");
    let color = doc.add(reflective, "color");
    doc.set_text(color, encode::color(material.mirror_color));

    let transparency = doc.add(shader, "transparency");
    let value = doc.add(transparency, "float");
    doc.set_attr(value, "sid", "transparency");
    doc.set_text(value, encode::float(material.alpha));
}

fn texture_ref(doc: &mut Document, channel: ElemId, scene: &Scene, slot: &TextureSlot) {
    let texture_name = &scene.textures[slot.texture].name;
    let texture = doc.add(channel, "texture");
    doc.set_attr(texture, "texture", format!("{}-image", texture_name));
    doc.set_attr(texture, "texcoord", "CHANNEL0");
    let extra = doc.add(texture, "extra");
    let technique = doc.add(extra, "technique");
    doc.set_attr(technique, "profile", "MAYA");
    let wrap_u = doc.add(technique, "wrapU");
    doc.set_attr(wrap_u, "sid", "wrapU0");
    doc.set_text(wrap_u, "TRUE");
    let wrap_v = doc.add(technique, "wrapV");
    doc.set_attr(wrap_v, "sid", "wrapV0");
    doc.set_text(wrap_v, "TRUE");
    let blend = doc.add(technique, "blend_mode");
    doc.set_text(blend, slot.blend_mode.clone());
}

pub fn write_image(doc: &mut Document, lib_images: ElemId, texture: &Texture) {
    // textures with no image are skipped, silently
    let image = match texture.image {
        Some(ref image) => image,
        None => return,
    };
    info!("texture {}", texture.name);
    let this_image = doc.add(lib_images, "image");
    doc.set_attr(this_image, "id", format!("{}-image", texture.name));
    doc.set_attr(this_image, "name", texture.name.clone());
    let init = doc.add(this_image, "init_from");
    doc.set_text(init, image.filepath.clone());
}
