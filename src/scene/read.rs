//! Reads a scene description from a JSON file.
//!
//! The file mirrors the host query interface one-to-one:
//!
//! ```text
//! {
//!   "name": "Scene",
//!   "frame_rate": 24,
//!   "ambient_color": [0.05, 0.05, 0.05],
//!   "textures": [ {"name": "Hull", "image": "//textures/hull.png"} ],
//!   "materials": [ {
//!     "name": "Mat1", "shader": "PHONG",
//!     "diffuse_color": [0.8, 0.8, 0.8], "specular_color": [1, 1, 1],
//!     "mirror_color": [1, 1, 1], "ambient": 1.0, "alpha": 1.0,
//!     "hardness": 50,
//!     "texture_slots": [ {"texture": "Hull", "diffuse": true, "blend": "MIX"} ]
//!   } ],
//!   "meshes": [ {
//!     "name": "CubeMesh",
//!     "positions": [[0,0,0], ...],
//!     "polygons": [ {"material_index": 0, "vertices": [0, 1, 2, 3]} ],
//!     "normals": [[0,0,1], ...],            // one per loop, traversal order
//!     "uv_layers": [ {"name": "UVMap", "data": [[0,0], ...]} ],
//!     "materials": ["Mat1"]
//!   } ],
//!   "objects": [ {
//!     "name": "Cube", "kind": "MESH", "parent": "Root",
//!     "translation": [0,0,0], "rotation": [0,0,0], "scale": [1,1,1],
//!     "draw_size": 1.0, "mesh": "CubeMesh",
//!     "properties": {"Phase": 1.0, "Type": "Blink"},
//!     "light": {"color": [1,0,0], "energy": 5.0, "distance": 10.0},
//!     "animation": {"curves": [ {
//!       "data_path": "location", "array_index": 1,
//!       "keyframes": [ {"frame": 0, "value": 0.0, "interpolation": "BEZIER",
//!                       "handle_left": [-1, 0], "handle_right": [1, 0]} ]
//!     } ]}
//!   } ]
//! }
//! ```
//!
//! Custom-property numbers always come in as floats; that matches the
//! hosts we care about, whose bags are float- or string-valued.

use cgmath::{Euler, Rad, Vector3, vec3};
use errors::Result;
use json::{self, JsonValue};
use scene::{
    Action, Curve, DataPath, Image, Interpolation, Keyframe, Light, Material,
    Mesh, Loop, ObjectKind, Polygon, PropValue, Scene, SceneObject,
    ShadingModel, Texture, TextureSlot, UvLayer,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn read_scene(path: &Path) -> Result<Scene> {
    debug!("reading scene {}", path.to_string_lossy());

    let mut f = File::open(path)?;
    let mut text = String::new();
    f.read_to_string(&mut text)?;
    let root = json::parse(&text)?;

    let mut scene = Scene::new(root["name"].as_str().unwrap_or("Scene"));
    scene.frame_rate = root["frame_rate"].as_f64().unwrap_or(24.0);
    if !root["ambient_color"].is_null() {
        scene.ambient_color = color3(&root["ambient_color"], "ambient_color")?;
    }

    let mut texture_ids = HashMap::new();
    for t in root["textures"].members() {
        let texture = read_texture(t)?;
        texture_ids.insert(texture.name.clone(), scene.textures.len());
        scene.textures.push(texture);
    }

    let mut material_ids = HashMap::new();
    for m in root["materials"].members() {
        let material = read_material(m, &texture_ids)?;
        material_ids.insert(material.name.clone(), scene.materials.len());
        scene.materials.push(material);
    }

    let mut mesh_ids = HashMap::new();
    for m in root["meshes"].members() {
        let mesh = read_mesh(m, &material_ids)?;
        mesh_ids.insert(mesh.name.clone(), scene.meshes.len());
        scene.meshes.push(mesh);
    }

    // Objects come in two passes: build them all first, then resolve
    // parents so the child lists come out in object insertion order.
    let mut parent_names = vec![];
    let mut object_ids = HashMap::new();
    for o in root["objects"].members() {
        let (object, parent) = read_object(o, &mesh_ids)?;
        object_ids.insert(object.name.clone(), scene.objects.len());
        scene.objects.push(object);
        parent_names.push(parent);
    }
    for (id, parent) in parent_names.into_iter().enumerate() {
        if let Some(parent) = parent {
            let parent_id = match object_ids.get(&parent) {
                Some(&parent_id) => parent_id,
                None => bail!("object {} has unknown parent {:?}",
                    scene.objects[id].name, parent),
            };
            scene.objects[id].parent = Some(parent_id);
            scene.objects[parent_id].children.push(id);
        }
    }

    scene.build_by_name_maps();

    Ok(scene)
}

fn read_texture(v: &JsonValue) -> Result<Texture> {
    let name = req_str(v, "name", "texture")?;
    let image = v["image"].as_str().map(|filepath| {
        Image { filepath: filepath.to_string() }
    });
    Ok(Texture { name, image })
}

fn read_material(v: &JsonValue, texture_ids: &HashMap<String, usize>) -> Result<Material> {
    let name = req_str(v, "name", "material")?;

    let shader = v["shader"].as_str().unwrap_or("PHONG");
    let shading = match ShadingModel::from_str(shader) {
        Some(shading) => shading,
        None => bail!("material {} has unknown shader {:?}", name, shader),
    };

    let mut texture_slots = vec![];
    for s in v["texture_slots"].members() {
        let texture_name = req_str(s, "texture", "texture slot")?;
        let texture = match texture_ids.get(&texture_name) {
            Some(&id) => id,
            None => bail!("material {} references unknown texture {:?}", name, texture_name),
        };
        texture_slots.push(TextureSlot {
            texture,
            use_diffuse: s["diffuse"].as_bool().unwrap_or(false),
            use_specular: s["specular"].as_bool().unwrap_or(false),
            use_emission: s["emission"].as_bool().unwrap_or(false),
            use_normal: s["normal"].as_bool().unwrap_or(false),
            blend_mode: s["blend"].as_str().unwrap_or("MIX").to_string(),
        });
    }

    Ok(Material {
        shading,
        diffuse_color: opt_color3(v, "diffuse_color", [0.8, 0.8, 0.8])?,
        specular_color: opt_color3(v, "specular_color", [1.0, 1.0, 1.0])?,
        mirror_color: opt_color3(v, "mirror_color", [1.0, 1.0, 1.0])?,
        ambient: v["ambient"].as_f64().unwrap_or(1.0),
        alpha: v["alpha"].as_f64().unwrap_or(1.0),
        specular_hardness: v["hardness"].as_i32().unwrap_or(50),
        texture_slots,
        name,
    })
}

fn read_mesh(v: &JsonValue, material_ids: &HashMap<String, usize>) -> Result<Mesh> {
    let name = req_str(v, "name", "mesh")?;

    let mut positions = vec![];
    for p in v["positions"].members() {
        positions.push(vec3_value(p, &name)?);
    }

    let mut materials = vec![];
    for m in v["materials"].members() {
        let material_name = match m.as_str() {
            Some(s) => s,
            None => bail!("mesh {}: material names must be strings", name),
        };
        match material_ids.get(material_name) {
            Some(&id) => materials.push(id),
            None => bail!("mesh {} references unknown material {:?}", name, material_name),
        }
    }

    let mut normals = vec![];
    for n in v["normals"].members() {
        normals.push(vec3_value(n, &name)?);
    }

    let mut loops = vec![];
    let mut polygons = vec![];
    for p in v["polygons"].members() {
        let material_index = p["material_index"].as_usize().unwrap_or(0);
        if !materials.is_empty() && material_index >= materials.len() {
            bail!("mesh {}: polygon material index {} out of range", name, material_index);
        }
        let loop_start = loops.len();
        let mut loop_total = 0;
        for i in p["vertices"].members() {
            let vertex_index = match i.as_usize() {
                Some(i) if i < positions.len() => i,
                _ => bail!("mesh {}: bad vertex index {}", name, i),
            };
            let normal = match normals.get(loops.len()) {
                Some(&normal) => normal,
                None => bail!("mesh {}: need one normal per polygon corner", name),
            };
            loops.push(Loop { vertex_index, normal });
            loop_total += 1;
        }
        polygons.push(Polygon { material_index, loop_start, loop_total });
    }
    if normals.len() != loops.len() {
        bail!("mesh {}: {} normals for {} polygon corners", name, normals.len(), loops.len());
    }

    let mut uv_layers = vec![];
    for layer in v["uv_layers"].members() {
        let layer_name = req_str(layer, "name", "UV layer")?;
        let mut data = vec![];
        for uv in layer["data"].members() {
            data.push(pair_value(uv, &name)?);
        }
        if data.len() != loops.len() {
            bail!("mesh {}: UV layer {} has {} entries for {} polygon corners",
                name, layer_name, data.len(), loops.len());
        }
        uv_layers.push(UvLayer { name: layer_name, data });
    }

    Ok(Mesh { name, positions, loops, polygons, uv_layers, materials })
}

fn read_object(v: &JsonValue, mesh_ids: &HashMap<String, usize>) -> Result<(SceneObject, Option<String>)> {
    let name = req_str(v, "name", "object")?;
    let kind = ObjectKind::from_str(v["kind"].as_str().unwrap_or("EMPTY"));
    let mut object = SceneObject::new(name, kind);

    if !v["translation"].is_null() {
        object.translation = vec3_value(&v["translation"], &object.name)?;
    }
    if !v["rotation"].is_null() {
        let r = vec3_value(&v["rotation"], &object.name)?;
        object.rotation = Euler::new(Rad(r.x), Rad(r.y), Rad(r.z));
    }
    if !v["scale"].is_null() {
        object.scale = vec3_value(&v["scale"], &object.name)?;
    }
    object.draw_size = v["draw_size"].as_f64().unwrap_or(1.0);

    for (key, value) in v["properties"].entries() {
        object.properties.push((key.to_string(), prop_value(value, &object.name)?));
    }

    if let Some(mesh_name) = v["mesh"].as_str() {
        match mesh_ids.get(mesh_name) {
            Some(&id) => object.mesh = Some(id),
            None => bail!("object {} references unknown mesh {:?}", object.name, mesh_name),
        }
    }
    if kind == ObjectKind::Mesh && object.mesh.is_none() {
        bail!("MESH object {} names no mesh", object.name);
    }

    if !v["light"].is_null() {
        let l = &v["light"];
        object.light = Some(Light {
            color: opt_color3(l, "color", [1.0, 1.0, 1.0])?,
            energy: l["energy"].as_f64().unwrap_or(0.0),
            distance: l["distance"].as_f64().unwrap_or(0.0),
        });
    } else if kind == ObjectKind::Light {
        // lamp data the conventions can read even if the file omits it
        object.light = Some(Light {
            color: [1.0, 1.0, 1.0],
            energy: 0.0,
            distance: 0.0,
        });
    }

    if !v["animation"].is_null() {
        object.action = Some(read_action(&v["animation"], &object.name)?);
    }

    let parent = v["parent"].as_str().map(String::from);
    Ok((object, parent))
}

fn read_action(v: &JsonValue, object_name: &str) -> Result<Action> {
    let mut curves = vec![];
    for c in v["curves"].members() {
        let path = req_str(c, "data_path", "curve")?;
        let data_path = match DataPath::from_str(&path) {
            Some(data_path) => data_path,
            None => bail!("object {}: unknown data path {:?} \
                (want location, rotation_euler or scale)", object_name, path),
        };
        let array_index = c["array_index"].as_usize().unwrap_or(0);
        if array_index > 2 {
            bail!("object {}: curve component index {} out of range", object_name, array_index);
        }

        let mut keyframes = vec![];
        for k in c["keyframes"].members() {
            let frame = match k["frame"].as_f64() {
                Some(frame) => frame,
                None => bail!("object {}: keyframe is missing its frame", object_name),
            };
            let value = match k["value"].as_f64() {
                Some(value) => value,
                None => bail!("object {}: keyframe is missing its value", object_name),
            };
            let interp = k["interpolation"].as_str().unwrap_or("BEZIER");
            let interpolation = match Interpolation::from_str(interp) {
                Some(interpolation) => interpolation,
                None => bail!("object {}: unknown interpolation {:?}", object_name, interp),
            };
            // absent handles degenerate to the key itself
            let handle_left = opt_pair(k, "handle_left", [frame, value], object_name)?;
            let handle_right = opt_pair(k, "handle_right", [frame, value], object_name)?;
            keyframes.push(Keyframe { frame, value, interpolation, handle_left, handle_right });
        }
        curves.push(Curve { data_path, array_index, keyframes });
    }
    Ok(Action { curves })
}

fn prop_value(v: &JsonValue, object_name: &str) -> Result<PropValue> {
    if let Some(s) = v.as_str() {
        return Ok(PropValue::Str(s.to_string()));
    }
    if let Some(x) = v.as_f64() {
        return Ok(PropValue::Float(x));
    }
    bail!("object {}: property values must be numbers or strings, got {}",
        object_name, v.dump())
}

fn req_str(v: &JsonValue, key: &str, what: &str) -> Result<String> {
    match v[key].as_str() {
        Some(s) => Ok(s.to_string()),
        None => bail!("{} is missing {:?}", what, key),
    }
}

fn vec3_value(v: &JsonValue, what: &str) -> Result<Vector3<f64>> {
    let (x, y, z) = (v[0].as_f64(), v[1].as_f64(), v[2].as_f64());
    match (x, y, z) {
        (Some(x), Some(y), Some(z)) => Ok(vec3(x, y, z)),
        _ => bail!("{}: expected a [x, y, z] triple, got {}", what, v.dump()),
    }
}

fn pair_value(v: &JsonValue, what: &str) -> Result<[f64; 2]> {
    match (v[0].as_f64(), v[1].as_f64()) {
        (Some(a), Some(b)) => Ok([a, b]),
        _ => bail!("{}: expected a [a, b] pair, got {}", what, v.dump()),
    }
}

fn opt_pair(v: &JsonValue, key: &str, default: [f64; 2], what: &str) -> Result<[f64; 2]> {
    if v[key].is_null() {
        Ok(default)
    } else {
        pair_value(&v[key], what)
    }
}

fn color3(v: &JsonValue, what: &str) -> Result<[f32; 3]> {
    let c = vec3_value(v, what)?;
    Ok([c.x as f32, c.y as f32, c.z as f32])
}

fn opt_color3(v: &JsonValue, key: &str, default: [f32; 3]) -> Result<[f32; 3]> {
    if v[key].is_null() {
        Ok(default)
    } else {
        color3(&v[key], key)
    }
}

#[cfg(test)]
mod tests {
    use scene::{ObjectKind, PropValue};
    use super::*;

    static SCENE: &'static str = r#"{
        "name": "TestScene",
        "frame_rate": 30,
        "ambient_color": [0.1, 0.1, 0.1],
        "textures": [
            {"name": "Hull", "image": "/tex/hull.png"},
            {"name": "Unused", "image": null}
        ],
        "materials": [{
            "name": "Mat1",
            "diffuse_color": [0.5, 0.25, 0.125],
            "texture_slots": [{"texture": "Hull", "diffuse": true, "specular": true}]
        }],
        "meshes": [{
            "name": "TriMesh",
            "positions": [[0,0,0], [1,0,0], [0,1,0]],
            "polygons": [{"material_index": 0, "vertices": [0, 1, 2]}],
            "normals": [[0,0,1], [0,0,1], [0,0,1]],
            "uv_layers": [{"name": "UVMap", "data": [[0,0], [1,0], [0,1]]}],
            "materials": ["Mat1"]
        }],
        "objects": [
            {"name": "Root", "kind": "EMPTY"},
            {"name": "Tri", "kind": "MESH", "parent": "Root", "mesh": "TriMesh",
             "translation": [1, 2, 3],
             "properties": {"Speed": 4.5, "Flags": "8"}}
        ]
    }"#;

    // tests run on parallel threads, so each caller names its own file
    fn parse(s: &str, tag: &str) -> super::Result<Scene> {
        use std::io::Write;
        let mut path = ::std::env::temp_dir();
        path.push(format!("daewright-read-test-{}-{}.json", ::std::process::id(), tag));
        let mut f = ::std::fs::File::create(&path).unwrap();
        f.write_all(s.as_bytes()).unwrap();
        let res = read_scene(&path);
        let _ = ::std::fs::remove_file(&path);
        res
    }

    #[test]
    fn reads_a_scene() {
        let scene = parse(SCENE, "reads").unwrap();

        assert_eq!(scene.name, "TestScene");
        assert_eq!(scene.frame_rate, 30.0);
        assert_eq!(scene.textures.len(), 2);
        assert!(scene.textures[1].image.is_none());

        let mat = &scene.materials[0];
        assert_eq!(mat.diffuse_color, [0.5, 0.25, 0.125]);
        assert!(mat.texture_slots[0].use_diffuse);
        assert!(mat.texture_slots[0].use_specular);
        assert!(!mat.texture_slots[0].use_emission);

        let mesh = &scene.meshes[0];
        assert_eq!(mesh.loops.len(), 3);
        assert_eq!(mesh.materials, vec![0]);

        assert_eq!(scene.materials_by_name["Mat1"], 0);
        assert_eq!(scene.meshes_by_name["TriMesh"], 0);
        assert_eq!(scene.textures_by_name["Hull"], 0);

        assert_eq!(scene.roots(), vec![0]);
        let tri = &scene.objects[1];
        assert_eq!(tri.kind, ObjectKind::Mesh);
        assert_eq!(tri.parent, Some(0));
        assert_eq!(scene.objects[0].children, vec![1]);
        assert_eq!(tri.translation.y, 2.0);
        assert_eq!(tri.prop("Speed"), Some(&PropValue::Float(4.5)));
        assert_eq!(tri.prop("Flags"), Some(&PropValue::Str("8".to_string())));
    }

    #[test]
    fn rejects_unknown_references() {
        let bad = SCENE.replace("\"mesh\": \"TriMesh\"", "\"mesh\": \"Missing\"");
        assert!(parse(&bad, "rejects").is_err());
    }
}
