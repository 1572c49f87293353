//! The scene walk: one `<node>` per object, depth-first, pre-order.

use cgmath::Deg;
use errors::Result;
use export::collada::{animation, geometry, name};
use export::collada::encode;
use export::collada::xml::{Document, ElemId};
use scene::{ObjectId, ObjectKind, Scene};

/// Library elements the walk appends to as it visits mesh and animated
/// nodes.
pub struct Libs {
    pub geometries: ElemId,
    pub animations: ElemId,
}

/// Writes `object_id`'s node under `parent`, then recurses into its
/// children in stored order.
pub fn write_node(
    doc: &mut Document,
    parent: ElemId,
    libs: &Libs,
    scene: &mut Scene,
    object_id: ObjectId,
) -> Result<()> {
    let (node_name, kind, translation, rotation, mesh, has_action, children) = {
        let obj = &scene.objects[object_id];
        (obj.name.clone(), obj.kind, obj.translation, obj.rotation,
         obj.mesh, obj.action.is_some(), obj.children.clone())
    };
    debug!("writing node for {}", node_name);

    let node = doc.add(parent, "node");
    doc.set_attr(node, "id", node_name.clone());
    doc.set_attr(node, "name", node_name.clone());
    doc.set_attr(node, "sid", node_name.clone());

    let translate = doc.add(node, "translate");
    doc.set_attr(translate, "sid", "translate");
    doc.set_text(translate, encode::floats(
        vec![translation.x, translation.y, translation.z]));

    // fixed axes, fixed Z-Y-X order, degrees
    let rot_z = doc.add(node, "rotate");
    doc.set_attr(rot_z, "sid", "rotateZ");
    doc.set_text(rot_z, format!("0 0 1 {}", encode::float(Deg::from(rotation.z).0)));
    let rot_y = doc.add(node, "rotate");
    doc.set_attr(rot_y, "sid", "rotateY");
    doc.set_text(rot_y, format!("0 1 0 {}", encode::float(Deg::from(rotation.y).0)));
    let rot_x = doc.add(node, "rotate");
    doc.set_attr(rot_x, "sid", "rotateX");
    doc.set_text(rot_x, format!("1 0 0 {}", encode::float(Deg::from(rotation.x).0)));

    if has_action {
        animation::write_animation(doc, libs.animations, scene, &scene.objects[object_id]);
    }

    if kind == ObjectKind::Mesh {
        let mesh_id = match mesh {
            Some(mesh_id) => mesh_id,
            None => bail!("mesh object {} has no mesh data", node_name),
        };
        // the geometry is registered under the object's name, so the
        // instance references the object, not the mesh datablock
        let instance = doc.add(node, "instance_geometry");
        doc.set_attr(instance, "url", format!("#{}", node_name));
        let bind = doc.add(instance, "bind_material");
        let technique = doc.add(bind, "technique_common");
        for slot in 0..scene.meshes[mesh_id].materials.len() {
            let material_id = scene.meshes[mesh_id].materials[slot];
            let material_name = scene.materials[material_id].name.clone();
            let mat_instance = doc.add(technique, "instance_material");
            doc.set_attr(mat_instance, "symbol", material_name.clone());
            doc.set_attr(mat_instance, "target", format!("#{}", material_name));
        }
        geometry::write_geometry(doc, libs.geometries, scene, &node_name, mesh_id);
    }

    // joint-name conventions rewrite id, name and sid together
    if let Some(new_id) = name::synthesize(&scene.objects[object_id])? {
        debug!("{}", new_id);
        doc.set_attr(node, "id", new_id.clone());
        doc.set_attr(node, "name", new_id.clone());
        doc.set_attr(node, "sid", new_id);
    }

    for &child in &children {
        write_node(doc, node, libs, scene, child)?;
    }

    Ok(())
}
