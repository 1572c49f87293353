//! Mesh geometry: position/normal/UV sources and one triangle block per
//! material slot.

use export::collada::encode;
use export::collada::xml::{Document, ElemId};
use scene::{MeshId, Polygon, Scene};

/// Writes the `<geometry>` for a mesh object. The mesh is triangulated in
/// the scene first; that mutation outlives the export.
pub fn write_geometry(
    doc: &mut Document,
    lib_geometries: ElemId,
    scene: &mut Scene,
    name: &str,
    mesh_id: MeshId,
) {
    let this_geo = doc.add(lib_geometries, "geometry");
    doc.set_attr(this_geo, "id", name.to_string());
    doc.set_attr(this_geo, "name", name.to_string());
    let this_mesh = doc.add(this_geo, "mesh");

    scene.meshes[mesh_id].triangulate();
    let mesh = &scene.meshes[mesh_id];

    // Positions, one entry per vertex
    let positions_id = format!("{}-positions", name);
    let mut positions = Vec::with_capacity(mesh.positions.len() * 3);
    for v in &mesh.positions {
        positions.extend_from_slice(&[v.x, v.y, v.z]);
    }
    float_source(doc, this_mesh, &positions_id, &positions,
        mesh.positions.len(), 3, &["X", "Y", "Z"]);

    // Normals, one entry per loop, so split normals survive
    let normals_id = format!("{}-normals", name);
    let mut normals = Vec::with_capacity(mesh.loops.len() * 3);
    for l in &mesh.loops {
        normals.extend_from_slice(&[l.normal.x, l.normal.y, l.normal.z]);
    }
    float_source(doc, this_mesh, &normals_id, &normals,
        mesh.loops.len(), 3, &["X", "Y", "Z"]);

    // One source per UV layer, in layer order
    let mut uv_ids = Vec::with_capacity(mesh.uv_layers.len());
    for layer in &mesh.uv_layers {
        let uv_id = format!("{}-texcoord-{}", name, layer.name);
        let mut coords = Vec::with_capacity(layer.data.len() * 2);
        for uv in &layer.data {
            coords.extend_from_slice(uv);
        }
        float_source(doc, this_mesh, &uv_id, &coords,
            layer.data.len(), 2, &["S", "T"]);
        uv_ids.push(uv_id);
    }

    let vertices_id = format!("{}-vertices", name);
    let vertices = doc.add(this_mesh, "vertices");
    doc.set_attr(vertices, "id", vertices_id.clone());
    let input = doc.add(vertices, "input");
    doc.set_attr(input, "semantic", "POSITION");
    doc.set_attr(input, "source", format!("#{}", positions_id));

    // Flat vertex list over ALL polygons, in traversal order. Loop indices
    // are globally unique per mesh, so every material partition below
    // indexes into this one list.
    let mut flat_verts = Vec::with_capacity(mesh.loops.len());
    for poly in &mesh.polygons {
        for li in poly.loop_range() {
            flat_verts.push(mesh.loops[li].vertex_index);
        }
    }

    if !mesh.materials.is_empty() {
        for (slot, &material_id) in mesh.materials.iter().enumerate() {
            let material_name = &scene.materials[material_id].name;
            debug!("triangles for material slot {} ({})", slot, material_name);
            let polys: Vec<&Polygon> = mesh.polygons.iter()
                .filter(|p| p.material_index == slot)
                .collect();
            triangles_block(doc, this_mesh, Some(material_name), &polys,
                &flat_verts, &vertices_id, &normals_id, &uv_ids);
        }
    } else {
        let polys: Vec<&Polygon> = mesh.polygons.iter().collect();
        triangles_block(doc, this_mesh, None, &polys,
            &flat_verts, &vertices_id, &normals_id, &uv_ids);
    }
}

/// One `<triangles>` block: the inputs, then the `(vertex, loop)` index
/// pairs for every polygon in this partition.
fn triangles_block(
    doc: &mut Document,
    mesh_elem: ElemId,
    material: Option<&str>,
    polys: &[&Polygon],
    flat_verts: &[usize],
    vertices_id: &str,
    normals_id: &str,
    uv_ids: &[String],
) {
    let tris = doc.add(mesh_elem, "triangles");
    if let Some(material) = material {
        doc.set_attr(tris, "material", material.to_string());
    }
    doc.set_attr(tris, "count", format!("{}", polys.len()));

    let input = doc.add(tris, "input");
    doc.set_attr(input, "semantic", "VERTEX");
    doc.set_attr(input, "offset", "0");
    doc.set_attr(input, "source", format!("#{}", vertices_id));
    let input = doc.add(tris, "input");
    doc.set_attr(input, "semantic", "NORMAL");
    doc.set_attr(input, "offset", "1");
    doc.set_attr(input, "source", format!("#{}", normals_id));
    for (set, uv_id) in uv_ids.iter().enumerate() {
        // texcoords ride on the loop index, same offset as the normals
        let input = doc.add(tris, "input");
        doc.set_attr(input, "semantic", "TEXCOORD");
        doc.set_attr(input, "offset", "1");
        doc.set_attr(input, "set", format!("{}", set));
        doc.set_attr(input, "source", format!("#{}", uv_id));
    }

    let mut inds = Vec::with_capacity(polys.len() * 6);
    for poly in polys {
        for li in poly.loop_range() {
            inds.push(flat_verts[li]);
            inds.push(li);
        }
    }
    let p = doc.add(tris, "p");
    doc.set_text(p, encode::indices(inds));
}

/// The standard source/float_array/accessor block.
fn float_source(
    doc: &mut Document,
    mesh_elem: ElemId,
    id: &str,
    values: &[f64],
    count: usize,
    stride: usize,
    params: &[&'static str],
) {
    let source = doc.add(mesh_elem, "source");
    doc.set_attr(source, "id", id.to_string());
    let array_id = format!("{}-array", id);
    let array = doc.add(source, "float_array");
    doc.set_attr(array, "id", array_id.clone());
    doc.set_attr(array, "count", format!("{}", values.len()));
    doc.set_text(array, encode::floats(values.iter().cloned()));
    let technique = doc.add(source, "technique_common");
    let accessor = doc.add(technique, "accessor");
    doc.set_attr(accessor, "source", format!("#{}", array_id));
    doc.set_attr(accessor, "count", format!("{}", count));
    doc.set_attr(accessor, "stride", format!("{}", stride));
    for &name in params {
        let param = doc.add(accessor, "param");
        doc.set_attr(param, "name", name);
        doc.set_attr(param, "type", "float");
    }
}
