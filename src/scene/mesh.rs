//! Triangle-mesh buffers, kept the way the host keeps them: positions per
//! vertex, normals and UVs per loop (polygon corner), polygons as ranges
//! of loops.

use cgmath::Vector3;
use scene::MaterialId;
use std::ops::Range;

pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vector3<f64>>,
    /// Per-corner records, in polygon traversal order.
    pub loops: Vec<Loop>,
    pub polygons: Vec<Polygon>,
    pub uv_layers: Vec<UvLayer>,
    /// Assigned materials, in slot order.
    pub materials: Vec<MaterialId>,
}

/// One polygon corner. Distinct from the vertex index so that normals and
/// UVs can differ across shared vertices.
#[derive(Clone)]
pub struct Loop {
    pub vertex_index: usize,
    pub normal: Vector3<f64>,
}

pub struct Polygon {
    pub material_index: usize,
    pub loop_start: usize,
    pub loop_total: usize,
}

impl Polygon {
    pub fn loop_range(&self) -> Range<usize> {
        self.loop_start..self.loop_start + self.loop_total
    }
}

/// A UV layer: one (S, T) pair per loop.
pub struct UvLayer {
    pub name: String,
    pub data: Vec<[f64; 2]>,
}

impl Mesh {
    /// Fan-triangulates every polygon in place, rebuilding the loop records
    /// and every UV layer. Destructive: the scene keeps the triangulated
    /// mesh after the export is done.
    pub fn triangulate(&mut self) {
        let mut loops = Vec::with_capacity(self.loops.len());
        let mut polygons = Vec::with_capacity(self.polygons.len());
        let mut uv_data: Vec<Vec<[f64; 2]>> = self.uv_layers.iter()
            .map(|layer| Vec::with_capacity(layer.data.len()))
            .collect();

        for poly in &self.polygons {
            if poly.loop_total < 3 {
                continue;
            }
            let base = poly.loop_start;
            for i in 1..poly.loop_total - 1 {
                let corners = [base, base + i, base + i + 1];
                let loop_start = loops.len();
                for &c in corners.iter() {
                    loops.push(self.loops[c].clone());
                    for (l, layer) in self.uv_layers.iter().enumerate() {
                        uv_data[l].push(layer.data[c]);
                    }
                }
                polygons.push(Polygon {
                    material_index: poly.material_index,
                    loop_start,
                    loop_total: 3,
                });
            }
        }

        self.loops = loops;
        self.polygons = polygons;
        for (layer, data) in self.uv_layers.iter_mut().zip(uv_data.into_iter()) {
            layer.data = data;
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::vec3;
    use super::*;

    fn quad_and_tri() -> Mesh {
        // one quad (material 1), one triangle (material 0)
        let up = vec3(0.0, 0.0, 1.0);
        Mesh {
            name: "M".to_string(),
            positions: vec![
                vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0),
                vec3(1.0, 1.0, 0.0), vec3(0.0, 1.0, 0.0),
                vec3(2.0, 0.0, 0.0),
            ],
            loops: vec![
                Loop { vertex_index: 0, normal: up },
                Loop { vertex_index: 1, normal: up },
                Loop { vertex_index: 2, normal: up },
                Loop { vertex_index: 3, normal: up },
                Loop { vertex_index: 1, normal: up },
                Loop { vertex_index: 4, normal: up },
                Loop { vertex_index: 2, normal: up },
            ],
            polygons: vec![
                Polygon { material_index: 1, loop_start: 0, loop_total: 4 },
                Polygon { material_index: 0, loop_start: 4, loop_total: 3 },
            ],
            uv_layers: vec![UvLayer {
                name: "UVMap".to_string(),
                data: vec![
                    [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
                    [0.1, 0.1], [0.2, 0.2], [0.3, 0.3],
                ],
            }],
            materials: vec![],
        }
    }

    #[test]
    fn triangulate_fans_quads() {
        let mut mesh = quad_and_tri();
        mesh.triangulate();

        assert_eq!(mesh.polygons.len(), 3);
        assert!(mesh.polygons.iter().all(|p| p.loop_total == 3));
        assert_eq!(mesh.loops.len(), 9);

        // quad (0,1,2,3) fans into (0,1,2) and (0,2,3)
        let verts: Vec<usize> = mesh.loops.iter().map(|l| l.vertex_index).collect();
        assert_eq!(verts, vec![0, 1, 2, 0, 2, 3, 1, 4, 2]);

        // material indices survive
        assert_eq!(mesh.polygons[0].material_index, 1);
        assert_eq!(mesh.polygons[1].material_index, 1);
        assert_eq!(mesh.polygons[2].material_index, 0);

        // UVs follow their corners
        assert_eq!(mesh.uv_layers[0].data.len(), 9);
        assert_eq!(mesh.uv_layers[0].data[3], [0.0, 0.0]);
        assert_eq!(mesh.uv_layers[0].data[4], [1.0, 1.0]);
        assert_eq!(mesh.uv_layers[0].data[6], [0.1, 0.1]);
    }

    #[test]
    fn triangulate_leaves_triangles_alone() {
        let mut mesh = quad_and_tri();
        mesh.triangulate();
        let before: Vec<usize> = mesh.loops.iter().map(|l| l.vertex_index).collect();
        mesh.triangulate();
        let after: Vec<usize> = mesh.loops.iter().map(|l| l.vertex_index).collect();
        assert_eq!(before, after);
    }
}
