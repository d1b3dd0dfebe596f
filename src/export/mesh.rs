//! Surface meshes for labeled voxel regions.
//!
//! Each labeled voxel contributes one quad for every face it shares with a
//! voxel of a different value. Faces on the outer boundary of the grid are
//! left open. Vertices on the integer lattice are shared between quads.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use crate::model::SegmentId;
use crate::volume::Grid;

/// Unit-cube corner offsets for the six face directions, wound so the quad
/// normal points out of the voxel.
const FACES: [([i64; 3], [[i64; 3]; 4]); 6] = [
    ([1, 0, 0], [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]]),
    ([-1, 0, 0], [[0, 0, 0], [0, 0, 1], [0, 1, 1], [0, 1, 0]]),
    ([0, 1, 0], [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]]),
    ([0, -1, 0], [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]]),
    ([0, 0, 1], [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]]),
    ([0, 0, -1], [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]]),
];

/// A quad surface mesh for one segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub segment: SegmentId,
    pub vertices: Vec<[f64; 3]>,
    /// Zero-based vertex indices, four per quad.
    pub faces: Vec<[usize; 4]>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Renders the mesh as Wavefront OBJ text.
    pub fn to_obj(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# segment {}", self.segment);
        for [x, y, z] in &self.vertices {
            let _ = writeln!(out, "v {} {} {}", x, y, z);
        }
        for [a, b, c, d] in &self.faces {
            let _ = writeln!(out, "f {} {} {} {}", a + 1, b + 1, c + 1, d + 1);
        }
        out
    }
}

#[derive(Default)]
struct MeshBuilder {
    index: HashMap<[i64; 3], usize>,
    lattice: Vec<[i64; 3]>,
    faces: Vec<[usize; 4]>,
}

impl MeshBuilder {
    fn vertex(&mut self, p: [i64; 3]) -> usize {
        let next = self.lattice.len();
        *self.index.entry(p).or_insert_with(|| {
            self.lattice.push(p);
            next
        })
    }

    fn finish(self, segment: SegmentId, voxel_size: [f64; 3]) -> Mesh {
        Mesh {
            segment,
            vertices: self
                .lattice
                .iter()
                .map(|p| {
                    [
                        p[0] as f64 * voxel_size[0],
                        p[1] as f64 * voxel_size[1],
                        p[2] as f64 * voxel_size[2],
                    ]
                })
                .collect(),
            faces: self.faces,
        }
    }
}

/// Extracts per-segment surfaces from label grids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mesher {
    voxel_size: [f64; 3],
}

impl Default for Mesher {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0])
    }
}

impl Mesher {
    /// Creates a mesher scaling lattice points by `voxel_size` `(x, y, z)`.
    pub fn new(voxel_size: [f64; 3]) -> Self {
        Self { voxel_size }
    }

    /// Meshes every nonzero label of an `[x, y, z]` grid, ordered by label.
    pub fn mesh_labels(&self, grid: &Grid) -> Vec<Mesh> {
        let (nx, ny, nz) = grid.dims();
        let dims = [nx as i64, ny as i64, nz as i64];
        let mut builders: BTreeMap<u64, MeshBuilder> = BTreeMap::new();

        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let label = grid.get(x, y, z);
                    if label == 0 {
                        continue;
                    }
                    let here = [x as i64, y as i64, z as i64];
                    for (dir, corners) in &FACES {
                        let n = [here[0] + dir[0], here[1] + dir[1], here[2] + dir[2]];
                        if (0..3).any(|i| n[i] < 0 || n[i] >= dims[i]) {
                            continue;
                        }
                        if grid.get(n[0] as usize, n[1] as usize, n[2] as usize) == label {
                            continue;
                        }
                        let builder = builders.entry(label).or_default();
                        let mut quad = [0usize; 4];
                        for (slot, c) in quad.iter_mut().zip(corners) {
                            *slot = builder.vertex([here[0] + c[0], here[1] + c[1], here[2] + c[2]]);
                        }
                        builder.faces.push(quad);
                    }
                }
            }
        }

        builders
            .into_iter()
            .map(|(label, b)| b.finish(SegmentId(label), self.voxel_size))
            .collect()
    }

    /// Meshes each channel of a channel grid independently.
    ///
    /// A label grid is meshed as a whole.
    pub fn mesh_channels(&self, grid: &Grid) -> Vec<Mesh> {
        let Some(labels) = grid.channel_labels() else {
            return self.mesh_labels(grid);
        };
        (0..labels.len())
            .flat_map(|c| self.mesh_labels(&grid.channel_volume(c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Checkpoint, Polygon, Ring, Task};
    use crate::volume::materialize;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::new([(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    #[test]
    fn test_interior_voxel_is_a_closed_cube() {
        let task = Task::new("a", "b", "c", 0, (0, 3), (0, 3), (0, 3));
        let cp = Checkpoint::new("t", vec![Polygon::new(2u64, 1, square(1.0, 1.0, 2.0, 2.0))]);
        let grid = materialize(&task, &[cp], false).unwrap();

        let meshes = Mesher::default().mesh_labels(&grid);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].segment, SegmentId(2));
        assert_eq!(meshes[0].faces.len(), 6);
        assert_eq!(meshes[0].vertices.len(), 8);
    }

    #[test]
    fn test_boundary_faces_left_open() {
        let task = Task::new("a", "b", "c", 0, (0, 1), (0, 1), (0, 1));
        let cp = Checkpoint::new("t", vec![Polygon::new(2u64, 0, square(0.0, 0.0, 1.0, 1.0))]);
        let grid = materialize(&task, &[cp], false).unwrap();
        assert!(Mesher::default().mesh_labels(&grid).is_empty());
    }

    #[test]
    fn test_one_mesh_per_channel_label() {
        let task = Task::new("a", "b", "c", 0, (0, 8), (0, 8), (0, 3));
        let cp = Checkpoint::new(
            "t",
            vec![
                Polygon::new(9u64, 1, square(1.0, 1.0, 3.0, 3.0)),
                Polygon::new(5u64, 1, square(2.0, 2.0, 5.0, 5.0)),
            ],
        );
        let grid = materialize(&task, &[cp], true).unwrap();
        let meshes = Mesher::new([2.0, 2.0, 4.0]).mesh_channels(&grid);
        let segments: Vec<_> = meshes.iter().map(|m| m.segment).collect();
        assert_eq!(segments, vec![SegmentId(5), SegmentId(9)]);
        // The 2x2x1 slab of segment 9 stays whole even though segment 5
        // overlaps it, since each channel is meshed on its own.
        assert_eq!(meshes[1].faces.len(), 4 + 4 + 8);

        let obj = meshes[1].to_obj();
        assert!(obj.starts_with("# segment 9\n"));
        assert!(obj.contains("\nv 2 2 4\n"));
        assert!(obj.contains("\nf "));
    }
}
