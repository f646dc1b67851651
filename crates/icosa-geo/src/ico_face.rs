//! The twenty faces of the base icosahedron and their corner directions.

use glam::DVec3;

/// Number of triangular faces on the icosahedron.
pub const FACE_COUNT: usize = 20;

/// Number of shared vertices on the icosahedron.
pub const VERTEX_COUNT: usize = 12;

/// One of the 20 faces of the base icosahedron.
///
/// The wrapped index is always in `0..20`; construct through [`IcoFace::new`]
/// or iterate [`IcoFace::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IcoFace(u8);

impl IcoFace {
    /// All twenty faces in canonical order.
    pub const ALL: [IcoFace; FACE_COUNT] = {
        let mut faces = [IcoFace(0); FACE_COUNT];
        let mut i = 0;
        while i < FACE_COUNT {
            faces[i] = IcoFace(i as u8);
            i += 1;
        }
        faces
    };

    /// Wrap a face index, returning `None` if it is not in `0..20`.
    #[must_use]
    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < FACE_COUNT).then_some(Self(index))
    }

    /// The face index in `0..20`.
    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for IcoFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "face{}", self.0)
    }
}

/// Vertex ids of the canonical face layout. Winding is fixed up to outward
/// CCW when the geometry is built.
const FACE_VERTICES: [[u8; 3]; FACE_COUNT] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Unit icosahedron: 12 vertex directions and 20 faces referencing them.
///
/// Corner `a` of a face is barycentric `(0, 0)`, corner `b` is `(1, 0)` and
/// corner `c` is `(0, 1)`. This is leaf data; it is never mutated after
/// construction.
#[derive(Clone, Debug, PartialEq)]
pub struct IcosahedronGeometry {
    vertices: [DVec3; VERTEX_COUNT],
    faces: [[u8; 3]; FACE_COUNT],
}

impl IcosahedronGeometry {
    /// Build the unit icosahedron from the golden-ratio vertex set.
    #[must_use]
    pub fn unit() -> Self {
        let phi = (1.0 + 5.0_f64.sqrt()) * 0.5;
        let vertices = [
            DVec3::new(-1.0, phi, 0.0),
            DVec3::new(1.0, phi, 0.0),
            DVec3::new(-1.0, -phi, 0.0),
            DVec3::new(1.0, -phi, 0.0),
            DVec3::new(0.0, -1.0, phi),
            DVec3::new(0.0, 1.0, phi),
            DVec3::new(0.0, -1.0, -phi),
            DVec3::new(0.0, 1.0, -phi),
            DVec3::new(phi, 0.0, -1.0),
            DVec3::new(phi, 0.0, 1.0),
            DVec3::new(-phi, 0.0, -1.0),
            DVec3::new(-phi, 0.0, 1.0),
        ]
        .map(DVec3::normalize);

        let mut faces = FACE_VERTICES;
        for tri in &mut faces {
            let [a, b, c] = tri.map(|i| vertices[i as usize]);
            if (b - a).cross(c - a).dot(a + b + c) < 0.0 {
                tri.swap(1, 2);
            }
        }

        Self { vertices, faces }
    }

    /// The three unit corner directions `[a, b, c]` of a face.
    #[must_use]
    pub fn corners(&self, face: IcoFace) -> [DVec3; 3] {
        self.faces[face.0 as usize].map(|i| self.vertices[i as usize])
    }

    /// The shared vertex ids `[a, b, c]` of a face.
    #[must_use]
    pub fn vertex_ids(&self, face: IcoFace) -> [u8; 3] {
        self.faces[face.0 as usize]
    }

    /// Outward unit normal of the flat face.
    #[must_use]
    pub fn normal(&self, face: IcoFace) -> DVec3 {
        let [a, b, c] = self.corners(face);
        (b - a).cross(c - a).normalize()
    }

    /// All twelve vertex directions.
    #[must_use]
    pub fn vertices(&self) -> &[DVec3; VERTEX_COUNT] {
        &self.vertices
    }
}

impl Default for IcosahedronGeometry {
    fn default() -> Self {
        Self::unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_all_twenty_faces_exist() {
        assert_eq!(IcoFace::ALL.len(), 20);
        for (i, face) in IcoFace::ALL.iter().enumerate() {
            assert_eq!(face.index() as usize, i);
        }
        assert!(IcoFace::new(19).is_some());
        assert!(IcoFace::new(20).is_none());
    }

    #[test]
    fn test_vertices_are_unit_length() {
        let geom = IcosahedronGeometry::unit();
        for v in geom.vertices() {
            assert!((v.length() - 1.0).abs() < 1e-12, "vertex not unit: {v:?}");
        }
    }

    #[test]
    fn test_faces_wind_outward() {
        let geom = IcosahedronGeometry::unit();
        for face in IcoFace::ALL {
            let [a, b, c] = geom.corners(face);
            let centroid = (a + b + c) / 3.0;
            assert!(
                geom.normal(face).dot(centroid) > 0.0,
                "{face} winds inward"
            );
        }
    }

    #[test]
    fn test_every_edge_shared_by_two_faces() {
        let geom = IcosahedronGeometry::unit();
        let mut edges: HashMap<(u8, u8), u32> = HashMap::new();
        for face in IcoFace::ALL {
            let [a, b, c] = geom.vertex_ids(face);
            for (p, q) in [(a, b), (b, c), (c, a)] {
                *edges.entry((p.min(q), p.max(q))).or_default() += 1;
            }
        }
        assert_eq!(edges.len(), 30);
        assert!(edges.values().all(|&n| n == 2));
    }

    #[test]
    fn test_face_zero_and_one_share_an_edge() {
        let geom = IcosahedronGeometry::unit();
        let f0 = geom.vertex_ids(IcoFace::ALL[0]);
        let f1 = geom.vertex_ids(IcoFace::ALL[1]);
        let shared = f0.iter().filter(|v| f1.contains(v)).count();
        assert_eq!(shared, 2);
    }

    #[test]
    fn test_face_edges_have_equal_length() {
        let geom = IcosahedronGeometry::unit();
        let [a, b, _] = geom.corners(IcoFace::ALL[0]);
        let edge = (b - a).length();
        for face in IcoFace::ALL {
            let [a, b, c] = geom.corners(face);
            for len in [(b - a).length(), (c - b).length(), (a - c).length()] {
                assert!((len - edge).abs() < 1e-12);
            }
        }
    }
}
