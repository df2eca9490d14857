/// Geometry primitives and the interleaved vertex buffer handed to renderers
use nalgebra::{Point3, Vector3};

/// Scalars per emitted vertex: position xyz followed by normal xyz.
pub const FLOATS_PER_VERTEX: usize = 6;
/// Scalars per emitted triangle.
pub const FLOATS_PER_TRIANGLE: usize = 3 * FLOATS_PER_VERTEX;

pub type Vec3 = Vector3<f32>;

/// A 3D vertex with position and the normal of the facet it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    fn from_record(record: &[f32]) -> Self {
        Self::new(
            record[0], record[1], record[2], record[3], record[4], record[5],
        )
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a flat-shaded triangle where every corner carries `normal`.
    pub fn with_normal(normal: Vec3, corners: [Point3<f32>; 3]) -> Self {
        let [a, b, c] = corners.map(|position| Vertex { position, normal });
        Self::new(a, b, c)
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Returns `None` for degenerate (zero-area) triangles.
    pub fn calculate_normal(&self) -> Option<Vec3> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).try_normalize(1e-12)
    }

    /// The normal stored in the file, or the geometric one when the file left it zeroed.
    pub fn shading_normal(&self) -> Vec3 {
        let stored = self.vertices[0].normal;
        if stored.norm_squared() > 1e-12 {
            stored
        } else {
            self.calculate_normal().unwrap_or_else(Vec3::zeros)
        }
    }
}

/// Axis-aligned box enclosing every vertex position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Radius of the sphere around `center()` that touches the box corners.
    pub fn radius(&self) -> f32 {
        (self.max - self.min).norm() * 0.5
    }
}

/// Flat, immutable vertex stream laid out as `[px, py, pz, nx, ny, nz]` per vertex,
/// three vertices per triangle, triangles in file order.
///
/// The length is always a multiple of [`FLOATS_PER_TRIANGLE`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    data: Vec<f32>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_triangle_capacity(triangles: usize) -> Self {
        Self {
            data: Vec::with_capacity(triangles.saturating_mul(FLOATS_PER_TRIANGLE)),
        }
    }

    pub(crate) fn push_facet(&mut self, normal: Vec3, corners: &[Point3<f32>; 3]) {
        for corner in corners {
            self.data
                .extend_from_slice(&[corner.x, corner.y, corner.z, normal.x, normal.y, normal.z]);
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of vertices, as passed to a `draw_arrays` style call.
    pub fn vertex_count(&self) -> usize {
        self.data.len() / FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        self.data.len() / FLOATS_PER_TRIANGLE
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.data
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(Vertex::from_record)
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.data.chunks_exact(FLOATS_PER_TRIANGLE).map(|chunk| {
            Triangle::new(
                Vertex::from_record(&chunk[0..6]),
                Vertex::from_record(&chunk[6..12]),
                Vertex::from_record(&chunk[12..18]),
            )
        })
    }

    /// Bounding box over all positions, `None` for an empty buffer.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut positions = self.vertices().map(|vertex| vertex.position);
        let first = positions.next()?;
        Some(positions.fold(
            Bounds {
                min: first,
                max: first,
            },
            |bounds, p| Bounds {
                min: bounds.min.inf(&p),
                max: bounds.max.sup(&p),
            },
        ))
    }
}

impl FromIterator<Triangle> for VertexBuffer {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        let mut buffer = Self::new();
        for triangle in iter {
            for vertex in &triangle.vertices {
                buffer.data.extend_from_slice(&[
                    vertex.position.x,
                    vertex.position.y,
                    vertex.position.z,
                    vertex.normal.x,
                    vertex.normal.y,
                    vertex.normal.z,
                ]);
            }
        }
        buffer
    }
}
