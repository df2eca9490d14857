/// meshview core library - STL loading and orbit camera
///
/// This library provides the windowing-agnostic pieces of the viewer:
/// decoding STL files into interleaved vertex buffers and driving an
/// orbit camera from pointer input.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod input;
pub mod projection;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use camera::{CameraConfig, OrbitalCamera};
pub use error::{LoadError, Result};
pub use geometry::{Bounds, Triangle, Vec3, Vertex, VertexBuffer};
pub use input::OrbitController;
pub use projection::Projection;
pub use stl::{detect_encoding, Encoding, StlMesh};
pub use transform::Transform;
