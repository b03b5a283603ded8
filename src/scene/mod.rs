mod camera;
mod mesh;

pub use camera::Camera;
pub use mesh::{MeshBuffers, Triangle};
