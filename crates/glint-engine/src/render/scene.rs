use crate::geometry::TriangleGeometry;
use crate::shader::ShaderProgram;

/// Every GPU object the frame loop draws with.
///
/// Built once before the loop starts and kept until process exit.
#[derive(Debug)]
pub struct Scene {
    pub program: ShaderProgram,
    pub geometry: TriangleGeometry,
}

impl Scene {
    pub fn new(program: ShaderProgram, geometry: TriangleGeometry) -> Self {
        Self { program, geometry }
    }
}
