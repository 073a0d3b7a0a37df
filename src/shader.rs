//! The programmable stages a draw call runs user code through.

use nalgebra_glm::{UVec2, Vec4};

use crate::geometry::Vertex;

/// Fragment-stage slots, rebuilt by the pipeline for every invocation.
///
/// `position` and `depth` describe the pixel being shaded; `varying_color`
/// holds the covering primitive's vertex colors interpolated at this pixel
/// (the zero color when nothing covers it). The shader writes
/// `output_color`, which the pipeline then copies into the color buffer.
/// Both color slots start at the zero color on every invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentContext {
    pub position: UVec2,
    pub depth: f32,
    pub varying_color: Vec4,
    pub output_color: Vec4,
}

/// User-programmable vertex and fragment hooks. Both default to no-ops; a
/// fragment stage that never writes `output_color` paints the zero color.
///
/// Shader values may carry their own state across invocations, but the
/// pipeline guarantees nothing about invocation order beyond row-major
/// pixel traversal within one draw call.
pub trait Shader {
    /// Runs once per referenced vertex before rasterization, on the copy of
    /// the vertex that the primitive will own. Mutations are visible to
    /// rasterization and to color interpolation.
    fn run_vertex(&mut self, _vertex: &mut Vertex) {}

    /// Runs once per frame pixel after rasterization, covered or not.
    fn run_fragment(&mut self, _context: &mut FragmentContext) {}
}

/// Forwards the interpolated vertex color straight to the output slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexColorShader;

impl Shader for VertexColorShader {
    fn run_fragment(&mut self, context: &mut FragmentContext) {
        context.output_color = context.varying_color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_color_shader_forwards_varying() {
        let mut context = FragmentContext {
            position: UVec2::new(3, 5),
            depth: 0.25,
            varying_color: Vec4::new(0.1, 0.2, 0.3, 1.0),
            output_color: Vec4::zeros(),
        };
        VertexColorShader.run_fragment(&mut context);
        assert_eq!(context.output_color, Vec4::new(0.1, 0.2, 0.3, 1.0));
    }
}
