//! Vertex and primitive types fed through the pipeline.

use nalgebra_glm::{self as glm, Vec4};
use serde::{Deserialize, Serialize};

/// One point of geometry: a homogeneous position and an RGBA color.
///
/// Positions are normalized device coordinates: the renderer maps x and y
/// from [0, 1] onto the frame. Vertices are copied by value into primitives;
/// the source buffer is never mutated by a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec4,
    pub color: Vec4,
}

impl Vertex {
    pub fn new(position: Vec4, color: Vec4) -> Self {
        Self { position, color }
    }
}

/// Line segment owning two vertex copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub vertices: [Vertex; 2],
}

impl Line {
    pub fn new(a: Vertex, b: Vertex) -> Self {
        Self { vertices: [a, b] }
    }

    /// Vertex color interpolated at parameter `t` along the segment.
    pub fn color_at(&self, t: f32) -> Vec4 {
        glm::lerp(&self.vertices[0].color, &self.vertices[1].color, t)
    }
}

/// Triangle owning three vertex copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Vertex color interpolated at the given barycentric weights.
    pub fn color_at(&self, weights: [f32; 3]) -> Vec4 {
        self.vertices[0].color * weights[0]
            + self.vertices[1].color * weights[1]
            + self.vertices[2].color * weights[2]
    }
}

/// A renderable primitive, tagged by kind. Primitives live in a per-draw
/// list that outlives rasterization so fragments can refer back into it
/// during shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line(Line),
    Triangle(Triangle),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(color: Vec4) -> Vertex {
        Vertex::new(Vec4::new(0.0, 0.0, 0.0, 1.0), color)
    }

    #[test]
    fn test_line_color_midpoint() {
        let line = Line::new(
            vertex(Vec4::new(0.0, 0.0, 1.0, 1.0)),
            vertex(Vec4::new(1.0, 0.0, 0.0, 1.0)),
        );
        let mid = line.color_at(0.5);
        assert!((mid - Vec4::new(0.5, 0.0, 0.5, 1.0)).abs().max() < 1e-6);
    }

    #[test]
    fn test_triangle_color_at_corners() {
        let triangle = Triangle::new(
            vertex(Vec4::new(1.0, 0.0, 0.0, 1.0)),
            vertex(Vec4::new(0.0, 1.0, 0.0, 1.0)),
            vertex(Vec4::new(0.0, 0.0, 1.0, 1.0)),
        );
        let at_first = triangle.color_at([1.0, 0.0, 0.0]);
        assert!((at_first - Vec4::new(1.0, 0.0, 0.0, 1.0)).abs().max() < 1e-6);
        let blended = triangle.color_at([0.25, 0.25, 0.5]);
        assert!((blended - Vec4::new(0.25, 0.25, 0.5, 1.0)).abs().max() < 1e-6);
    }
}
