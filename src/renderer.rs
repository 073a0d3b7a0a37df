//! Renderer binding state and the draw pipeline.
//!
//! A draw call stages the pipeline in three full passes: run the vertex
//! shader over every referenced vertex and collect the resulting primitives,
//! rasterize each primitive into the depth buffer's fragments, then shade
//! every pixel of the frame exactly once and write the colors out.

use nalgebra_glm::{self as glm, UVec2, Vec4};

use crate::buffer::{DepthBuffer, FrameBuffer, OutOfBounds};
use crate::fragment::{Coverage, Fragment, Weights};
use crate::geometry::{Line, Primitive, Triangle, Vertex};
use crate::shader::{FragmentContext, Shader};

/// Identifies one of the renderer's four binding slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    FrameBuffer,
    VertexBuffer,
    IndexBuffer,
    Shader,
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::FrameBuffer => write!(f, "frame buffer"),
            Binding::VertexBuffer => write!(f, "vertex buffer"),
            Binding::IndexBuffer => write!(f, "index buffer"),
            Binding::Shader => write!(f, "shader"),
        }
    }
}

/// Error type for draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// A draw call ran while a binding slot was still empty.
    MissingBinding(Binding),
    /// Index buffer length is not a multiple of the primitive vertex count.
    IndexCount { len: usize, stride: usize },
    /// An index referenced past the end of the vertex buffer.
    IndexOutOfRange { index: usize, vertex_count: usize },
    /// A rasterized pixel fell outside the frame; nothing is clipped, so
    /// out-of-frame geometry surfaces here.
    OutOfBounds(OutOfBounds),
}

impl From<OutOfBounds> for RenderError {
    fn from(e: OutOfBounds) -> Self {
        RenderError::OutOfBounds(e)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::MissingBinding(binding) => {
                write!(f, "draw call issued with no {} bound", binding)
            }
            RenderError::IndexCount { len, stride } => {
                write!(f, "index buffer length {} is not a multiple of {}", len, stride)
            }
            RenderError::IndexOutOfRange { index, vertex_count } => {
                write!(f, "index {} is out of range for {} vertices", index, vertex_count)
            }
            RenderError::OutOfBounds(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RenderError {}

/// Primitive topology selected by a draw call.
#[derive(Clone, Copy)]
enum Topology {
    Lines,
    Triangles,
}

impl Topology {
    fn stride(self) -> usize {
        match self {
            Topology::Lines => 2,
            Topology::Triangles => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Topology::Lines => "lines",
            Topology::Triangles => "triangles",
        }
    }
}

/// Binds the resources a draw call needs and runs the pipeline over them.
///
/// All four slots hold borrows: the renderer owns nothing, and the borrow
/// checker holds the caller to keeping bound objects alive while the
/// renderer can still use them. Rebinding a slot replaces the previous
/// binding unconditionally (last bind wins). Draw calls are repeatable once
/// all four slots are bound.
pub struct Renderer<'a> {
    frame_buffer: Option<&'a mut FrameBuffer>,
    vertex_buffer: Option<&'a [Vertex]>,
    index_buffer: Option<&'a [usize]>,
    shader: Option<&'a mut dyn Shader>,
}

impl<'a> Renderer<'a> {
    pub fn new() -> Self {
        Self {
            frame_buffer: None,
            vertex_buffer: None,
            index_buffer: None,
            shader: None,
        }
    }

    /// Binds the frame buffer that receives rasterization and shading output.
    pub fn bind_frame_buffer(&mut self, frame_buffer: &'a mut FrameBuffer) {
        self.frame_buffer = Some(frame_buffer);
    }

    /// Binds the vertices that index buffers refer into.
    pub fn bind_vertex_buffer(&mut self, vertex_buffer: &'a [Vertex]) {
        self.vertex_buffer = Some(vertex_buffer);
    }

    /// Binds the index list consumed in groups of two (lines) or three
    /// (triangles) by the draw calls.
    pub fn bind_index_buffer(&mut self, index_buffer: &'a [usize]) {
        self.index_buffer = Some(index_buffer);
    }

    /// Binds the shader whose hooks the pipeline invokes.
    pub fn bind_shader(&mut self, shader: &'a mut dyn Shader) {
        self.shader = Some(shader);
    }

    /// Draws the bound index buffer as line segments, two indices each.
    pub fn draw_lines(&mut self) -> Result<(), RenderError> {
        self.draw(Topology::Lines)
    }

    /// Draws the bound index buffer as triangles, three indices each.
    pub fn draw_triangles(&mut self) -> Result<(), RenderError> {
        self.draw(Topology::Triangles)
    }

    fn draw(&mut self, topology: Topology) -> Result<(), RenderError> {
        let frame = self
            .frame_buffer
            .as_deref_mut()
            .ok_or(RenderError::MissingBinding(Binding::FrameBuffer))?;
        let vertices = self
            .vertex_buffer
            .ok_or(RenderError::MissingBinding(Binding::VertexBuffer))?;
        let indices = self
            .index_buffer
            .ok_or(RenderError::MissingBinding(Binding::IndexBuffer))?;
        let shader = self
            .shader
            .as_deref_mut()
            .ok_or(RenderError::MissingBinding(Binding::Shader))?;

        let stride = topology.stride();
        if indices.len() % stride != 0 {
            return Err(RenderError::IndexCount {
                len: indices.len(),
                stride,
            });
        }
        for &index in indices {
            if index >= vertices.len() {
                return Err(RenderError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        // Preconditions hold; from here on the frame may be mutated. Stale
        // coverage would index into the previous draw call's primitive list,
        // so every fragment is reset first.
        frame.depth_buffer_mut().fill(Fragment::default());

        // Vertex stage: shade every referenced vertex copy and collect the
        // primitives before any rasterization starts.
        let primitives: Vec<Primitive> = indices
            .chunks_exact(stride)
            .map(|chunk| match topology {
                Topology::Lines => {
                    let mut a = vertices[chunk[0]];
                    let mut b = vertices[chunk[1]];
                    shader.run_vertex(&mut a);
                    shader.run_vertex(&mut b);
                    Primitive::Line(Line::new(a, b))
                }
                Topology::Triangles => {
                    let mut a = vertices[chunk[0]];
                    let mut b = vertices[chunk[1]];
                    let mut c = vertices[chunk[2]];
                    shader.run_vertex(&mut a);
                    shader.run_vertex(&mut b);
                    shader.run_vertex(&mut c);
                    Primitive::Triangle(Triangle::new(a, b, c))
                }
            })
            .collect();

        let dimensions = frame.dimensions();
        for (index, primitive) in primitives.iter().enumerate() {
            match primitive {
                Primitive::Line(line) => {
                    rasterize_line(frame.depth_buffer_mut(), dimensions, index, line)?
                }
                Primitive::Triangle(triangle) => {
                    rasterize_triangle(frame.depth_buffer_mut(), dimensions, index, triangle)?
                }
            }
        }

        shade_fragments(frame, shader, &primitives)?;

        log::debug!(
            "drew {} {} into a {}x{} frame",
            primitives.len(),
            topology.label(),
            dimensions.x,
            dimensions.y
        );
        Ok(())
    }
}

impl<'a> Default for Renderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Scales a normalized [0, 1] position onto the frame: multiply by
/// (dimension - 1) per axis and truncate. Coordinates stay signed so that
/// out-of-frame geometry reports its real pixel values when it faults.
fn to_pixel(position: &Vec4, dimensions: UVec2) -> (i64, i64) {
    let x = position.x * dimensions.x.saturating_sub(1) as f32;
    let y = position.y * dimensions.y.saturating_sub(1) as f32;
    (x as i64, y as i64)
}

/// Checks a signed pixel coordinate against the frame. No clipping happens
/// anywhere in the pipeline, so this is where unclipped geometry faults.
fn pixel_cell(x: i64, y: i64, dimensions: UVec2) -> Result<UVec2, OutOfBounds> {
    if x < 0 || y < 0 || x >= i64::from(dimensions.x) || y >= i64::from(dimensions.y) {
        return Err(OutOfBounds {
            x,
            y,
            width: dimensions.x,
            height: dimensions.y,
        });
    }
    Ok(UVec2::new(x as u32, y as u32))
}

fn distance(x0: i64, y0: i64, x1: i64, y1: i64) -> f32 {
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Bresenham over the line's scaled endpoints, writing coverage for every
/// visited pixel. `index` is the line's slot in the draw call's primitive
/// list.
fn rasterize_line(
    depth: &mut DepthBuffer,
    dimensions: UVec2,
    index: usize,
    line: &Line,
) -> Result<(), OutOfBounds> {
    let (x0, y0) = to_pixel(&line.vertices[0].position, dimensions);
    let (x1, y1) = to_pixel(&line.vertices[1].position, dimensions);
    let z0 = line.vertices[0].position.z;
    let z1 = line.vertices[1].position.z;

    let total = distance(x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = x0;
    let mut y = y0;

    loop {
        // t comes from absolute coordinates at every step, not from the
        // stepping accumulator, so it is exact along rounded paths. A line
        // collapsing to a single pixel keeps t = 0.
        let t = if total > 0.0 {
            distance(x0, y0, x, y) / total
        } else {
            0.0
        };
        let cell = pixel_cell(x, y, dimensions)?;
        depth.set(
            cell,
            Fragment {
                coverage: Some(Coverage {
                    primitive: index,
                    depth: glm::lerp_scalar(z0, z1, t),
                    weights: Weights::Line { t },
                }),
            },
        )?;

        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    Ok(())
}

/// Edge-inclusive barycentric fill. The whole frame is scanned per triangle,
/// so only in-frame pixels are ever tested and out-of-frame vertices cannot
/// fault here; pixels on shared edges are simply overwritten by whichever
/// triangle rasterizes last.
fn rasterize_triangle(
    depth: &mut DepthBuffer,
    dimensions: UVec2,
    index: usize,
    triangle: &Triangle,
) -> Result<(), OutOfBounds> {
    let (x0, y0) = to_pixel(&triangle.vertices[0].position, dimensions);
    let (x1, y1) = to_pixel(&triangle.vertices[1].position, dimensions);
    let (x2, y2) = to_pixel(&triangle.vertices[2].position, dimensions);
    let (x0, y0) = (x0 as f32, y0 as f32);
    let (x1, y1) = (x1 as f32, y1 as f32);
    let (x2, y2) = (x2 as f32, y2 as f32);

    let denominator = (y1 - y2) * (x0 - x2) + (x2 - x1) * (y0 - y2);
    // Zero signed area: no pixel can pass the weight test, skip the scan.
    if denominator == 0.0 {
        return Ok(());
    }

    let z = [
        triangle.vertices[0].position.z,
        triangle.vertices[1].position.z,
        triangle.vertices[2].position.z,
    ];

    for y in 0..dimensions.y {
        for x in 0..dimensions.x {
            let px = x as f32;
            let py = y as f32;
            let b0 = ((y1 - y2) * (px - x2) + (x2 - x1) * (py - y2)) / denominator;
            let b1 = ((y2 - y0) * (px - x2) + (x0 - x2) * (py - y2)) / denominator;
            let b2 = 1.0 - b0 - b1;
            let covered =
                b0 >= 0.0 && b0 <= 1.0 && b1 >= 0.0 && b1 <= 1.0 && b2 >= 0.0 && b2 <= 1.0;
            if covered {
                depth.set(
                    UVec2::new(x, y),
                    Fragment {
                        coverage: Some(Coverage {
                            primitive: index,
                            depth: b0 * z[0] + b1 * z[1] + b2 * z[2],
                            weights: Weights::Triangle {
                                barycentric: [b0, b1, b2],
                            },
                        }),
                    },
                )?;
            }
        }
    }
    Ok(())
}

/// Full-frame shading pass: every pixel runs the fragment shader exactly
/// once, covered or not, and the output slot lands in the color buffer.
fn shade_fragments(
    frame: &mut FrameBuffer,
    shader: &mut dyn Shader,
    primitives: &[Primitive],
) -> Result<(), OutOfBounds> {
    let dimensions = frame.dimensions();
    let (color, depth) = frame.buffers_mut();
    for y in 0..dimensions.y {
        for x in 0..dimensions.x {
            let position = UVec2::new(x, y);
            let fragment = *depth.get(position)?;
            let mut context = FragmentContext {
                position,
                depth: 0.0,
                varying_color: Vec4::zeros(),
                output_color: Vec4::zeros(),
            };
            if let Some(coverage) = fragment.coverage {
                context.depth = coverage.depth;
                context.varying_color =
                    varying_color(&primitives[coverage.primitive], coverage.weights);
            }
            shader.run_fragment(&mut context);
            color.set(position, context.output_color)?;
        }
    }
    Ok(())
}

/// Interpolates a primitive's vertex colors at the given coverage weights.
fn varying_color(primitive: &Primitive, weights: Weights) -> Vec4 {
    match (primitive, weights) {
        (Primitive::Line(line), Weights::Line { t }) => line.color_at(t),
        (Primitive::Triangle(triangle), Weights::Triangle { barycentric }) => {
            triangle.color_at(barycentric)
        }
        // Coverage is only ever written by the primitive it names; a mixed
        // pairing carries no color.
        _ => Vec4::zeros(),
    }
}
