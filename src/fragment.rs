//! Per-pixel scratch state written by rasterization and read by shading.

/// Interpolation weights recorded for a covered pixel, tagged by the kind
/// of primitive that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weights {
    /// Distance parameter along a line: 0 at the first endpoint, 1 at the
    /// second.
    Line { t: f32 },
    /// Barycentric weights against a triangle's three vertices.
    Triangle { barycentric: [f32; 3] },
}

/// What the rasterizer left on one pixel: which primitive covered it last
/// and how to interpolate that primitive's attributes there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    /// Index into the draw call's primitive list.
    pub primitive: usize,
    /// Depth interpolated from the primitive's vertex positions.
    pub depth: f32,
    pub weights: Weights,
}

/// One cell of the depth buffer. Starts empty, is reset to empty at the
/// start of every draw call, and holds the coverage of whichever primitive
/// touched the pixel last.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fragment {
    pub coverage: Option<Coverage>,
}
