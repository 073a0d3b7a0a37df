//! Minimal CPU software rendering pipeline
//!
//! Geometry comes in as slices of normalized-coordinate vertices, a
//! programmable shader runs over vertex copies and then over every pixel of
//! the frame, and the result lands in an owned frame buffer that exports to
//! PNG. There is no clipping and no depth test: lines fault when they leave
//! the frame, triangles scan the whole frame, and whichever primitive
//! rasterizes a pixel last owns it.

mod buffer;
mod export;
mod fragment;
mod geometry;
mod renderer;
mod scene;
mod shader;

pub use buffer::*;
pub use export::*;
pub use fragment::*;
pub use geometry::*;
pub use renderer::*;
pub use scene::*;
pub use shader::*;

pub use nalgebra_glm::{UVec2, Vec4};
