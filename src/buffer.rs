//! Bounds-checked 2D storage and the frame buffer built from it.
//!
//! Everything the pipeline writes lands in a [`Buffer2D`]: colors in a
//! `Buffer2D<Vec4>`, rasterizer fragments in a `Buffer2D<Fragment>`. A
//! [`FrameBuffer`] pairs one of each at identical dimensions and is the
//! unit bound to the renderer.

use nalgebra_glm::{UVec2, Vec4};

use crate::fragment::Fragment;

/// Error raised when a buffer is addressed outside its dimensions.
///
/// Coordinates are signed so that unclipped rasterization can report pixels
/// that fell off the negative side of the frame with their actual values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "position ({}, {}) is out of range for a {}x{} buffer",
            self.x, self.y, self.width, self.height
        )
    }
}

impl std::error::Error for OutOfBounds {}

/// Flat row-major 2D storage addressed by unsigned (x, y).
///
/// The index of a cell is fixed at `y * width + x` with the origin in the
/// top-left corner. Out-of-range access is an error, never a clamp. The
/// buffer is move-only; the backing storage is released exactly once.
pub struct Buffer2D<T> {
    dimensions: UVec2,
    data: Vec<T>,
}

impl<T: Default + Clone> Buffer2D<T> {
    /// Allocates `width * height` default-valued cells.
    pub fn new(dimensions: UVec2) -> Self {
        Self::filled(dimensions, T::default())
    }
}

impl<T: Clone> Buffer2D<T> {
    /// Allocates `width * height` copies of `value`.
    pub fn filled(dimensions: UVec2, value: T) -> Self {
        let capacity = dimensions.x as usize * dimensions.y as usize;
        Self {
            dimensions,
            data: vec![value; capacity],
        }
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Buffer2D<T> {
    pub fn dimensions(&self) -> UVec2 {
        self.dimensions
    }

    /// The flat cell slice in row-major order, for external consumers such
    /// as image encoding.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn get(&self, position: UVec2) -> Result<&T, OutOfBounds> {
        let index = self.index(position)?;
        Ok(&self.data[index])
    }

    pub fn get_mut(&mut self, position: UVec2) -> Result<&mut T, OutOfBounds> {
        let index = self.index(position)?;
        Ok(&mut self.data[index])
    }

    pub fn set(&mut self, position: UVec2, value: T) -> Result<(), OutOfBounds> {
        let index = self.index(position)?;
        self.data[index] = value;
        Ok(())
    }

    fn index(&self, position: UVec2) -> Result<usize, OutOfBounds> {
        if position.x >= self.dimensions.x || position.y >= self.dimensions.y {
            return Err(OutOfBounds {
                x: i64::from(position.x),
                y: i64::from(position.y),
                width: self.dimensions.x,
                height: self.dimensions.y,
            });
        }
        Ok(position.y as usize * self.dimensions.x as usize + position.x as usize)
    }
}

/// Per-pixel RGBA float colors, the draw call's final output.
pub type ColorBuffer = Buffer2D<Vec4>;

/// Per-pixel fragments written by rasterization and consumed by shading.
pub type DepthBuffer = Buffer2D<Fragment>;

/// One color buffer and one depth buffer of identical dimensions, owned
/// together. Rebinding a renderer elsewhere never mutates this one.
pub struct FrameBuffer {
    dimensions: UVec2,
    color: ColorBuffer,
    depth: DepthBuffer,
}

impl FrameBuffer {
    /// Allocates both sub-buffers: colors start at the zero color, depth
    /// cells start empty.
    pub fn new(dimensions: UVec2) -> Self {
        Self {
            dimensions,
            color: Buffer2D::filled(dimensions, Vec4::zeros()),
            depth: Buffer2D::new(dimensions),
        }
    }

    pub fn dimensions(&self) -> UVec2 {
        self.dimensions
    }

    pub fn color_buffer(&self) -> &ColorBuffer {
        &self.color
    }

    pub fn color_buffer_mut(&mut self) -> &mut ColorBuffer {
        &mut self.color
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn depth_buffer_mut(&mut self) -> &mut DepthBuffer {
        &mut self.depth
    }

    /// Mutable access to both sub-buffers at once, for passes that read
    /// fragments while writing colors.
    pub fn buffers_mut(&mut self) -> (&mut ColorBuffer, &mut DepthBuffer) {
        (&mut self.color, &mut self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip() {
        let mut buffer: Buffer2D<u32> = Buffer2D::new(UVec2::new(4, 3));
        for y in 0..3 {
            for x in 0..4 {
                buffer.set(UVec2::new(x, y), y * 10 + x).unwrap();
            }
        }
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(*buffer.get(UVec2::new(x, y)).unwrap(), y * 10 + x);
            }
        }
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut buffer: Buffer2D<u32> = Buffer2D::new(UVec2::new(2, 2));
        *buffer.get_mut(UVec2::new(1, 1)).unwrap() = 9;
        assert_eq!(*buffer.get(UVec2::new(1, 1)).unwrap(), 9);
    }

    #[test]
    fn test_out_of_range_reported() {
        let mut buffer: Buffer2D<u32> = Buffer2D::new(UVec2::new(4, 3));
        let expected = OutOfBounds {
            x: 4,
            y: 0,
            width: 4,
            height: 3,
        };
        assert_eq!(buffer.get(UVec2::new(4, 0)), Err(expected));
        assert_eq!(buffer.set(UVec2::new(4, 0), 1), Err(expected));
        assert!(buffer.get(UVec2::new(0, 3)).is_err());
        assert!(buffer.get_mut(UVec2::new(0, 3)).is_err());
    }

    #[test]
    fn test_row_major_layout() {
        let mut buffer: Buffer2D<u32> = Buffer2D::new(UVec2::new(3, 2));
        buffer.set(UVec2::new(1, 0), 1).unwrap();
        buffer.set(UVec2::new(0, 1), 2).unwrap();
        assert_eq!(buffer.data(), &[0, 1, 0, 2, 0, 0]);
    }

    #[test]
    fn test_frame_buffer_allocation() {
        let frame = FrameBuffer::new(UVec2::new(4, 2));
        assert_eq!(frame.dimensions(), UVec2::new(4, 2));
        assert_eq!(frame.color_buffer().dimensions(), UVec2::new(4, 2));
        assert_eq!(frame.depth_buffer().dimensions(), UVec2::new(4, 2));
        assert!(frame.color_buffer().data().iter().all(|c| *c == Vec4::zeros()));
        assert!(frame.depth_buffer().data().iter().all(|f| f.coverage.is_none()));
    }
}
