//! Plane views: bounds-checked access to the active region of a picture plane.
//!
//! A view wraps a base sample slice together with width, height, stride and
//! the origin offset of the active region inside the padded buffer. All row
//! accessors are range-checked, so offset arithmetic lives here and nowhere
//! else.

use crate::error::{Error, Result};
use crate::sample::Sample;

/// Immutable view over the active `width x height` region of a plane.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a, S: Sample> {
    data: &'a [S],
    width: usize,
    height: usize,
    stride: usize,
    /// Offset of the first active sample inside `data`.
    origin: usize,
}

impl<'a, S: Sample> PlaneView<'a, S> {
    /// Create a view with an explicit origin offset.
    ///
    /// `data` is the full padded plane; the active region starts at
    /// `origin_y * stride + origin_x`.
    pub fn new(
        data: &'a [S],
        width: usize,
        height: usize,
        stride: usize,
        origin_x: usize,
        origin_y: usize,
    ) -> Result<Self> {
        check_bounds(data.len(), width, height, stride, origin_x, origin_y)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            origin: origin_y * stride + origin_x,
        })
    }

    /// Active region width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Active region height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per row of the underlying buffer.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// One active row.
    pub fn row(&self, y: usize) -> &[S] {
        assert!(y < self.height, "row {} out of {}", y, self.height);
        let start = self.origin + y * self.stride;
        &self.data[start..start + self.width]
    }

    /// A single sample.
    pub fn sample(&self, x: usize, y: usize) -> S {
        self.row(y)[x]
    }
}

/// Mutable view over the active region of a plane.
#[derive(Debug)]
pub struct PlaneViewMut<'a, S: Sample> {
    data: &'a mut [S],
    width: usize,
    height: usize,
    stride: usize,
    origin: usize,
}

impl<'a, S: Sample> PlaneViewMut<'a, S> {
    /// Create a mutable view with an explicit origin offset.
    pub fn new(
        data: &'a mut [S],
        width: usize,
        height: usize,
        stride: usize,
        origin_x: usize,
        origin_y: usize,
    ) -> Result<Self> {
        check_bounds(data.len(), width, height, stride, origin_x, origin_y)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            origin: origin_y * stride + origin_x,
        })
    }

    /// Active region width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Active region height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per row of the underlying buffer.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// One active row, mutable.
    pub fn row_mut(&mut self, y: usize) -> &mut [S] {
        assert!(y < self.height, "row {} out of {}", y, self.height);
        let start = self.origin + y * self.stride;
        &mut self.data[start..start + self.width]
    }

    /// One active row, immutable.
    pub fn row(&self, y: usize) -> &[S] {
        assert!(y < self.height, "row {} out of {}", y, self.height);
        let start = self.origin + y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> PlaneView<'_, S> {
        PlaneView {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            origin: self.origin,
        }
    }
}

fn check_bounds(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    origin_x: usize,
    origin_y: usize,
) -> Result<()> {
    if width == 0 || height == 0 || stride < width + origin_x {
        return Err(Error::InvalidDimensions {
            width: width as u32,
            height: height as u32,
        });
    }
    // Last active sample must be addressable.
    let needed = (origin_y + height - 1) * stride + origin_x + width;
    if needed > len {
        return Err(Error::BufferTooSmall {
            needed,
            available: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_rows() {
        let data: Vec<u8> = (0..24).collect();
        // 4x3 active region inside a stride-6 buffer, origin (1, 0).
        let view = PlaneView::new(&data, 4, 3, 6, 1, 0).unwrap();
        assert_eq!(view.row(0), &[1, 2, 3, 4]);
        assert_eq!(view.row(2), &[13, 14, 15, 16]);
        assert_eq!(view.sample(3, 1), 10);
    }

    #[test]
    fn test_view_rejects_short_buffer() {
        let data = vec![0u8; 10];
        assert!(PlaneView::new(&data, 4, 3, 6, 1, 0).is_err());
    }

    #[test]
    fn test_view_rejects_zero_dims() {
        let data = vec![0u8; 10];
        assert!(PlaneView::new(&data, 0, 3, 6, 0, 0).is_err());
    }

    #[test]
    fn test_mut_view_writes() {
        let mut data = vec![0u16; 12];
        let mut view = PlaneViewMut::new(&mut data, 3, 2, 4, 0, 1).unwrap();
        view.row_mut(1).copy_from_slice(&[7, 8, 9]);
        assert_eq!(&data[8..11], &[7, 8, 9]);
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_range_panics() {
        let data = vec![0u8; 12];
        let view = PlaneView::new(&data, 3, 2, 4, 0, 0).unwrap();
        let _ = view.row(2);
    }
}
