//! Separable 2-D plane resizing.
//!
//! Rows first, then columns: every source row is resized to the destination
//! width into an intermediate buffer, then every destination column is
//! gathered, resized to the destination height, and scattered back. Scratch
//! buffers are allocated once per call and released on every exit path; an
//! allocation failure leaves the destination untouched.

use crate::error::Result;
use crate::resample::resize_multistep;
use rescale_core::{try_alloc_vec, PlaneView, PlaneViewMut, Sample};

/// Resize the active region of `src` into the active region of `dst`.
///
/// Both views fix their own dimensions; the resize ratio is implied. The
/// destination's padding margin is untouched (extend borders afterwards if
/// the picture feeds motion search).
pub fn resize_plane<S: Sample>(
    src: &PlaneView<'_, S>,
    dst: &mut PlaneViewMut<'_, S>,
    bit_depth: u32,
) -> Result<()> {
    let (w, h) = (src.width(), src.height());
    let (w2, h2) = (dst.width(), dst.height());
    assert!(w > 0 && h > 0 && w2 > 0 && h2 > 0);

    let mut intbuf: Vec<S> = try_alloc_vec(w2 * h, "resize row intermediate")?;
    let mut tmpbuf: Vec<S> = try_alloc_vec(w.max(h), "resize scratch")?;
    let mut arrbuf: Vec<S> = try_alloc_vec(h, "resize column gather")?;
    let mut arrbuf2: Vec<S> = try_alloc_vec(h2, "resize column output")?;

    for i in 0..h {
        resize_multistep(
            src.row(i),
            &mut intbuf[w2 * i..w2 * (i + 1)],
            &mut tmpbuf,
            bit_depth,
        );
    }

    for j in 0..w2 {
        for i in 0..h {
            arrbuf[i] = intbuf[w2 * i + j];
        }
        resize_multistep(&arrbuf, &mut arrbuf2, &mut tmpbuf, bit_depth);
        for i in 0..h2 {
            dst.row_mut(i)[j] = arrbuf2[i];
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescale_core::{PlaneView, PlaneViewMut};

    fn checker(w: usize, h: usize) -> Vec<u8> {
        (0..w * h)
            .map(|i| {
                let (x, y) = (i % w, i / w);
                if (x + y) % 2 == 0 {
                    200
                } else {
                    40
                }
            })
            .collect()
    }

    #[test]
    fn test_resize_plane_halves() {
        let src_data = checker(32, 32);
        let src = PlaneView::<u8>::new(&src_data, 32, 32, 32, 0, 0).unwrap();
        let mut dst_data = vec![0u8; 16 * 16];
        let mut dst = PlaneViewMut::<u8>::new(&mut dst_data, 16, 16, 16, 0, 0).unwrap();
        resize_plane(&src, &mut dst, 8).unwrap();
        // A 2x2 checker downsampled by 2 averages toward the midpoint.
        let mid = dst_data[8 * 16 + 8] as i32;
        assert!((mid - 120).abs() < 16, "got {}", mid);
    }

    #[test]
    fn test_resize_plane_flat_stays_flat() {
        let src_data = vec![99u8; 176 * 144];
        let src = PlaneView::<u8>::new(&src_data, 176, 144, 176, 0, 0).unwrap();
        let mut dst_data = vec![0u8; 120 * 144];
        let mut dst = PlaneViewMut::<u8>::new(&mut dst_data, 120, 144, 120, 0, 0).unwrap();
        resize_plane(&src, &mut dst, 8).unwrap();
        assert!(dst_data.iter().all(|&v| v == 99));
    }

    #[test]
    fn test_resize_plane_respects_strides_and_origin() {
        // Source active 8x8 at origin (2, 2) in a 12-stride buffer.
        let mut src_data = vec![0u8; 12 * 12];
        for y in 0..8 {
            for x in 0..8 {
                src_data[(y + 2) * 12 + x + 2] = (16 * y) as u8;
            }
        }
        let src = PlaneView::<u8>::new(&src_data, 8, 8, 12, 2, 2).unwrap();
        let mut dst_data = vec![0xAAu8; 10 * 6];
        let mut dst = PlaneViewMut::<u8>::new(&mut dst_data, 4, 4, 10, 1, 1).unwrap();
        resize_plane(&src, &mut dst, 8).unwrap();
        // Padding bytes outside the active destination remain untouched.
        assert_eq!(dst_data[0], 0xAA);
        assert_eq!(dst_data[10 * 6 - 1], 0xAA);
        // Rows still increase top to bottom.
        let top = dst_data[1 * 10 + 1];
        let bottom = dst_data[4 * 10 + 1];
        assert!(bottom > top);
    }

    #[test]
    fn test_resize_plane_highbd() {
        let src_data: Vec<u16> = (0..64u16).map(|i| i * 16).collect();
        let src = PlaneView::<u16>::new(&src_data, 8, 8, 8, 0, 0).unwrap();
        let mut dst_data = vec![0u16; 4 * 4];
        let mut dst = PlaneViewMut::<u16>::new(&mut dst_data, 4, 4, 4, 0, 0).unwrap();
        resize_plane(&src, &mut dst, 10).unwrap();
        assert!(dst_data.iter().all(|&v| v <= 1023));
        assert!(dst_data[15] > dst_data[0]);
    }
}
