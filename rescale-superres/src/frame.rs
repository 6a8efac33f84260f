//! Frame-level resize.
//!
//! Iterates the planes of a picture, resolving the bit depth once per call:
//! 8-bit planes are resized in place through direct views, high-bit-depth
//! planes are packed to planar `u16`, resized, and unpacked back into the
//! destination's native representation. Border extension is deliberately left
//! to the caller.

use crate::error::{Result, SuperresError};
use crate::plane::resize_plane;
use rescale_core::{pack_highbd, unpack_highbd, PictureBuffer, PlaneView, PlaneViewMut, MAX_PLANES};
use tracing::trace;

/// Resize every plane of `src` into `dst`.
///
/// `num_planes` bounds the plane loop as `min(num_planes, MAX_PLANES - 1)`
/// inclusive (0 resizes luma only). `ss_x`/`ss_y` are the chroma subsampling
/// shifts applied to plane dimensions and origins.
pub fn resize_and_extend_frame(
    src: &PictureBuffer,
    dst: &mut PictureBuffer,
    bit_depth: u32,
    num_planes: usize,
    ss_x: u32,
    ss_y: u32,
) -> Result<()> {
    if src.bit_depth() != dst.bit_depth() {
        return Err(SuperresError::mismatch(format!(
            "bit depth {} vs {}",
            src.bit_depth(),
            dst.bit_depth()
        )));
    }

    trace!(
        src_w = src.width(),
        src_h = src.height(),
        dst_w = dst.width(),
        dst_h = dst.height(),
        bit_depth,
        "resizing frame"
    );

    let last_plane = num_planes.min(MAX_PLANES - 1);

    if bit_depth > 8 {
        let src_packed = pack_highbd(src)?;
        let mut dst_packed = pack_highbd(dst)?;

        for plane in 0..=last_plane {
            if !src.plane_mask().has_plane(plane)
                || !dst.plane_mask().has_plane(plane)
                || plane >= src.color_format().num_planes()
            {
                continue;
            }
            let (shift_x, shift_y) = plane_shifts(plane, ss_x, ss_y);
            let (sw, sh) = shifted_dims(src, shift_x, shift_y);
            let (dw, dh) = shifted_dims(dst, shift_x, shift_y);
            let src_view = PlaneView::<u16>::new(
                &src_packed[plane],
                sw,
                sh,
                src.plane_stride(plane),
                (src.origin_x() >> shift_x) as usize,
                (src.origin_y() >> shift_y) as usize,
            )?;
            let mut dst_view = PlaneViewMut::<u16>::new(
                &mut dst_packed[plane],
                dw,
                dh,
                dst.plane_stride(plane),
                (dst.origin_x() >> shift_x) as usize,
                (dst.origin_y() >> shift_y) as usize,
            )?;
            resize_plane(&src_view, &mut dst_view, bit_depth)?;
        }

        unpack_highbd(&dst_packed, dst)?;
    } else {
        for plane in 0..=last_plane {
            if !src.plane_mask().has_plane(plane)
                || !dst.plane_mask().has_plane(plane)
                || plane >= src.color_format().num_planes()
            {
                continue;
            }
            let (shift_x, shift_y) = plane_shifts(plane, ss_x, ss_y);
            let (sw, sh) = shifted_dims(src, shift_x, shift_y);
            let (dw, dh) = shifted_dims(dst, shift_x, shift_y);
            let src_view = PlaneView::<u8>::new(
                src.plane_data(plane),
                sw,
                sh,
                src.plane_stride(plane),
                (src.origin_x() >> shift_x) as usize,
                (src.origin_y() >> shift_y) as usize,
            )?;
            // Split borrow: take the plane storage straight from the buffer.
            let dst_stride = dst.plane_stride(plane);
            let dst_ox = (dst.origin_x() >> shift_x) as usize;
            let dst_oy = (dst.origin_y() >> shift_y) as usize;
            let mut dst_view = PlaneViewMut::<u8>::new(
                dst.plane_data_mut(plane),
                dw,
                dh,
                dst_stride,
                dst_ox,
                dst_oy,
            )?;
            resize_plane(&src_view, &mut dst_view, bit_depth)?;
        }
    }

    Ok(())
}

fn plane_shifts(plane: usize, ss_x: u32, ss_y: u32) -> (u32, u32) {
    if plane == 0 {
        (0, 0)
    } else {
        (ss_x, ss_y)
    }
}

fn shifted_dims(picture: &PictureBuffer, shift_x: u32, shift_y: u32) -> (usize, usize) {
    (
        (picture.width() >> shift_x) as usize,
        (picture.height() >> shift_y) as usize,
    )
}
