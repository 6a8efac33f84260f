//! Border extension.
//!
//! Motion search reads beyond the active picture area, so every picture used
//! as a reference carries a padding margin filled by replicating the edge
//! samples outward. Resizing only writes the active region; callers extend
//! afterwards.

use crate::picture::{PictureBuffer, PlaneMask, MAX_PLANES};

/// Replicate the active-region edges of each selected plane into the
/// surrounding padding margin.
pub fn extend_borders(picture: &mut PictureBuffer, planes: PlaneMask) {
    let bps = picture.bytes_per_sample();
    let format = picture.color_format();
    for plane in 0..MAX_PLANES {
        if !planes.has_plane(plane)
            || !picture.plane_mask().has_plane(plane)
            || plane >= format.num_planes()
        {
            continue;
        }
        let (w, h) = picture.plane_dims(plane);
        let (ox, oy) = picture.plane_origin(plane);
        let (total_w, total_h) = picture.plane_total_dims(plane);
        let stride = picture.plane_stride(plane);
        extend_plane(
            picture.plane_data_mut(plane),
            stride,
            bps,
            w,
            h,
            ox,
            oy,
            total_w,
            total_h,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn extend_plane(
    data: &mut [u8],
    stride: usize,
    bps: usize,
    width: usize,
    height: usize,
    origin_x: usize,
    origin_y: usize,
    total_w: usize,
    total_h: usize,
) {
    let row_bytes = stride * bps;

    // Left and right margins of every active row.
    for y in origin_y..origin_y + height {
        let row = &mut data[y * row_bytes..(y + 1) * row_bytes];
        let first = row[origin_x * bps..(origin_x + 1) * bps].to_vec();
        for x in 0..origin_x {
            row[x * bps..(x + 1) * bps].copy_from_slice(&first);
        }
        let last_x = origin_x + width - 1;
        let last = row[last_x * bps..(last_x + 1) * bps].to_vec();
        for x in origin_x + width..total_w {
            row[x * bps..(x + 1) * bps].copy_from_slice(&last);
        }
    }

    // Top margin: copy the first fully-extended row upward.
    let (top, rest) = data.split_at_mut(origin_y * row_bytes);
    let first_row = rest[..row_bytes].to_vec();
    for row in top.chunks_exact_mut(row_bytes) {
        row.copy_from_slice(&first_row);
    }

    // Bottom margin: copy the last active row downward.
    let last_active = origin_y + height - 1;
    let last_row = data[last_active * row_bytes..(last_active + 1) * row_bytes].to_vec();
    for y in origin_y + height..total_h {
        data[y * row_bytes..(y + 1) * row_bytes].copy_from_slice(&last_row);
    }
}
