//! Pyramid downsampling for motion-search references.
//!
//! Each reference luma plane carries quarter (1/2 per axis) and sixteenth
//! (1/4 per axis) copies. Two variants exist: point decimation, which takes
//! every other sample, and half-band filtered decimation built on the same
//! 2:1 kernels the resampler uses.

use crate::error::Result;
use crate::resample::decimate;
use rescale_core::{try_alloc_vec, PlaneView, PlaneViewMut, Sample};

/// Point 2:1 decimation per axis: `dst(x, y) = src(2x, 2y)`.
pub fn point_decimate_plane<S: Sample>(src: &PlaneView<S>, dst: &mut PlaneViewMut<S>) {
    debug_assert!(dst.width() * 2 <= src.width() + 1);
    debug_assert!(dst.height() * 2 <= src.height() + 1);
    for y in 0..dst.height() {
        let src_row = src.row(2 * y);
        let dst_row = dst.row_mut(y);
        for (x, out) in dst_row.iter_mut().enumerate() {
            *out = src_row[2 * x];
        }
    }
}

/// Half-band filtered 2:1 decimation per axis, rows first then columns.
pub fn filtered_decimate_plane<S: Sample>(
    src: &PlaneView<S>,
    dst: &mut PlaneViewMut<S>,
    bit_depth: u32,
) -> Result<()> {
    let (w, h) = (src.width(), src.height());
    let (w2, h2) = (dst.width(), dst.height());
    debug_assert_eq!(w2, (w + 1) / 2);
    debug_assert_eq!(h2, (h + 1) / 2);

    let mut intermediate = try_alloc_vec::<S>(w2 * h, "pyramid intermediate")?;
    for y in 0..h {
        decimate(src.row(y), &mut intermediate[y * w2..(y + 1) * w2], bit_depth);
    }

    let mut column = try_alloc_vec::<S>(h, "pyramid column")?;
    let mut column_out = try_alloc_vec::<S>(h2, "pyramid column output")?;
    for x in 0..w2 {
        for (y, sample) in column.iter_mut().enumerate() {
            *sample = intermediate[y * w2 + x];
        }
        decimate(&column, &mut column_out, bit_depth);
        for (y, sample) in column_out.iter().enumerate() {
            dst.row_mut(y)[x] = *sample;
        }
    }
    Ok(())
}

/// Build the quarter and sixteenth levels by point decimation.
pub fn decimation_quarter_sixteenth<S: Sample>(
    full: &PlaneView<S>,
    quarter: &mut PlaneViewMut<S>,
    sixteenth: &mut PlaneViewMut<S>,
) {
    point_decimate_plane(full, quarter);
    point_decimate_plane(&quarter.as_view(), sixteenth);
}

/// Build the quarter and sixteenth levels with half-band filtering.
pub fn filtering_quarter_sixteenth<S: Sample>(
    full: &PlaneView<S>,
    quarter: &mut PlaneViewMut<S>,
    sixteenth: &mut PlaneViewMut<S>,
    bit_depth: u32,
) -> Result<()> {
    filtered_decimate_plane(full, quarter, bit_depth)?;
    filtered_decimate_plane(&quarter.as_view(), sixteenth, bit_depth)
}
