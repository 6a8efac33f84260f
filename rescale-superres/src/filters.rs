//! Fixed filter banks for decimation and fractional-ratio interpolation.
//!
//! Two symmetric half-band half-filters cover exact 2:1 decimation; five
//! polyphase interpolation kernels cover arbitrary ratios, with progressively
//! lower cutoffs the harder the image shrinks. The polyphase banks are
//! windowed-sinc prototypes decomposed into 64 phases of 8 taps, quantized so
//! every phase sums to exactly one in `FILTER_BITS` fixed point.

use std::f64::consts::PI;
use std::sync::OnceLock;

/// Fixed-point precision of all filter coefficients.
pub const FILTER_BITS: u32 = 7;

/// Taps per interpolation phase.
pub const SUBPEL_TAPS: usize = 8;

/// log2 of the number of interpolation phases.
pub const RS_SUBPEL_BITS: u32 = 6;

/// Number of interpolation phases.
pub const RS_SUBPEL_PHASES: usize = 1 << RS_SUBPEL_BITS;

/// log2 of the fixed-point scale used for the resampling phase accumulator.
pub const RS_SCALE_SUBPEL_BITS: u32 = 14;

/// Extra fractional bits below the phase index.
pub const RS_SCALE_EXTRA_BITS: u32 = RS_SCALE_SUBPEL_BITS - RS_SUBPEL_BITS;

/// Rounding offset applied to the phase accumulator.
pub const RS_SCALE_EXTRA_OFF: i32 = 1 << (RS_SCALE_EXTRA_BITS - 1);

/// Mask extracting the phase index from the accumulator.
pub const RS_SUBPEL_MASK: i32 = (1 << RS_SUBPEL_BITS) - 1;

/// Half-filter for 2:1 decimation of even-length inputs (center implicit).
pub const DOWN2_SYMEVEN_HALF: [i16; 4] = [56, 12, -3, -1];

/// Half-filter for 2:1 decimation of odd-length inputs (tap 0 is the DC
/// coefficient at the center sample).
pub const DOWN2_SYMODD_HALF: [i16; 4] = [64, 35, 0, -3];

/// A bank of subpixel-phase interpolation filters.
pub type InterpKernel = [[i16; SUBPEL_TAPS]; RS_SUBPEL_PHASES];

struct InterpBanks {
    f1000: InterpKernel,
    f875: InterpKernel,
    f750: InterpKernel,
    f625: InterpKernel,
    f500: InterpKernel,
}

fn banks() -> &'static InterpBanks {
    static BANKS: OnceLock<InterpBanks> = OnceLock::new();
    BANKS.get_or_init(|| InterpBanks {
        f1000: design_interp_kernel(1.0),
        f875: design_interp_kernel(0.875),
        f750: design_interp_kernel(0.75),
        f625: design_interp_kernel(0.625),
        f500: design_interp_kernel(0.5),
    })
}

/// Build one polyphase bank: a Blackman-windowed sinc at the given cutoff
/// (fraction of Nyquist), sampled at each of the 64 subpixel phases.
fn design_interp_kernel(cutoff: f64) -> InterpKernel {
    let mut kernel = [[0i16; SUBPEL_TAPS]; RS_SUBPEL_PHASES];
    let half = SUBPEL_TAPS as f64 / 2.0;
    for (phase, taps) in kernel.iter_mut().enumerate() {
        let frac = phase as f64 / RS_SUBPEL_PHASES as f64;
        let mut coeffs = [0f64; SUBPEL_TAPS];
        let mut sum = 0f64;
        for (k, c) in coeffs.iter_mut().enumerate() {
            // Signed distance from the resampling position to tap k.
            let d = k as f64 - (half - 1.0) - frac;
            let sinc = if d.abs() < 1e-12 {
                cutoff
            } else {
                (PI * cutoff * d).sin() / (PI * d)
            };
            let t = d / half;
            let window = if t.abs() >= 1.0 {
                0.0
            } else {
                0.42 + 0.5 * (PI * t).cos() + 0.08 * (2.0 * PI * t).cos()
            };
            *c = sinc * window;
            sum += *c;
        }

        // Quantize with exact DC: each phase must sum to 1 << FILTER_BITS so
        // flat inputs pass through unchanged.
        let scale = (1i32 << FILTER_BITS) as f64 / sum;
        let mut quantized = [0i16; SUBPEL_TAPS];
        let mut qsum = 0i32;
        let mut center = 0usize;
        for k in 0..SUBPEL_TAPS {
            let q = (coeffs[k] * scale).round() as i32;
            quantized[k] = q as i16;
            qsum += q;
            if coeffs[k] > coeffs[center] {
                center = k;
            }
        }
        quantized[center] += ((1i32 << FILTER_BITS) - qsum) as i16;
        *taps = quantized;
    }
    kernel
}

/// Select the interpolation bank for a given length ratio.
///
/// Breakpoints compare `16 * out_length` against multiples of `in_length`;
/// sharper-cutoff banks kick in as the image shrinks harder.
pub fn choose_interp_filter(in_length: usize, out_length: usize) -> &'static InterpKernel {
    let banks = banks();
    let out16 = out_length * 16;
    if out16 >= in_length * 16 {
        &banks.f1000
    } else if out16 >= in_length * 13 {
        &banks.f875
    } else if out16 >= in_length * 11 {
        &banks.f750
    } else if out16 >= in_length * 9 {
        &banks.f625
    } else {
        &banks.f500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down2_filters_are_unit_dc() {
        let even: i32 = DOWN2_SYMEVEN_HALF.iter().map(|&c| c as i32).sum();
        assert_eq!(2 * even, 1 << FILTER_BITS);
        let odd: i32 = DOWN2_SYMODD_HALF[1..].iter().map(|&c| c as i32).sum();
        assert_eq!(DOWN2_SYMODD_HALF[0] as i32 + 2 * odd, 1 << FILTER_BITS);
    }

    #[test]
    fn test_interp_phases_sum_to_unit() {
        for cutoff in [1.0, 0.875, 0.75, 0.625, 0.5] {
            let kernel = design_interp_kernel(cutoff);
            for (phase, taps) in kernel.iter().enumerate() {
                let sum: i32 = taps.iter().map(|&c| c as i32).sum();
                assert_eq!(
                    sum,
                    1 << FILTER_BITS,
                    "cutoff {} phase {} sums to {}",
                    cutoff,
                    phase,
                    sum
                );
            }
        }
    }

    #[test]
    fn test_phase_zero_of_full_cutoff_is_identity() {
        let kernel = design_interp_kernel(1.0);
        let expected = {
            let mut taps = [0i16; SUBPEL_TAPS];
            taps[SUBPEL_TAPS / 2 - 1] = 1 << FILTER_BITS;
            taps
        };
        assert_eq!(kernel[0], expected);
    }

    #[test]
    fn test_kernel_selection_breakpoints() {
        // Upscaling and identity use the widest passband.
        assert!(std::ptr::eq(choose_interp_filter(100, 100), &banks().f1000));
        assert!(std::ptr::eq(choose_interp_filter(100, 200), &banks().f1000));
        // 16*out/in in [13, 16) -> 875.
        assert!(std::ptr::eq(choose_interp_filter(16, 13), &banks().f875));
        assert!(std::ptr::eq(choose_interp_filter(16, 15), &banks().f875));
        // [11, 13) -> 750.
        assert!(std::ptr::eq(choose_interp_filter(16, 11), &banks().f750));
        // [9, 11) -> 625; the 8/12 superres ratio lands here (16 * 8/12 = 10.67).
        assert!(std::ptr::eq(choose_interp_filter(16, 10), &banks().f625));
        assert!(std::ptr::eq(choose_interp_filter(12, 8), &banks().f625));
        assert!(std::ptr::eq(choose_interp_filter(16, 9), &banks().f625));
        // Below 9/16: the sharpest rolloff.
        assert!(std::ptr::eq(choose_interp_filter(16, 8), &banks().f500));
        assert!(std::ptr::eq(choose_interp_filter(2, 1), &banks().f500));
    }
}
