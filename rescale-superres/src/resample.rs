//! 1-D multirate resampling engine.
//!
//! Three layers, bottom up: exact 2:1 half-band decimation
//! ([`decimate`]), fixed-point polyphase interpolation for arbitrary ratios
//! ([`interpolate`]), and the multi-step orchestrator ([`resize_multistep`])
//! that decomposes a ratio into a cascade of halvings followed by at most one
//! interpolation pass. Everything is generic over [`Sample`], so the 8-bit
//! and high-bit-depth paths share one implementation and differ only in the
//! final clip.
//!
//! Boundary handling replicates edge samples: filter taps that would read
//! outside the input clamp their index instead of zero-padding.

use crate::filters::{
    choose_interp_filter, InterpKernel, DOWN2_SYMEVEN_HALF, DOWN2_SYMODD_HALF, FILTER_BITS,
    RS_SCALE_EXTRA_BITS, RS_SCALE_EXTRA_OFF, RS_SCALE_SUBPEL_BITS, RS_SUBPEL_MASK, SUBPEL_TAPS,
};
use rescale_core::Sample;

/// Length after `steps` successive halvings (each `(len + 1) / 2`).
pub fn get_down2_length(length: usize, steps: usize) -> usize {
    let mut length = length;
    for _ in 0..steps {
        length = (length + 1) >> 1;
    }
    length
}

/// Number of pure halving steps that keep the running length at or above
/// `out_length`.
pub fn get_down2_steps(in_length: usize, out_length: usize) -> usize {
    let mut steps = 0;
    let mut in_length = in_length;
    loop {
        let proj = get_down2_length(in_length, 1);
        if proj < out_length {
            break;
        }
        steps += 1;
        in_length = proj;
        if in_length == 1 {
            // Halving a length-1 sequence is a no-op; stop before looping on it.
            break;
        }
    }
    steps
}

#[inline]
fn round_shift(value: i32, bits: u32) -> i32 {
    (value + (1 << (bits - 1))) >> bits
}

/// 2:1 half-band decimation. Output length must be `ceil(input / 2)`;
/// the filter variant is chosen by input parity.
pub fn decimate<S: Sample>(input: &[S], output: &mut [S], bit_depth: u32) {
    debug_assert!(!input.is_empty());
    debug_assert_eq!(output.len(), input.len().div_ceil(2));
    if input.len() & 1 == 1 {
        down2_symodd(input, output, bit_depth);
    } else {
        down2_symeven(input, output, bit_depth);
    }
}

fn down2_symeven<S: Sample>(input: &[S], output: &mut [S], bit_depth: u32) {
    // Actual filter length is 2 * half.
    let filter = &DOWN2_SYMEVEN_HALF;
    let half = filter.len() as isize;
    let length = input.len() as isize;
    let bias = 1i32 << (FILTER_BITS - 1);

    let mut l1 = half;
    let mut l2 = length - half;
    l1 += l1 & 1;
    l2 += l2 & 1;

    let mut o = 0usize;
    let mut emit = |sum: i32, o: &mut usize| {
        output[*o] = S::clip(sum >> FILTER_BITS, bit_depth);
        *o += 1;
    };

    if l1 > l2 {
        // Short input: clamp the support on both sides everywhere.
        let mut i = 0isize;
        while i < length {
            let mut sum = bias;
            for (j, &c) in filter.iter().enumerate() {
                let j = j as isize;
                sum += (input[(i - j).max(0) as usize].widen()
                    + input[(i + 1 + j).min(length - 1) as usize].widen())
                    * c as i32;
            }
            emit(sum, &mut o);
            i += 2;
        }
    } else {
        // Initial part.
        let mut i = 0isize;
        while i < l1 {
            let mut sum = bias;
            for (j, &c) in filter.iter().enumerate() {
                let j = j as isize;
                sum += (input[(i - j).max(0) as usize].widen()
                    + input[(i + 1 + j) as usize].widen())
                    * c as i32;
            }
            emit(sum, &mut o);
            i += 2;
        }
        // Middle part.
        while i < l2 {
            let mut sum = bias;
            for (j, &c) in filter.iter().enumerate() {
                let j = j as isize;
                sum += (input[(i - j) as usize].widen() + input[(i + 1 + j) as usize].widen())
                    * c as i32;
            }
            emit(sum, &mut o);
            i += 2;
        }
        // End part.
        while i < length {
            let mut sum = bias;
            for (j, &c) in filter.iter().enumerate() {
                let j = j as isize;
                sum += (input[(i - j) as usize].widen()
                    + input[(i + 1 + j).min(length - 1) as usize].widen())
                    * c as i32;
            }
            emit(sum, &mut o);
            i += 2;
        }
    }
}

fn down2_symodd<S: Sample>(input: &[S], output: &mut [S], bit_depth: u32) {
    // Actual filter length is 2 * half - 1; tap 0 sits on the center sample.
    let filter = &DOWN2_SYMODD_HALF;
    let half = filter.len() as isize;
    let length = input.len() as isize;
    let bias = 1i32 << (FILTER_BITS - 1);

    let mut l1 = half - 1;
    let mut l2 = length - half + 1;
    l1 += l1 & 1;
    l2 += l2 & 1;

    let mut o = 0usize;
    let mut emit = |sum: i32, o: &mut usize| {
        output[*o] = S::clip(sum >> FILTER_BITS, bit_depth);
        *o += 1;
    };

    if l1 > l2 {
        // Short input.
        let mut i = 0isize;
        while i < length {
            let mut sum = bias + input[i as usize].widen() * filter[0] as i32;
            for (j, &c) in filter.iter().enumerate().skip(1) {
                let j = j as isize;
                sum += (input[(i - j).max(0) as usize].widen()
                    + input[(i + j).min(length - 1) as usize].widen())
                    * c as i32;
            }
            emit(sum, &mut o);
            i += 2;
        }
    } else {
        // Initial part.
        let mut i = 0isize;
        while i < l1 {
            let mut sum = bias + input[i as usize].widen() * filter[0] as i32;
            for (j, &c) in filter.iter().enumerate().skip(1) {
                let j = j as isize;
                sum += (input[(i - j).max(0) as usize].widen() + input[(i + j) as usize].widen())
                    * c as i32;
            }
            emit(sum, &mut o);
            i += 2;
        }
        // Middle part.
        while i < l2 {
            let mut sum = bias + input[i as usize].widen() * filter[0] as i32;
            for (j, &c) in filter.iter().enumerate().skip(1) {
                let j = j as isize;
                sum += (input[(i - j) as usize].widen() + input[(i + j) as usize].widen())
                    * c as i32;
            }
            emit(sum, &mut o);
            i += 2;
        }
        // End part.
        while i < length {
            let mut sum = bias + input[i as usize].widen() * filter[0] as i32;
            for (j, &c) in filter.iter().enumerate().skip(1) {
                let j = j as isize;
                sum += (input[(i - j) as usize].widen()
                    + input[(i + j).min(length - 1) as usize].widen())
                    * c as i32;
            }
            emit(sum, &mut o);
            i += 2;
        }
    }
}

/// Polyphase interpolation of `input` into `output` at the ratio implied by
/// the two lengths, with the filter bank chosen by [`choose_interp_filter`].
pub fn interpolate<S: Sample>(input: &[S], output: &mut [S], bit_depth: u32) {
    let filters = choose_interp_filter(input.len(), output.len());
    interpolate_core(input, output, filters, bit_depth);
}

fn interpolate_core<S: Sample>(
    input: &[S],
    output: &mut [S],
    filters: &InterpKernel,
    bit_depth: u32,
) {
    let in_length = input.len() as i32;
    let out_length = output.len() as i32;
    debug_assert!(in_length > 0 && out_length > 0);
    let taps = SUBPEL_TAPS as i32;

    // Fixed-point step and centering offset. The offset sign depends on
    // whether the sequence shrinks or grows.
    let delta = ((((in_length as u32) << RS_SCALE_SUBPEL_BITS) + out_length as u32 / 2)
        / out_length as u32) as i32;
    let offset = if in_length > out_length {
        (((in_length - out_length) << (RS_SCALE_SUBPEL_BITS - 1)) + out_length / 2) / out_length
    } else {
        -(((out_length - in_length) << (RS_SCALE_SUBPEL_BITS - 1)) + out_length / 2) / out_length
    };

    // First and last output positions whose full support stays in range.
    let mut x = 0i32;
    let mut y = offset + RS_SCALE_EXTRA_OFF;
    while (y >> RS_SCALE_SUBPEL_BITS) < taps / 2 - 1 {
        x += 1;
        y += delta;
    }
    let x1 = x;
    let mut x = out_length - 1;
    let mut y_end = delta * x + offset + RS_SCALE_EXTRA_OFF;
    while (y_end >> RS_SCALE_SUBPEL_BITS) + taps / 2 >= in_length {
        x -= 1;
        y_end -= delta;
    }
    let x2 = x;

    let mut o = 0usize;
    let mut emit = |sum: i32, o: &mut usize| {
        output[*o] = S::clip(round_shift(sum, FILTER_BITS), bit_depth);
        *o += 1;
    };

    if x1 > x2 {
        // Short input: clamp the support on both sides for every sample.
        let mut y = offset + RS_SCALE_EXTRA_OFF;
        for _ in 0..out_length {
            let int_pel = y >> RS_SCALE_SUBPEL_BITS;
            let sub_pel = ((y >> RS_SCALE_EXTRA_BITS) & RS_SUBPEL_MASK) as usize;
            let filter = &filters[sub_pel];
            let mut sum = 0i32;
            for (k, &c) in filter.iter().enumerate() {
                let pk = int_pel - taps / 2 + 1 + k as i32;
                sum += c as i32 * input[pk.clamp(0, in_length - 1) as usize].widen();
            }
            emit(sum, &mut o);
            y += delta;
        }
    } else {
        // Initial part.
        let mut y = offset + RS_SCALE_EXTRA_OFF;
        for _ in 0..x1 {
            let int_pel = y >> RS_SCALE_SUBPEL_BITS;
            let sub_pel = ((y >> RS_SCALE_EXTRA_BITS) & RS_SUBPEL_MASK) as usize;
            let filter = &filters[sub_pel];
            let mut sum = 0i32;
            for (k, &c) in filter.iter().enumerate() {
                let pk = int_pel - taps / 2 + 1 + k as i32;
                sum += c as i32 * input[pk.max(0) as usize].widen();
            }
            emit(sum, &mut o);
            y += delta;
        }
        // Middle part.
        for _ in x1..=x2 {
            let int_pel = y >> RS_SCALE_SUBPEL_BITS;
            let sub_pel = ((y >> RS_SCALE_EXTRA_BITS) & RS_SUBPEL_MASK) as usize;
            let filter = &filters[sub_pel];
            let mut sum = 0i32;
            for (k, &c) in filter.iter().enumerate() {
                let pk = int_pel - taps / 2 + 1 + k as i32;
                sum += c as i32 * input[pk as usize].widen();
            }
            emit(sum, &mut o);
            y += delta;
        }
        // End part.
        for _ in (x2 + 1)..out_length {
            let int_pel = y >> RS_SCALE_SUBPEL_BITS;
            let sub_pel = ((y >> RS_SCALE_EXTRA_BITS) & RS_SUBPEL_MASK) as usize;
            let filter = &filters[sub_pel];
            let mut sum = 0i32;
            for (k, &c) in filter.iter().enumerate() {
                let pk = int_pel - taps / 2 + 1 + k as i32;
                sum += c as i32 * input[pk.min(in_length - 1) as usize].widen();
            }
            emit(sum, &mut o);
            y += delta;
        }
    }
}

/// Resize a 1-D sequence to an arbitrary length.
///
/// Identity when the lengths already match; otherwise a cascade of
/// [`decimate`] steps (alternating between the two halves of `tmp`) finished
/// by at most one [`interpolate`] pass. `tmp` must hold at least
/// `input.len()` samples.
pub fn resize_multistep<S: Sample>(
    input: &[S],
    output: &mut [S],
    tmp: &mut [S],
    bit_depth: u32,
) {
    let length = input.len();
    let olength = output.len();
    if length == olength {
        output.copy_from_slice(input);
        return;
    }
    let steps = get_down2_steps(length, olength);
    if steps == 0 {
        interpolate(input, output, bit_depth);
        return;
    }

    debug_assert!(tmp.len() >= length, "scratch must hold the input length");
    let down1 = get_down2_length(length, 1);
    let (t1, t2) = tmp.split_at_mut(down1);

    #[derive(Clone, Copy, PartialEq)]
    enum Buf {
        Input,
        Tmp1,
        Tmp2,
        Out,
    }

    let mut cur = Buf::Input;
    let mut filtered_len = length;
    for s in 0..steps {
        let proj = get_down2_length(filtered_len, 1);
        let dst = if s + 1 == steps && proj == olength {
            Buf::Out
        } else if s & 1 == 1 {
            Buf::Tmp2
        } else {
            Buf::Tmp1
        };
        match (cur, dst) {
            (Buf::Input, Buf::Tmp1) => {
                decimate(&input[..filtered_len], &mut t1[..proj], bit_depth)
            }
            (Buf::Input, Buf::Out) => {
                decimate(&input[..filtered_len], &mut output[..proj], bit_depth)
            }
            (Buf::Tmp1, Buf::Tmp2) => decimate(&t1[..filtered_len], &mut t2[..proj], bit_depth),
            (Buf::Tmp2, Buf::Tmp1) => decimate(&t2[..filtered_len], &mut t1[..proj], bit_depth),
            (Buf::Tmp1, Buf::Out) => {
                decimate(&t1[..filtered_len], &mut output[..proj], bit_depth)
            }
            (Buf::Tmp2, Buf::Out) => {
                decimate(&t2[..filtered_len], &mut output[..proj], bit_depth)
            }
            _ => unreachable!("cascade buffers alternate"),
        }
        cur = dst;
        filtered_len = proj;
    }

    if filtered_len != olength {
        let src = match cur {
            Buf::Tmp1 => &t1[..filtered_len],
            Buf::Tmp2 => &t2[..filtered_len],
            // The cascade only finishes in the output when lengths line up,
            // and then no interpolation pass remains.
            _ => unreachable!("cascade ended in the output buffer"),
        };
        interpolate(src, output, bit_depth);
    }
}
