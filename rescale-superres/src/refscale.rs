//! Reference-pyramid scaling caches.
//!
//! A frame encoded at a scaled resolution needs every reference picture at
//! that same resolution. Scaled copies are expensive, so each reference
//! object carries a cache with one slot per denominator; a slot is built at
//! most once and then shared immutably. Source (pre-analysis) references
//! cache a full/quarter/sixteenth search pyramid, reconstruction references
//! cache the scaled picture itself, split by sample precision.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rescale_core::{
    extend_borders, ColorFormat, PictureBuffer, PictureConfig, PlaneMask,
};
use tracing::{debug, trace};

use crate::error::{Result, SuperresError};
use crate::frame::resize_and_extend_frame;
use crate::pyramid::{decimation_quarter_sixteenth, filtering_quarter_sixteenth};
use crate::superres::{
    calc_superres_params, scale_frame_geometry, FrameGeometry, FrameInfo, GeometryResync,
    SuperresConfig, SuperresParams, SuperresRng, SCALE_DENOM_MAX, SCALE_NUMERATOR,
};

/// One cache slot per supported denominator.
pub const SCALE_DENOM_SLOTS: usize = (SCALE_DENOM_MAX - SCALE_NUMERATOR + 1) as usize;

fn denom_index(denom: u8) -> Result<usize> {
    if !(SCALE_NUMERATOR..=SCALE_DENOM_MAX).contains(&denom) {
        return Err(SuperresError::InvalidDenominator { denom });
    }
    Ok(usize::from(denom - SCALE_NUMERATOR))
}

/// How the quarter/sixteenth search levels are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownSamplingMethod {
    /// Point 2:1 decimation per axis.
    #[default]
    Decimated,
    /// Decimated levels plus half-band filtered copies.
    Filtered,
}

/// A scaled source reference with its motion-search pyramid.
///
/// Luma only; immutable once built.
#[derive(Debug)]
pub struct ScaledSourcePyramid {
    /// Padded scaled full-resolution luma.
    pub full: PictureBuffer,
    /// Half resolution per axis, point decimated.
    pub quarter: PictureBuffer,
    /// Quarter resolution per axis, point decimated.
    pub sixteenth: PictureBuffer,
    /// Half resolution per axis, half-band filtered.
    pub quarter_filtered: Option<PictureBuffer>,
    /// Quarter resolution per axis, half-band filtered.
    pub sixteenth_filtered: Option<PictureBuffer>,
}

impl ScaledSourcePyramid {
    /// Resize `source` luma to `width x height` and derive the search
    /// pyramid. Motion estimation runs on 8-bit samples, so the source must
    /// be an 8-bit picture.
    pub fn build(
        source: &PictureBuffer,
        width: u32,
        height: u32,
        method: DownSamplingMethod,
    ) -> Result<Self> {
        if source.bit_depth() != 8 {
            return Err(SuperresError::mismatch(format!(
                "source reference pyramid requires an 8-bit picture, got {}-bit",
                source.bit_depth()
            )));
        }
        let pad_x = source.origin_x();
        let pad_y = source.origin_y();
        let format = source.color_format();

        let mut full = PictureBuffer::allocate(
            &PictureConfig::new(width, height, 8)
                .with_color_format(ColorFormat::Yuv400)
                .with_plane_mask(PlaneMask::LUMA)
                .with_padding(pad_x, pad_y),
        )?;
        resize_and_extend_frame(
            source,
            &mut full,
            8,
            0,
            format.subsampling_x(),
            format.subsampling_y(),
        )?;
        extend_borders(&mut full, PlaneMask::LUMA);

        // Each level holds ceil(previous / 2) samples per axis, matching the
        // decimation output length for odd inputs.
        let mut quarter =
            allocate_level(width.div_ceil(2), height.div_ceil(2), pad_x >> 1, pad_y >> 1)?;
        let mut sixteenth =
            allocate_level(width.div_ceil(4), height.div_ceil(4), pad_x >> 2, pad_y >> 2)?;
        decimation_quarter_sixteenth(
            &full.plane_view(0)?,
            &mut quarter.plane_view_mut(0)?,
            &mut sixteenth.plane_view_mut(0)?,
        );
        extend_borders(&mut quarter, PlaneMask::LUMA);
        extend_borders(&mut sixteenth, PlaneMask::LUMA);

        let (quarter_filtered, sixteenth_filtered) = match method {
            DownSamplingMethod::Decimated => (None, None),
            DownSamplingMethod::Filtered => {
                let mut qf =
                    allocate_level(width.div_ceil(2), height.div_ceil(2), pad_x >> 1, pad_y >> 1)?;
                let mut sf =
                    allocate_level(width.div_ceil(4), height.div_ceil(4), pad_x >> 2, pad_y >> 2)?;
                filtering_quarter_sixteenth(
                    &full.plane_view(0)?,
                    &mut qf.plane_view_mut(0)?,
                    &mut sf.plane_view_mut(0)?,
                    8,
                )?;
                extend_borders(&mut qf, PlaneMask::LUMA);
                extend_borders(&mut sf, PlaneMask::LUMA);
                (Some(qf), Some(sf))
            }
        };

        Ok(Self {
            full,
            quarter,
            sixteenth,
            quarter_filtered,
            sixteenth_filtered,
        })
    }
}

fn allocate_level(width: u32, height: u32, pad_x: u32, pad_y: u32) -> Result<PictureBuffer> {
    Ok(PictureBuffer::allocate(
        &PictureConfig::new(width, height, 8)
            .with_color_format(ColorFormat::Yuv400)
            .with_plane_mask(PlaneMask::LUMA)
            .with_padding(pad_x, pad_y),
    )?)
}

/// Per-reference cache of scaled source pyramids, one slot per denominator.
///
/// The slot lock is held across the build, so concurrent lookups of the same
/// denominator wait for the first builder and then share its entry; a
/// partially built pyramid is never observable.
#[derive(Debug)]
pub struct SourceScaleCache {
    slots: [Mutex<Option<Arc<ScaledSourcePyramid>>>; SCALE_DENOM_SLOTS],
    builds: AtomicUsize,
}

impl Default for SourceScaleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceScaleCache {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Mutex::new(None)),
            builds: AtomicUsize::new(0),
        }
    }

    /// Look up the entry for `denom`, building it with `build` on first use.
    pub fn get_or_build<F>(&self, denom: u8, build: F) -> Result<Arc<ScaledSourcePyramid>>
    where
        F: FnOnce() -> Result<ScaledSourcePyramid>,
    {
        let mut slot = self.slots[denom_index(denom)?].lock();
        if let Some(entry) = slot.as_ref() {
            trace!(denom, "scaled source pyramid reused");
            return Ok(Arc::clone(entry));
        }
        let entry = Arc::new(build()?);
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!(denom, "scaled source pyramid built");
        *slot = Some(Arc::clone(&entry));
        Ok(entry)
    }

    /// Number of pyramid builds performed so far.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
struct RecSlot {
    eight_bit: Option<Arc<PictureBuffer>>,
    sixteen_bit: Option<Arc<PictureBuffer>>,
}

/// Per-reference cache of scaled reconstruction pictures.
///
/// Entries are keyed by denominator and split by sample precision; the 8-bit
/// and 16-bit variants of the same denominator are built and cached
/// independently.
#[derive(Debug)]
pub struct RecScaleCache {
    slots: [Mutex<RecSlot>; SCALE_DENOM_SLOTS],
    builds: AtomicUsize,
}

impl Default for RecScaleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RecScaleCache {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Mutex::new(RecSlot::default())),
            builds: AtomicUsize::new(0),
        }
    }

    /// Look up the `(denom, precision)` entry, building it on first use.
    pub fn get_or_build<F>(
        &self,
        denom: u8,
        sixteen_bit: bool,
        build: F,
    ) -> Result<Arc<PictureBuffer>>
    where
        F: FnOnce() -> Result<PictureBuffer>,
    {
        let mut slot = self.slots[denom_index(denom)?].lock();
        let cell = if sixteen_bit {
            &mut slot.sixteen_bit
        } else {
            &mut slot.eight_bit
        };
        if let Some(entry) = cell.as_ref() {
            trace!(denom, sixteen_bit, "scaled reconstruction reused");
            return Ok(Arc::clone(entry));
        }
        let entry = Arc::new(build()?);
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!(denom, sixteen_bit, "scaled reconstruction built");
        *cell = Some(Arc::clone(&entry));
        Ok(entry)
    }

    /// Number of scaled reconstruction builds performed so far.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

/// A pre-analysis reference picture and its scale cache.
#[derive(Debug)]
pub struct SourceReference {
    picture: PictureBuffer,
    cache: SourceScaleCache,
}

impl SourceReference {
    pub fn new(picture: PictureBuffer) -> Self {
        Self {
            picture,
            cache: SourceScaleCache::new(),
        }
    }

    pub fn picture(&self) -> &PictureBuffer {
        &self.picture
    }

    pub fn cache(&self) -> &SourceScaleCache {
        &self.cache
    }
}

/// A reconstructed reference picture and its scale cache.
///
/// High-bit-depth encodes keep an 8-bit companion for motion estimation, so
/// either or both precisions may be present.
#[derive(Debug)]
pub struct ReconstructedReference {
    eight_bit: Option<PictureBuffer>,
    sixteen_bit: Option<PictureBuffer>,
    cache: RecScaleCache,
}

impl ReconstructedReference {
    pub fn new(eight_bit: Option<PictureBuffer>, sixteen_bit: Option<PictureBuffer>) -> Self {
        Self {
            eight_bit,
            sixteen_bit,
            cache: RecScaleCache::new(),
        }
    }

    /// The stored picture at the requested precision.
    pub fn picture(&self, sixteen_bit: bool) -> Option<&PictureBuffer> {
        if sixteen_bit {
            self.sixteen_bit.as_ref()
        } else {
            self.eight_bit.as_ref()
        }
    }

    pub fn cache(&self) -> &RecScaleCache {
        &self.cache
    }
}

/// Scale every source reference whose width differs from the current frame's
/// processing width. Returns one entry per reference: `None` when the
/// reference already matches, otherwise the (possibly cached) pyramid.
pub fn scale_source_references(
    references: &[Arc<SourceReference>],
    geometry: &FrameGeometry,
    method: DownSamplingMethod,
) -> Result<Vec<Option<Arc<ScaledSourcePyramid>>>> {
    let mut scaled = Vec::with_capacity(references.len());
    for reference in references {
        if reference.picture().width() == u32::from(geometry.frame_width) {
            scaled.push(None);
            continue;
        }
        let pyramid = reference.cache().get_or_build(geometry.superres_denom, || {
            ScaledSourcePyramid::build(
                reference.picture(),
                u32::from(geometry.aligned_width),
                u32::from(geometry.aligned_height),
                method,
            )
        })?;
        scaled.push(Some(pyramid));
    }
    Ok(scaled)
}

/// Populate the current frame's own reference cache from its already-scaled
/// picture: the full level is a copy, only the pyramid is derived.
pub fn scale_input_reference(
    reference: &SourceReference,
    scaled_picture: &PictureBuffer,
    denom: u8,
    method: DownSamplingMethod,
) -> Result<Arc<ScaledSourcePyramid>> {
    reference.cache().get_or_build(denom, || {
        ScaledSourcePyramid::build(
            scaled_picture,
            scaled_picture.width(),
            scaled_picture.height(),
            method,
        )
    })
}

/// Scale reconstruction references at the requested precision. All planes
/// are resized and the result is border extended for motion compensation.
pub fn scale_rec_references(
    references: &[Arc<ReconstructedReference>],
    geometry: &FrameGeometry,
    sixteen_bit: bool,
) -> Result<Vec<Option<Arc<PictureBuffer>>>> {
    let mut scaled = Vec::with_capacity(references.len());
    for reference in references {
        let source = reference.picture(sixteen_bit).ok_or_else(|| {
            SuperresError::mismatch(format!(
                "reconstruction reference lacks the {}-bit picture",
                if sixteen_bit { 16 } else { 8 }
            ))
        })?;
        if source.width() == u32::from(geometry.frame_width) {
            scaled.push(None);
            continue;
        }
        let picture = reference
            .cache()
            .get_or_build(geometry.superres_denom, sixteen_bit, || {
                scale_picture(
                    source,
                    u32::from(geometry.aligned_width),
                    u32::from(geometry.aligned_height),
                )
            })?;
        scaled.push(Some(picture));
    }
    Ok(scaled)
}

fn scale_picture(source: &PictureBuffer, width: u32, height: u32) -> Result<PictureBuffer> {
    let format = source.color_format();
    let mut scaled = PictureBuffer::allocate(
        &PictureConfig::new(width, height, source.bit_depth())
            .with_color_format(format)
            .with_plane_mask(source.plane_mask())
            .with_padding(source.origin_x(), source.origin_y()),
    )?;
    resize_and_extend_frame(
        source,
        &mut scaled,
        source.bit_depth(),
        format.num_planes(),
        format.subsampling_x(),
        format.subsampling_y(),
    )?;
    let mask = scaled.plane_mask();
    extend_borders(&mut scaled, mask);
    Ok(scaled)
}

/// Derive this frame's scaling parameters and, when scaling is active,
/// replace its enhanced picture with the downscaled copy and bring the frame
/// geometry and its own input reference up to date.
#[allow(clippy::too_many_arguments)]
pub fn init_resize_picture(
    enhanced: &mut PictureBuffer,
    geometry: &mut FrameGeometry,
    config: &SuperresConfig,
    frame: &FrameInfo,
    rng: &mut SuperresRng,
    sb_size: u16,
    resync: &mut dyn GeometryResync,
    input_reference: Option<&SourceReference>,
    method: DownSamplingMethod,
) -> Result<SuperresParams> {
    config.validate()?;

    let source_width = enhanced.width() as u16;
    let source_height = enhanced.height() as u16;
    let mut params = SuperresParams::identity(source_width, source_height);
    calc_superres_params(&mut params, config, frame, rng);

    if params.is_scaled() {
        debug!(
            denom = params.denom,
            from = source_width,
            to = params.encoding_width,
            "resizing frame"
        );
        let downscaled = scale_picture(
            enhanced,
            u32::from(params.encoding_width),
            u32::from(params.encoding_height),
        )?;
        *enhanced = downscaled;
    }

    scale_frame_geometry(
        geometry,
        &params,
        sb_size,
        source_width,
        source_height,
        resync,
    );

    if params.is_scaled() {
        if let Some(reference) = input_reference {
            if enhanced.bit_depth() == 8 {
                scale_input_reference(reference, enhanced, params.denom, method)?;
            } else {
                // Search pyramids are 8-bit; the high-bit-depth frame's
                // reference is built lazily from its 8-bit companion.
                debug!(
                    denom = params.denom,
                    bit_depth = enhanced.bit_depth(),
                    "input reference pyramid not pre-populated"
                );
            }
        }
    }

    Ok(params)
}
