//! Super-resolution parameter derivation.
//!
//! Decides, per frame, the scale denominator (in eighths; 8 is identity) and
//! the resulting encoding resolution, then recomputes the frame geometry that
//! a resolution change invalidates (aligned dimensions, superblock grid,
//! mode-info strides).

use crate::error::{Result, SuperresError};
use tracing::debug;

/// Fixed scale numerator; denominators are expressed in eighths.
pub const SCALE_NUMERATOR: u8 = 8;

/// Largest supported scale denominator (half size).
pub const SCALE_DENOM_MAX: u8 = 16;

/// log2 of the mode-info unit size in samples.
pub const MI_SIZE_LOG2: u32 = 2;

/// Super-resolution selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuperresMode {
    /// Never scale.
    #[default]
    Disabled,
    /// Fixed denominators, one for key/intra-only frames and one for inter
    /// frames.
    Fixed,
    /// Pseudo-random denominator per frame (testing aid).
    Random,
    /// Threshold-based selection. Recognized but not implemented; treated as
    /// a no-op.
    QThreshold,
    /// Fully automatic selection. Recognized but not implemented; treated as
    /// a no-op.
    Auto,
}

/// Static super-resolution configuration.
#[derive(Debug, Clone)]
pub struct SuperresConfig {
    /// Selection policy.
    pub mode: SuperresMode,
    /// Denominator for inter frames in `Fixed` mode.
    pub denom: u8,
    /// Denominator for key and intra-only frames in `Fixed` mode.
    pub kf_denom: u8,
}

impl Default for SuperresConfig {
    fn default() -> Self {
        Self {
            mode: SuperresMode::Disabled,
            denom: SCALE_NUMERATOR,
            kf_denom: SCALE_NUMERATOR,
        }
    }
}

impl SuperresConfig {
    /// Set the selection policy.
    pub fn with_mode(mut self, mode: SuperresMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the inter-frame denominator.
    pub fn with_denom(mut self, denom: u8) -> Self {
        self.denom = denom;
        self
    }

    /// Set the key-frame denominator.
    pub fn with_kf_denom(mut self, denom: u8) -> Self {
        self.kf_denom = denom;
        self
    }

    /// Check the configured denominators are in the supported range.
    pub fn validate(&self) -> Result<()> {
        for denom in [self.denom, self.kf_denom] {
            if !(SCALE_NUMERATOR..=SCALE_DENOM_MAX).contains(&denom) {
                return Err(SuperresError::InvalidDenominator { denom });
            }
        }
        Ok(())
    }
}

/// Frame type as far as super-resolution selection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Key,
    IntraOnly,
    Inter,
}

/// Per-frame inputs to the denominator decision.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Frame type.
    pub frame_type: FrameType,
    /// Whether the frame allows unconstrained intra block copy; scaling is
    /// skipped when it does.
    pub allow_intrabc: bool,
    /// Whether the sequence enables loop restoration; scaling requires it.
    pub enable_restoration: bool,
}

/// Derived per-frame scaling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperresParams {
    /// Post-scale working width.
    pub encoding_width: u16,
    /// Working height (width-only scaling leaves this at the source value).
    pub encoding_height: u16,
    /// Chosen denominator in eighths.
    pub denom: u8,
}

impl SuperresParams {
    /// Identity parameters for a source resolution.
    pub fn identity(width: u16, height: u16) -> Self {
        Self {
            encoding_width: width,
            encoding_height: height,
            denom: SCALE_NUMERATOR,
        }
    }

    /// Whether these parameters actually scale.
    pub fn is_scaled(&self) -> bool {
        self.denom != SCALE_NUMERATOR
    }
}

/// Pseudo-random denominator source for [`SuperresMode::Random`].
///
/// One generator per encode session keeps random-mode encodes reproducible;
/// concurrent sessions each own their state instead of sharing a global.
#[derive(Debug, Clone)]
pub struct SuperresRng {
    state: u32,
}

impl Default for SuperresRng {
    fn default() -> Self {
        Self::new(34567)
    }
}

impl SuperresRng {
    /// Seed the generator.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 32768)`.
    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        self.state / 65536 % 32768
    }

    /// Next denominator in `[8, 16]`.
    pub fn next_denom(&mut self) -> u8 {
        (self.next() % 9) as u8 + SCALE_NUMERATOR
    }
}

/// Scale a dimension by `numerator / denom` eighths, rounding to nearest,
/// then align up to a multiple of 8. Identity when `denom == 8`.
pub fn calculate_scaled_dim(dim: u16, denom: u8) -> u16 {
    if denom == SCALE_NUMERATOR {
        return dim;
    }
    let scaled =
        (u32::from(dim) * u32::from(SCALE_NUMERATOR) + u32::from(denom) / 2) / u32::from(denom);
    align_up_8(scaled as u16)
}

fn align_up_8(dim: u16) -> u16 {
    (dim + 7) & !7
}

/// Determine the denominator and encoding resolution for one frame.
///
/// `params` arrives holding the source resolution and leaves holding the
/// encoding resolution; only the width is rescaled. The short-circuit for
/// intra block copy or disabled loop restoration leaves the identity
/// denominator in place whatever the mode. The generator advances only when
/// `Random` mode actually draws.
pub fn calc_superres_params(
    params: &mut SuperresParams,
    config: &SuperresConfig,
    frame: &FrameInfo,
    rng: &mut SuperresRng,
) {
    params.denom = SCALE_NUMERATOR;

    if frame.allow_intrabc || !frame.enable_restoration {
        return;
    }

    match config.mode {
        SuperresMode::Disabled => params.denom = SCALE_NUMERATOR,
        SuperresMode::Fixed => {
            params.denom = match frame.frame_type {
                FrameType::Key | FrameType::IntraOnly => config.kf_denom,
                FrameType::Inter => config.denom,
            };
        }
        SuperresMode::Random => params.denom = rng.next_denom(),
        // Reserved policies: accepted, no decision yet.
        SuperresMode::QThreshold | SuperresMode::Auto => {}
    }

    // Only the encoding width is adjusted.
    params.encoding_width = calculate_scaled_dim(params.encoding_width, params.denom);

    debug!(
        denom = params.denom,
        encoding_width = params.encoding_width,
        "superres parameters derived"
    );
}

/// Frame geometry recomputed whenever the working resolution changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameGeometry {
    /// Working (post-scale) width.
    pub frame_width: u16,
    /// Working height.
    pub frame_height: u16,
    /// Display width (pre-scale source width).
    pub render_width: u16,
    /// Display height.
    pub render_height: u16,
    /// Active scale denominator.
    pub superres_denom: u8,
    /// Width aligned up to a multiple of 8.
    pub aligned_width: u16,
    /// Height aligned up to a multiple of 8.
    pub aligned_height: u16,
    /// Superblock grid width.
    pub sb_cols: u16,
    /// Superblock grid height.
    pub sb_rows: u16,
    /// Total superblocks.
    pub sb_total: u32,
    /// Mode-info row stride.
    pub mi_stride: u32,
    /// Mode-info columns.
    pub mi_cols: u32,
    /// Mode-info rows.
    pub mi_rows: u32,
}

/// Collaborator notified when block-level metadata must be rebuilt for a new
/// resolution.
pub trait GeometryResync {
    /// Rebuild superblock parameters and geometry for the given frame
    /// geometry.
    fn recompute_superblock_geometry(&mut self, geometry: &FrameGeometry);
}

/// No-op resync for callers without block-level state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGeometryResync;

impl GeometryResync for NoGeometryResync {
    fn recompute_superblock_geometry(&mut self, _geometry: &FrameGeometry) {}
}

/// Recompute frame geometry for the chosen parameters.
///
/// The encoding width must already be 8-aligned: a violation means the
/// configuration produced a resolution the rest of the encoder cannot
/// handle, which is fatal rather than recoverable.
pub fn scale_frame_geometry(
    geometry: &mut FrameGeometry,
    params: &SuperresParams,
    sb_size: u16,
    source_width: u16,
    source_height: u16,
    resync: &mut dyn GeometryResync,
) {
    geometry.frame_width = params.encoding_width;
    geometry.frame_height = params.encoding_height;
    geometry.render_width = source_width;
    geometry.render_height = source_height;
    geometry.superres_denom = params.denom;

    let aligned_width = align_up_8(params.encoding_width);
    let aligned_height = align_up_8(params.encoding_height);
    assert!(
        aligned_width == params.encoding_width,
        "scaled width must be a multiple of 8"
    );

    geometry.aligned_width = aligned_width;
    geometry.aligned_height = aligned_height;

    geometry.sb_cols = aligned_width.div_ceil(sb_size);
    geometry.sb_rows = aligned_height.div_ceil(sb_size);
    geometry.sb_total = u32::from(geometry.sb_cols) * u32::from(geometry.sb_rows);

    geometry.mi_stride = u32::from(geometry.sb_cols) * u32::from(sb_size >> MI_SIZE_LOG2);
    geometry.mi_cols = u32::from(aligned_width) >> MI_SIZE_LOG2;
    geometry.mi_rows = u32::from(aligned_height) >> MI_SIZE_LOG2;

    if params.is_scaled() {
        resync.recompute_superblock_geometry(geometry);
    }
}
