//! Adaptive spatial resampling for encoding.
//!
//! Frames can be encoded at a reduced width (super-resolution: the scale is
//! `denom / 8` with `denom` in `[8, 16]`) and upscaled back for display.
//! This crate derives the per-frame scale parameters, resizes pictures with
//! a half-band decimation cascade followed by one polyphase interpolation
//! pass, and keeps per-reference caches of scaled search pyramids so that a
//! reference is rescaled at most once per denominator.
//!
//! # Example
//!
//! ```
//! use rescale_core::{ColorFormat, PictureBuffer, PictureConfig, PlaneMask};
//! use rescale_superres::{
//!     init_resize_picture, DownSamplingMethod, FrameGeometry, FrameInfo, FrameType,
//!     NoGeometryResync, SuperresConfig, SuperresMode, SuperresRng,
//! };
//!
//! let mut picture = PictureBuffer::allocate(
//!     &PictureConfig::new(176, 144, 8)
//!         .with_color_format(ColorFormat::Yuv400)
//!         .with_plane_mask(PlaneMask::LUMA)
//!         .with_padding(8, 8),
//! )?;
//! let config = SuperresConfig::default()
//!     .with_mode(SuperresMode::Fixed)
//!     .with_kf_denom(12);
//! let frame = FrameInfo {
//!     frame_type: FrameType::Key,
//!     allow_intrabc: false,
//!     enable_restoration: true,
//! };
//! let mut geometry = FrameGeometry::default();
//! let params = init_resize_picture(
//!     &mut picture,
//!     &mut geometry,
//!     &config,
//!     &frame,
//!     &mut SuperresRng::default(),
//!     64,
//!     &mut NoGeometryResync,
//!     None,
//!     DownSamplingMethod::Decimated,
//! )?;
//! assert_eq!(params.denom, 12);
//! assert_eq!(picture.width(), 120);
//! # Ok::<(), rescale_superres::SuperresError>(())
//! ```

pub mod error;
pub mod filters;
pub mod frame;
pub mod plane;
pub mod pyramid;
pub mod refscale;
pub mod resample;
pub mod superres;

pub use error::{Result, SuperresError};
pub use frame::resize_and_extend_frame;
pub use plane::resize_plane;
pub use refscale::{
    init_resize_picture, scale_input_reference, scale_rec_references, scale_source_references,
    DownSamplingMethod, RecScaleCache, ReconstructedReference, ScaledSourcePyramid,
    SourceReference, SourceScaleCache, SCALE_DENOM_SLOTS,
};
pub use resample::{decimate, interpolate, resize_multistep};
pub use superres::{
    calc_superres_params, calculate_scaled_dim, scale_frame_geometry, FrameGeometry, FrameInfo,
    FrameType, GeometryResync, NoGeometryResync, SuperresConfig, SuperresMode, SuperresParams,
    SuperresRng, MI_SIZE_LOG2, SCALE_DENOM_MAX, SCALE_NUMERATOR,
};
