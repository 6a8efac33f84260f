//! # rescale-core
//!
//! Picture buffers, plane views and sample primitives shared by the rescale
//! library.
//!
//! This crate owns the storage side of spatial resampling:
//!
//! - [`PictureBuffer`]: padded, possibly chroma-subsampled plane storage in
//!   8-bit or 10-bit depth, with an opaque allocation entry point.
//! - [`PlaneView`] / [`PlaneViewMut`]: bounds-checked access to a plane's
//!   active region, so stride and origin arithmetic is centralized.
//! - [`Sample`]: the single seam between the 8-bit and 16-bit pipelines.
//! - [`extend_borders`]: replicate-edge padding for motion-search references.
//!
//! # Example
//!
//! ```
//! use rescale_core::{PictureBuffer, PictureConfig, PlaneMask};
//!
//! let pic = PictureBuffer::allocate(
//!     &PictureConfig::new(176, 144, 8).with_padding(16, 16),
//! )?;
//! assert_eq!(pic.plane_dims(0), (176, 144));
//! # Ok::<(), rescale_core::Error>(())
//! ```

pub mod error;
pub mod pad;
pub mod picture;
pub mod plane;
pub mod sample;

pub use error::{try_alloc_vec, Error, Result};
pub use pad::extend_borders;
pub use picture::{
    pack_highbd, unpack_highbd, ColorFormat, PictureBuffer, PictureConfig, PlaneMask, MAX_PLANES,
};
pub use plane::{PlaneView, PlaneViewMut};
pub use sample::Sample;
