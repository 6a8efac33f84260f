//! Picture buffer descriptors.
//!
//! A [`PictureBuffer`] owns the sample storage for up to three planes
//! (luma, Cb, Cr) plus a padding margin on every side. The active region is
//! addressed through [`PlaneView`]s; high-bit-depth pictures store two bytes
//! per sample, little endian, and are packed to planar `u16` buffers before
//! filtering.

use crate::error::{try_alloc_vec, Error, Result};
use crate::plane::{PlaneView, PlaneViewMut};
use bitflags::bitflags;

/// Number of picture planes (Y, Cb, Cr).
pub const MAX_PLANES: usize = 3;

bitflags! {
    /// Which planes a picture carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PlaneMask: u32 {
        /// Luma plane.
        const LUMA = 0x1;
        /// Cb chroma plane.
        const CB = 0x2;
        /// Cr chroma plane.
        const CR = 0x4;
    }
}

impl PlaneMask {
    /// All three planes.
    pub const FULL: PlaneMask = PlaneMask::LUMA.union(PlaneMask::CB).union(PlaneMask::CR);

    /// Whether the plane with the given index is present.
    pub fn has_plane(self, plane: usize) -> bool {
        match plane {
            0 => self.contains(PlaneMask::LUMA),
            1 => self.contains(PlaneMask::CB),
            2 => self.contains(PlaneMask::CR),
            _ => false,
        }
    }
}

/// Chroma layout of a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorFormat {
    /// Luma only.
    Yuv400,
    /// 4:2:0 subsampling.
    #[default]
    Yuv420,
    /// 4:2:2 subsampling.
    Yuv422,
    /// No chroma subsampling.
    Yuv444,
}

impl ColorFormat {
    /// Horizontal chroma subsampling shift.
    pub fn subsampling_x(self) -> u32 {
        match self {
            ColorFormat::Yuv400 | ColorFormat::Yuv420 | ColorFormat::Yuv422 => 1,
            ColorFormat::Yuv444 => 0,
        }
    }

    /// Vertical chroma subsampling shift.
    pub fn subsampling_y(self) -> u32 {
        match self {
            ColorFormat::Yuv400 | ColorFormat::Yuv420 => 1,
            ColorFormat::Yuv422 | ColorFormat::Yuv444 => 0,
        }
    }

    /// Number of planes encoded by this format.
    pub fn num_planes(self) -> usize {
        match self {
            ColorFormat::Yuv400 => 1,
            _ => 3,
        }
    }
}

/// Parameters for [`PictureBuffer::allocate`].
#[derive(Debug, Clone)]
pub struct PictureConfig {
    /// Active luma width.
    pub width: u32,
    /// Active luma height.
    pub height: u32,
    /// Sample bit depth (8 or 10).
    pub bit_depth: u32,
    /// Chroma layout.
    pub color_format: ColorFormat,
    /// Left padding margin in luma samples.
    pub padding_left: u32,
    /// Right padding margin in luma samples.
    pub padding_right: u32,
    /// Top padding margin in luma rows.
    pub padding_top: u32,
    /// Bottom padding margin in luma rows.
    pub padding_bottom: u32,
    /// Planes to allocate.
    pub plane_mask: PlaneMask,
}

impl PictureConfig {
    /// Config with symmetric padding on all sides.
    pub fn new(width: u32, height: u32, bit_depth: u32) -> Self {
        Self {
            width,
            height,
            bit_depth,
            color_format: ColorFormat::default(),
            padding_left: 0,
            padding_right: 0,
            padding_top: 0,
            padding_bottom: 0,
            plane_mask: PlaneMask::FULL,
        }
    }

    /// Set the chroma layout.
    pub fn with_color_format(mut self, format: ColorFormat) -> Self {
        self.color_format = format;
        self
    }

    /// Set a symmetric padding margin.
    pub fn with_padding(mut self, horizontal: u32, vertical: u32) -> Self {
        self.padding_left = horizontal;
        self.padding_right = horizontal;
        self.padding_top = vertical;
        self.padding_bottom = vertical;
        self
    }

    /// Restrict the allocated planes.
    pub fn with_plane_mask(mut self, mask: PlaneMask) -> Self {
        self.plane_mask = mask;
        self
    }
}

/// An owned picture with padded plane storage.
#[derive(Debug, Clone)]
pub struct PictureBuffer {
    width: u32,
    height: u32,
    bit_depth: u32,
    color_format: ColorFormat,
    plane_mask: PlaneMask,
    origin_x: u32,
    origin_y: u32,
    padding_right: u32,
    padding_bottom: u32,
    strides: [usize; MAX_PLANES],
    planes: [Vec<u8>; MAX_PLANES],
}

impl PictureBuffer {
    /// Allocate a picture. Allocation failure surfaces as
    /// [`Error::ResourceExhausted`].
    pub fn allocate(config: &PictureConfig) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        if config.bit_depth != 8 && config.bit_depth != 10 {
            return Err(Error::unsupported(format!(
                "bit depth {} (expected 8 or 10)",
                config.bit_depth
            )));
        }

        let bps = if config.bit_depth > 8 { 2usize } else { 1 };
        let mut strides = [0usize; MAX_PLANES];
        let mut planes: [Vec<u8>; MAX_PLANES] = [Vec::new(), Vec::new(), Vec::new()];

        let plane_count = config.color_format.num_planes();
        for plane in 0..plane_count {
            if !config.plane_mask.has_plane(plane) {
                continue;
            }
            let (ss_x, ss_y) = subsampling_for(plane, config.color_format);
            let total_w = ((config.padding_left + config.width + config.padding_right) >> ss_x)
                as usize;
            let total_h = ((config.padding_top + config.height + config.padding_bottom) >> ss_y)
                as usize;
            strides[plane] = total_w;
            planes[plane] = try_alloc_vec(total_w * total_h * bps, "picture plane")?;
        }

        Ok(Self {
            width: config.width,
            height: config.height,
            bit_depth: config.bit_depth,
            color_format: config.color_format,
            plane_mask: config.plane_mask,
            origin_x: config.padding_left,
            origin_y: config.padding_top,
            padding_right: config.padding_right,
            padding_bottom: config.padding_bottom,
            strides,
            planes,
        })
    }

    /// Active luma width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Active luma height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample bit depth.
    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    /// Bytes per stored sample.
    pub fn bytes_per_sample(&self) -> usize {
        if self.bit_depth > 8 {
            2
        } else {
            1
        }
    }

    /// Chroma layout.
    pub fn color_format(&self) -> ColorFormat {
        self.color_format
    }

    /// Planes present in this picture.
    pub fn plane_mask(&self) -> PlaneMask {
        self.plane_mask
    }

    /// Left padding margin in luma samples.
    pub fn origin_x(&self) -> u32 {
        self.origin_x
    }

    /// Top padding margin in luma rows.
    pub fn origin_y(&self) -> u32 {
        self.origin_y
    }

    /// Active dimensions of a plane, accounting for chroma subsampling.
    pub fn plane_dims(&self, plane: usize) -> (usize, usize) {
        let (ss_x, ss_y) = subsampling_for(plane, self.color_format);
        ((self.width >> ss_x) as usize, (self.height >> ss_y) as usize)
    }

    /// Origin offset of a plane's active region.
    pub fn plane_origin(&self, plane: usize) -> (usize, usize) {
        let (ss_x, ss_y) = subsampling_for(plane, self.color_format);
        (
            (self.origin_x >> ss_x) as usize,
            (self.origin_y >> ss_y) as usize,
        )
    }

    /// Stride of a plane in samples.
    pub fn plane_stride(&self, plane: usize) -> usize {
        self.strides[plane]
    }

    /// Total (padded) dimensions of a plane.
    pub fn plane_total_dims(&self, plane: usize) -> (usize, usize) {
        let (ss_x, ss_y) = subsampling_for(plane, self.color_format);
        (
            ((self.origin_x + self.width + self.padding_right) >> ss_x) as usize,
            ((self.origin_y + self.height + self.padding_bottom) >> ss_y) as usize,
        )
    }

    /// Raw byte storage of a plane.
    pub fn plane_data(&self, plane: usize) -> &[u8] {
        &self.planes[plane]
    }

    /// Raw byte storage of a plane, mutable.
    pub fn plane_data_mut(&mut self, plane: usize) -> &mut [u8] {
        &mut self.planes[plane]
    }

    /// View of a plane's active region. 8-bit pictures only.
    pub fn plane_view(&self, plane: usize) -> Result<PlaneView<'_, u8>> {
        self.require_8bit()?;
        let (w, h) = self.plane_dims(plane);
        let (ox, oy) = self.plane_origin(plane);
        PlaneView::new(&self.planes[plane], w, h, self.strides[plane], ox, oy)
    }

    /// Mutable view of a plane's active region. 8-bit pictures only.
    pub fn plane_view_mut(&mut self, plane: usize) -> Result<PlaneViewMut<'_, u8>> {
        self.require_8bit()?;
        let (w, h) = self.plane_dims(plane);
        let (ox, oy) = self.plane_origin(plane);
        let stride = self.strides[plane];
        PlaneViewMut::new(&mut self.planes[plane], w, h, stride, ox, oy)
    }

    fn require_8bit(&self) -> Result<()> {
        if self.bit_depth > 8 {
            return Err(Error::unsupported(
                "direct plane views require an 8-bit picture; pack to u16 first",
            ));
        }
        Ok(())
    }
}

/// Subsampling shifts for a plane index under a color format.
pub fn subsampling_for(plane: usize, format: ColorFormat) -> (u32, u32) {
    if plane == 0 {
        (0, 0)
    } else {
        (format.subsampling_x(), format.subsampling_y())
    }
}

/// Pack a high-bit-depth picture's planes (padding included) into planar
/// `u16` buffers.
pub fn pack_highbd(picture: &PictureBuffer) -> Result<Vec<Vec<u16>>> {
    debug_assert!(picture.bit_depth() > 8);
    let mut packed = Vec::with_capacity(MAX_PLANES);
    for plane in 0..MAX_PLANES {
        if !picture.plane_mask().has_plane(plane)
            || plane >= picture.color_format().num_planes()
        {
            packed.push(Vec::new());
            continue;
        }
        let bytes = picture.plane_data(plane);
        let mut buf: Vec<u16> = try_alloc_vec(bytes.len() / 2, "packed highbd plane")?;
        for (dst, src) in buf.iter_mut().zip(bytes.chunks_exact(2)) {
            *dst = u16::from_le_bytes([src[0], src[1]]);
        }
        packed.push(buf);
    }
    Ok(packed)
}

/// Unpack planar `u16` buffers back into a high-bit-depth picture.
pub fn unpack_highbd(packed: &[Vec<u16>], picture: &mut PictureBuffer) -> Result<()> {
    debug_assert!(picture.bit_depth() > 8);
    for plane in 0..MAX_PLANES {
        if !picture.plane_mask().has_plane(plane)
            || plane >= picture.color_format().num_planes()
        {
            continue;
        }
        let src = packed.get(plane).ok_or(Error::BufferTooSmall {
            needed: plane + 1,
            available: packed.len(),
        })?;
        let bytes = picture.plane_data_mut(plane);
        if src.len() * 2 != bytes.len() {
            return Err(Error::BufferTooSmall {
                needed: bytes.len() / 2,
                available: src.len(),
            });
        }
        for (dst, &sample) in bytes.chunks_exact_mut(2).zip(src.iter()) {
            dst.copy_from_slice(&sample.to_le_bytes());
        }
    }
    Ok(())
}
