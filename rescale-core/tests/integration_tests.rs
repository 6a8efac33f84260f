//! Picture buffer and border extension behavior across the public API.

use rescale_core::{
    extend_borders, pack_highbd, unpack_highbd, ColorFormat, PictureBuffer, PictureConfig,
    PlaneMask,
};

#[test]
fn border_extension_replicates_edges() {
    let mut picture = PictureBuffer::allocate(
        &PictureConfig::new(8, 6, 8)
            .with_color_format(ColorFormat::Yuv400)
            .with_plane_mask(PlaneMask::LUMA)
            .with_padding(4, 4),
    )
    .unwrap();

    {
        let mut view = picture.plane_view_mut(0).unwrap();
        for y in 0..6 {
            let row = view.row_mut(y);
            for (x, sample) in row.iter_mut().enumerate() {
                *sample = (10 * y + x) as u8;
            }
        }
    }
    extend_borders(&mut picture, PlaneMask::LUMA);

    let stride = picture.plane_stride(0);
    let data = picture.plane_data(0);
    // Top-left padding corner replicates the first active sample.
    assert_eq!(data[0], 0);
    assert_eq!(data[3 * stride + 3], 0);
    // Right margin replicates the last sample of its row.
    assert_eq!(data[4 * stride + 4 + 8], 7);
    assert_eq!(data[4 * stride + stride - 1], 7);
    // Bottom margin replicates the last active row.
    assert_eq!(data[(4 + 6) * stride + 4], 50);
    assert_eq!(data[(4 + 6 + 3) * stride + 4 + 7], 57);
}

#[test]
fn extension_covers_chroma_planes() {
    let mut picture = PictureBuffer::allocate(
        &PictureConfig::new(16, 8, 8).with_padding(4, 4),
    )
    .unwrap();
    for plane in 0..3 {
        let (w, h) = picture.plane_dims(plane);
        let mut view = picture.plane_view_mut(plane).unwrap();
        for y in 0..h {
            view.row_mut(y)[..w].fill(100 + plane as u8);
        }
    }
    extend_borders(&mut picture, PlaneMask::FULL);
    for plane in 0..3 {
        let expected = 100 + plane as u8;
        assert!(
            picture.plane_data(plane).iter().all(|&s| s == expected),
            "plane {plane} padding not replicated"
        );
    }
}

#[test]
fn highbd_pack_unpack_preserves_padding() {
    let mut picture = PictureBuffer::allocate(
        &PictureConfig::new(8, 4, 10)
            .with_color_format(ColorFormat::Yuv400)
            .with_plane_mask(PlaneMask::LUMA)
            .with_padding(2, 2),
    )
    .unwrap();
    for (i, chunk) in picture.plane_data_mut(0).chunks_exact_mut(2).enumerate() {
        chunk.copy_from_slice(&((i as u16) & 0x3ff).to_le_bytes());
    }

    let packed = pack_highbd(&picture).unwrap();
    let (total_w, total_h) = picture.plane_total_dims(0);
    assert_eq!(packed[0].len(), total_w * total_h);

    let mut restored = PictureBuffer::allocate(
        &PictureConfig::new(8, 4, 10)
            .with_color_format(ColorFormat::Yuv400)
            .with_plane_mask(PlaneMask::LUMA)
            .with_padding(2, 2),
    )
    .unwrap();
    unpack_highbd(&packed, &mut restored).unwrap();
    assert_eq!(restored.plane_data(0), picture.plane_data(0));
}

#[test]
fn highbd_extension_works_on_byte_storage() {
    let mut picture = PictureBuffer::allocate(
        &PictureConfig::new(4, 4, 10)
            .with_color_format(ColorFormat::Yuv400)
            .with_plane_mask(PlaneMask::LUMA)
            .with_padding(2, 2),
    )
    .unwrap();
    // Fill the active region with a 10-bit value whose two bytes differ.
    let stride = picture.plane_stride(0);
    {
        let data = picture.plane_data_mut(0);
        for y in 0..4 {
            for x in 0..4 {
                let at = ((y + 2) * stride + x + 2) * 2;
                data[at..at + 2].copy_from_slice(&770u16.to_le_bytes());
            }
        }
    }
    extend_borders(&mut picture, PlaneMask::LUMA);
    for chunk in picture.plane_data(0).chunks_exact(2) {
        assert_eq!(u16::from_le_bytes([chunk[0], chunk[1]]), 770);
    }
}
