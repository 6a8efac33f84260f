//! End-to-end tests for the resampling engine and the frame-level scaling
//! flow.

use std::sync::Arc;

use rescale_core::{ColorFormat, PictureBuffer, PictureConfig, PlaneMask, PlaneView, PlaneViewMut};
use rescale_superres::{
    calc_superres_params, init_resize_picture, resize_multistep, resize_plane,
    scale_source_references, DownSamplingMethod, FrameGeometry, FrameInfo, FrameType,
    NoGeometryResync, SourceReference, SuperresConfig, SuperresMode, SuperresParams, SuperresRng,
};

fn inter_frame() -> FrameInfo {
    FrameInfo {
        frame_type: FrameType::Inter,
        allow_intrabc: false,
        enable_restoration: true,
    }
}

fn key_frame() -> FrameInfo {
    FrameInfo {
        frame_type: FrameType::Key,
        ..inter_frame()
    }
}

fn luma_picture(width: u32, height: u32) -> PictureBuffer {
    PictureBuffer::allocate(
        &PictureConfig::new(width, height, 8)
            .with_color_format(ColorFormat::Yuv400)
            .with_plane_mask(PlaneMask::LUMA)
            .with_padding(8, 8),
    )
    .unwrap()
}

fn fill_ramp(picture: &mut PictureBuffer) {
    let (w, h) = picture.plane_dims(0);
    let mut view = picture.plane_view_mut(0).unwrap();
    for y in 0..h {
        let row = view.row_mut(y);
        for (x, sample) in row.iter_mut().enumerate() {
            *sample = ((x * 255) / (w - 1)) as u8;
        }
    }
}

#[test]
fn identity_resize_is_exact() {
    let input: Vec<u8> = (0..176).map(|i| (i * 7 % 251) as u8).collect();
    let mut output = vec![0u8; 176];
    let mut tmp = vec![0u8; 176];
    resize_multistep(&input, &mut output, &mut tmp, 8);
    assert_eq!(input, output);
}

#[test]
fn downscale_then_upscale_ramp_round_trips() {
    let mut source = luma_picture(176, 144);
    fill_ramp(&mut source);

    let mut down = luma_picture(120, 144);
    resize_plane(
        &source.plane_view(0).unwrap(),
        &mut down.plane_view_mut(0).unwrap(),
        8,
    )
    .unwrap();

    let mut up = luma_picture(176, 144);
    resize_plane(
        &down.plane_view(0).unwrap(),
        &mut up.plane_view_mut(0).unwrap(),
        8,
    )
    .unwrap();

    // A smooth ramp survives a 176 -> 120 -> 176 round trip with small
    // mean absolute error.
    let original = source.plane_view(0).unwrap();
    let restored = up.plane_view(0).unwrap();
    let mut total_error = 0u64;
    let mut count = 0u64;
    for y in 0..original.height() {
        for (&a, &b) in original.row(y).iter().zip(restored.row(y)) {
            total_error += u64::from(a.abs_diff(b));
            count += 1;
        }
    }
    let mae = total_error as f64 / count as f64;
    assert!(mae < 2.0, "round-trip mean absolute error {mae}");
}

#[test]
fn resize_preserves_sample_range() {
    // Extremes stay within range at both bit depths.
    let input_8 = vec![255u8; 200];
    let mut output_8 = vec![0u8; 88];
    let mut tmp_8 = vec![0u8; 200];
    resize_multistep(&input_8, &mut output_8, &mut tmp_8, 8);
    assert!(output_8.iter().all(|&s| s == 255));

    let input_10 = vec![1023u16; 200];
    let mut output_10 = vec![0u16; 88];
    let mut tmp_10 = vec![0u16; 200];
    resize_multistep(&input_10, &mut output_10, &mut tmp_10, 10);
    assert!(output_10.iter().all(|&s| s == 1023));
}

#[test]
fn highbd_plane_resize_stays_in_range() {
    let data = vec![1023u16; 64 * 32];
    let src = PlaneView::new(&data, 64, 32, 64, 0, 0).unwrap();
    let mut out = vec![0u16; 40 * 32];
    let mut dst = PlaneViewMut::new(&mut out, 40, 32, 40, 0, 0).unwrap();
    resize_plane(&src, &mut dst, 10).unwrap();
    assert!(out.iter().all(|&s| s == 1023));
}

#[test]
fn denominator_12_scenario() {
    let config = SuperresConfig::default()
        .with_mode(SuperresMode::Fixed)
        .with_kf_denom(12);
    let mut params = SuperresParams::identity(176, 144);
    calc_superres_params(&mut params, &config, &key_frame(), &mut SuperresRng::default());
    assert_eq!(params.denom, 12);
    assert_eq!(params.encoding_width % 8, 0);
    assert!(params.encoding_width < 176);
    assert_eq!(params.encoding_height, 144);
}

#[test]
fn disabled_mode_never_scales() {
    let config = SuperresConfig::default().with_denom(14).with_kf_denom(14);
    let mut rng = SuperresRng::default();
    for frame in [key_frame(), inter_frame()] {
        for _ in 0..8 {
            let mut params = SuperresParams::identity(640, 480);
            calc_superres_params(&mut params, &config, &frame, &mut rng);
            assert_eq!(params.denom, 8);
            assert_eq!(params.encoding_width, 640);
        }
    }
}

#[test]
fn fixed_mode_key_and_inter_denominators() {
    let config = SuperresConfig::default()
        .with_mode(SuperresMode::Fixed)
        .with_kf_denom(10)
        .with_denom(8);
    let mut rng = SuperresRng::default();

    let mut params = SuperresParams::identity(640, 480);
    calc_superres_params(&mut params, &config, &key_frame(), &mut rng);
    assert_eq!(params.denom, 10);
    assert_eq!(params.encoding_width, 512);

    let mut params = SuperresParams::identity(640, 480);
    calc_superres_params(&mut params, &config, &inter_frame(), &mut rng);
    assert_eq!(params.denom, 8);
    assert_eq!(params.encoding_width, 640);
}

#[test]
fn reference_pyramid_built_once_across_frames() {
    let reference = Arc::new(SourceReference::new(luma_picture(176, 144)));
    let geometry = FrameGeometry {
        frame_width: 120,
        frame_height: 144,
        aligned_width: 120,
        aligned_height: 144,
        superres_denom: 12,
        ..FrameGeometry::default()
    };

    // Several frames at the same denominator reuse the same pyramid.
    let refs = [Arc::clone(&reference)];
    let first = scale_source_references(&refs, &geometry, DownSamplingMethod::Decimated).unwrap();
    let second = scale_source_references(&refs, &geometry, DownSamplingMethod::Decimated).unwrap();
    assert_eq!(reference.cache().build_count(), 1);
    assert!(Arc::ptr_eq(
        first[0].as_ref().unwrap(),
        second[0].as_ref().unwrap()
    ));
}

#[test]
fn frame_resize_flow() {
    let mut enhanced = luma_picture(176, 144);
    fill_ramp(&mut enhanced);
    let mut geometry = FrameGeometry::default();
    let config = SuperresConfig::default()
        .with_mode(SuperresMode::Fixed)
        .with_kf_denom(12)
        .with_denom(8);

    let params = init_resize_picture(
        &mut enhanced,
        &mut geometry,
        &config,
        &key_frame(),
        &mut SuperresRng::default(),
        64,
        &mut NoGeometryResync,
        None,
        DownSamplingMethod::Decimated,
    )
    .unwrap();

    assert_eq!(params.denom, 12);
    assert_eq!(enhanced.width(), 120);
    assert_eq!(geometry.frame_width, 120);
    assert_eq!(geometry.render_width, 176);
    assert_eq!(geometry.sb_cols, 2);
    assert_eq!(geometry.mi_cols, 30);

    // A ramp stays monotonic per row after the resize.
    let view = enhanced.plane_view(0).unwrap();
    for y in 0..view.height() {
        let row = view.row(y);
        assert!(row.windows(2).all(|w| w[0] <= w[1]));
    }

    // An inter frame under the same config keeps the source resolution.
    let mut inter_pic = luma_picture(176, 144);
    let mut inter_geometry = FrameGeometry::default();
    let params = init_resize_picture(
        &mut inter_pic,
        &mut inter_geometry,
        &config,
        &inter_frame(),
        &mut SuperresRng::default(),
        64,
        &mut NoGeometryResync,
        None,
        DownSamplingMethod::Decimated,
    )
    .unwrap();
    assert_eq!(params.denom, 8);
    assert_eq!(inter_pic.width(), 176);
    assert_eq!(inter_geometry.frame_width, 176);
}

#[test]
fn chroma_planes_follow_subsampling() {
    let mut enhanced = PictureBuffer::allocate(
        &PictureConfig::new(176, 144, 8).with_padding(8, 8),
    )
    .unwrap();
    for plane in 0..3 {
        enhanced.plane_data_mut(plane).fill(60 + plane as u8);
    }
    let mut geometry = FrameGeometry::default();
    let config = SuperresConfig::default()
        .with_mode(SuperresMode::Fixed)
        .with_kf_denom(16);

    init_resize_picture(
        &mut enhanced,
        &mut geometry,
        &config,
        &key_frame(),
        &mut SuperresRng::default(),
        64,
        &mut NoGeometryResync,
        None,
        DownSamplingMethod::Decimated,
    )
    .unwrap();

    assert_eq!(enhanced.width(), 88);
    assert_eq!(enhanced.plane_dims(1), (44, 72));
    for plane in 0..3 {
        let expected = 60 + plane as u8;
        let view = enhanced.plane_view(plane).unwrap();
        for y in 0..view.height() {
            assert!(view.row(y).iter().all(|&s| s == expected));
        }
    }
}
