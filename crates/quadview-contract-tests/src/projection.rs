use glam::Vec4;
use quadview_core::{compute_transform, EngineError, PackedBuffer, QUAD_POSITIONS};

const EPS: f32 = 1e-5;

/// Letterbox contract: a landscape surface with the image's own aspect needs no bars.
#[test]
fn landscape_matching_aspect_is_unit_square() {
    for (sw, sh) in [(1920, 1080), (1280, 720), (1001, 1000), (4000, 3)] {
        let t = compute_transform(sw, sh, sw as u32, sh as u32).expect("valid input");
        assert_eq!(
            (t.extents.left(), t.extents.right(), t.extents.bottom(), t.extents.top()),
            (-1.0, 1.0, -1.0, 1.0),
            "{sw}x{sh}"
        );
    }
}

#[test]
fn landscape_hd_square_image() {
    let t = compute_transform(1920, 1080, 512, 512).unwrap();
    assert!((t.extents.half_width - 1.777_777_8).abs() < EPS);
    assert!((t.extents.half_height - 1.0).abs() < EPS);
}

/// Portrait: half-height follows `image_aspect / surface_aspect`, so the image covers
/// `1 / half_height` of the viewport height.
#[test]
fn portrait_hd_square_image() {
    let t = compute_transform(1080, 1920, 512, 512).unwrap();
    assert!((t.extents.half_width - 1.0).abs() < EPS);
    assert!((t.extents.half_height - 1.777_777_8).abs() < EPS);

    let top = t.mvp * Vec4::new(0.0, 1.0, 0.0, 1.0);
    assert!((top.y - 0.5625).abs() < EPS);
}

#[test]
fn zero_height_never_produces_nan() {
    for (sw, sh, iw, ih) in [(1920, 0, 512, 512), (1920, 1080, 512, 0), (0, 0, 0, 0)] {
        match compute_transform(sw, sh, iw, ih) {
            Err(EngineError::DegenerateProjection { .. }) => {}
            Err(other) => panic!("unexpected error {other}"),
            Ok(t) => panic!("expected rejection, got {:?}", t.extents),
        }
    }
}

/// Determinism contract: the same sizes always give the same matrix, and a resize fully
/// replaces the previous result.
#[test]
fn transform_is_a_pure_function_of_sizes() {
    let a = compute_transform(800, 600, 640, 480).unwrap();
    let _other = compute_transform(300, 900, 16, 9).unwrap();
    let b = compute_transform(800, 600, 640, 480).unwrap();
    assert_eq!(a, b);
}

#[test]
fn quad_positions_round_trip() {
    let mut buf = PackedBuffer::from_points(&QUAD_POSITIONS).unwrap();
    let floats: Vec<f32> = std::iter::from_fn(|| buf.read_f32()).collect();
    assert_eq!(floats, [-1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0]);
}
