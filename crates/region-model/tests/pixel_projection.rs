use facesnap_region_model::NormalizedRegion;
use proptest::prelude::*;

proptest! {
    #[test]
    fn pixel_rect_always_fits_inside_frame(
        x in 0.0f64..1.0,
        y in 0.0f64..1.0,
        w in 0.0f64..1.0,
        h in 0.0f64..1.0,
        frame_w in 1u32..4096,
        frame_h in 1u32..4096,
    ) {
        let region = NormalizedRegion::new(x, y, w, h);
        let rect = region.to_pixel_rect(frame_w, frame_h);

        prop_assert!(rect.width >= 1);
        prop_assert!(rect.height >= 1);
        prop_assert!(rect.x + rect.width <= frame_w);
        prop_assert!(rect.y + rect.height <= frame_h);
    }

    #[test]
    fn clamped_regions_satisfy_invariants(
        x in -2.0f64..2.0,
        y in -2.0f64..2.0,
        w in -2.0f64..2.0,
        h in -2.0f64..2.0,
    ) {
        let region = NormalizedRegion::new(x, y, w, h);
        prop_assert!(region.is_valid(), "{region:?}");
    }
}

#[test]
fn full_region_maps_to_whole_frame() {
    let rect = NormalizedRegion::FULL.to_pixel_rect(1920, 1080);
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (0, 0, 1920, 1080));
}
