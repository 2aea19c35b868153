mod tests {
    use cove_light_engine::color::{Rgb, blend_colors, hsv_to_rgb, kelvin_to_rgb};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_blend_colors() {
        assert_eq!(blend_colors(RED, BLUE, 0), RED);
        assert_eq!(blend_colors(RED, BLUE, 255), BLUE);
        assert_eq!(
            blend_colors(BLACK, WHITE, 128),
            Rgb {
                r: 128,
                g: 128,
                b: 128
            }
        );
        assert_eq!(blend_colors(WHITE, BLACK, 255), BLACK);
        assert_eq!(blend_colors(WHITE, BLACK, 0), WHITE);
    }

    #[test]
    fn test_kelvin_red_saturates_below_6600() {
        for kelvin in [1000u16, 2000, 2700, 4000, 6600] {
            assert_eq!(kelvin_to_rgb(kelvin).r, 255, "red at {kelvin}K");
        }
        assert!(kelvin_to_rgb(10000).r < 255);
    }

    #[test]
    fn test_kelvin_blue_suppression() {
        // Zero at and below the low cutoff
        assert_eq!(kelvin_to_rgb(1000).b, 0);
        assert_eq!(kelvin_to_rgb(1900).b, 0);

        // Non-decreasing up to the 6600K branch point, saturated above
        let mut previous = 0;
        for kelvin in [2000u16, 3000, 4500, 6000, 6600] {
            let blue = kelvin_to_rgb(kelvin).b;
            assert!(blue >= previous, "blue not monotonic at {kelvin}K");
            previous = blue;
        }
        assert_eq!(kelvin_to_rgb(6600).b, 255);
        assert_eq!(kelvin_to_rgb(20000).b, 255);
    }

    #[test]
    fn test_kelvin_known_values() {
        assert_eq!(kelvin_to_rgb(1000), Rgb { r: 255, g: 67, b: 0 });
        assert_eq!(
            kelvin_to_rgb(40000),
            Rgb {
                r: 151,
                g: 185,
                b: 255
            }
        );
        // Out-of-range inputs clamp to the supported span
        assert_eq!(kelvin_to_rgb(500), kelvin_to_rgb(1000));
    }

    #[test]
    fn test_hsv_achromatic() {
        // Zero saturation is grey regardless of hue, value maps to rounded 255ths
        for hue in [0.0f32, 0.17, 0.42, 0.73, 0.99] {
            assert_eq!(
                hsv_to_rgb(hue, 0.0, 0.5),
                Rgb {
                    r: 128,
                    g: 128,
                    b: 128
                }
            );
        }
        assert_eq!(hsv_to_rgb(0.3, 0.0, 0.0), BLACK);
        assert_eq!(hsv_to_rgb(0.3, 0.0, 1.0), WHITE);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), RED);
        assert_eq!(hsv_to_rgb(2.0 / 6.0, 1.0, 1.0), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(hsv_to_rgb(4.0 / 6.0, 1.0, 1.0), BLUE);
    }

    #[test]
    fn test_hsv_hue_wraps() {
        assert_eq!(hsv_to_rgb(1.25, 1.0, 1.0), hsv_to_rgb(0.25, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(-0.75, 1.0, 1.0), hsv_to_rgb(0.25, 1.0, 1.0));
    }
}
