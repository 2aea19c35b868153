mod tests {
    use embassy_time::Instant;

    use cove_light_engine::Rng;
    use cove_light_engine::Rgb;
    use cove_light_engine::effect::{
        AuroraEffect, CoveWarmEffect, CoveWarmVariant, Effect, LampEffect,
        TestPulseEffect, WaterEffect,
    };

    const LED_COUNT: usize = 30;
    const LONG_RUN_FRAMES: u32 = 10_000;

    /// Drive an effect for many frames with randomized frame intervals.
    fn long_run(effect: &mut impl Effect, check: impl Fn(&[Rgb])) {
        let mut leds = [Rgb { r: 0, g: 0, b: 0 }; LED_COUNT];
        let mut clock = Rng::new(0xC10C);
        let mut t_ms: u64 = 0;
        for _ in 0..LONG_RUN_FRAMES {
            t_ms += 5 + u64::from(clock.next_u32_below(76));
            effect.render(Instant::from_millis(t_ms), &mut leds);
            check(&leds);
        }
    }

    #[test]
    fn test_aurora_state_stays_bounded() {
        let mut effect = AuroraEffect::new(42);
        long_run(&mut effect, |_| {});
        assert!(effect.state_bounds_ok());
    }

    #[test]
    fn test_aurora_reset_on_pixel_count_change() {
        let mut effect = AuroraEffect::new(7);
        let mut long = [Rgb { r: 0, g: 0, b: 0 }; 60];
        let mut short = [Rgb { r: 0, g: 0, b: 0 }; 8];
        effect.render(Instant::from_millis(0), &mut long);
        effect.render(Instant::from_millis(20), &mut short);
        effect.render(Instant::from_millis(40), &mut long);
        assert!(effect.state_bounds_ok());
    }

    #[test]
    fn test_eras_state_stays_bounded() {
        let mut effect = LampEffect::eras(42, 4);
        long_run(&mut effect, |_| {});
        assert!(effect.state_bounds_ok());
    }

    #[test]
    fn test_cinematic_state_stays_bounded() {
        let mut effect = LampEffect::cinematic(42, 5);
        long_run(&mut effect, |_| {});
        assert!(effect.state_bounds_ok());
    }

    #[test]
    fn test_eras_zones_leave_gaps_black() {
        let mut effect = LampEffect::eras(3, 4);
        let mut leds = [Rgb { r: 0, g: 0, b: 0 }; LED_COUNT];
        for i in 0..10 {
            effect.render(Instant::from_millis(i * 40), &mut leds);
        }
        // Lit zone centers, dark gaps between them
        let black = Rgb { r: 0, g: 0, b: 0 };
        assert!(leds.iter().any(|led| *led != black));
        assert!(leds.iter().any(|led| *led == black));
    }

    #[test]
    fn test_water_stays_inside_gradient() {
        let mut effect = WaterEffect::new(9);
        long_run(&mut effect, |leds| {
            for led in leds {
                // Every pixel sits on the deep-blue..cyan gradient
                assert!(led.r <= 64);
                assert!((40..=224).contains(&led.g));
                assert!((96..=255).contains(&led.b));
            }
        });
    }

    #[test]
    fn test_water_has_no_phase_jumps_on_long_runs() {
        let mut effect = WaterEffect::new(2);
        let mut leds = [Rgb { r: 0, g: 0, b: 0 }; LED_COUNT];
        let mut previous: Option<[Rgb; LED_COUNT]> = None;

        // Steady 20ms cadence straddling the one-hour mark; adjacent frames
        // must stay close (wave motion plus noise, never a phase snap)
        for step in 0..20u64 {
            let t_ms = 3_599_800 + step * 20;
            effect.render(Instant::from_millis(t_ms), &mut leds);
            if let Some(previous) = previous {
                for (led, prior) in leds.iter().zip(previous) {
                    assert!(led.r.abs_diff(prior.r) <= 16, "red jump at {t_ms}ms");
                    assert!(led.g.abs_diff(prior.g) <= 48, "green jump at {t_ms}ms");
                    assert!(led.b.abs_diff(prior.b) <= 48, "blue jump at {t_ms}ms");
                }
            }
            previous = Some(leds);
        }
    }

    #[test]
    fn test_cove_warm_gamma_variant_ramps_darker() {
        let mut standard = CoveWarmEffect::new(CoveWarmVariant::Standard);
        let mut shaped = CoveWarmEffect::new(CoveWarmVariant::GammaShaped);
        let mut standard_leds = [Rgb { r: 0, g: 0, b: 0 }; LED_COUNT];
        let mut shaped_leds = [Rgb { r: 0, g: 0, b: 0 }; LED_COUNT];

        for i in 0..51u64 {
            let now = Instant::from_millis(i * 30);
            standard.render(now, &mut standard_leds);
            shaped.render(now, &mut shaped_leds);
        }

        // Mid-ramp the gamma-shaped variant sits well below the linear one
        assert_eq!(standard_leds[0].r, 128);
        assert!(shaped_leds[0].r < standard_leds[0].r);
        assert!(shaped_leds[0].g < standard_leds[0].g);
        assert!(shaped_leds[0].b < standard_leds[0].b);

        // Both variants land on the same warm target
        for i in 51..120u64 {
            let now = Instant::from_millis(i * 30);
            standard.render(now, &mut standard_leds);
            shaped.render(now, &mut shaped_leds);
        }
        let target = Rgb {
            r: 255,
            g: 147,
            b: 41,
        };
        assert_eq!(standard_leds[0], target);
        assert_eq!(shaped_leds[0], target);
    }

    #[test]
    fn test_water_varies_across_strip() {
        let mut effect = WaterEffect::new(1);
        let mut leds = [Rgb { r: 0, g: 0, b: 0 }; LED_COUNT];
        effect.render(Instant::from_millis(500), &mut leds);
        assert!(leds.iter().any(|led| *led != leds[0]));
    }

    #[test]
    fn test_pulse_envelope_and_completion() {
        let mut effect = TestPulseEffect::new();
        let mut leds = [Rgb { r: 0, g: 0, b: 0 }; LED_COUNT];

        effect.render(Instant::from_millis(100), &mut leds);
        assert_eq!(leds[0], Rgb { r: 0, g: 0, b: 0 });
        assert!(!effect.is_finished(Instant::from_millis(100)));

        effect.render(Instant::from_millis(350), &mut leds);
        assert_eq!(
            leds[0],
            Rgb {
                r: 255,
                g: 255,
                b: 255
            }
        );

        assert!(!effect.is_finished(Instant::from_millis(599)));
        assert!(effect.is_finished(Instant::from_millis(600)));

        // Past the duration the pulse floors at black
        effect.render(Instant::from_millis(700), &mut leds);
        assert_eq!(leds[0], Rgb { r: 0, g: 0, b: 0 });
    }
}
