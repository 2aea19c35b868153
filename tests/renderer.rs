mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embassy_time::{Duration, Instant};

    use cove_light_engine::{
        CommandPort, ControlRegisters, FrameScheduler, LightEngineConfig, ModeId,
        OutputDriver, RenderingBounds, Renderer, Rgb,
    };

    const MAX_LEDS: usize = 64;
    const LED_COUNT: u8 = 10;

    /// Driver that records every pushed frame for inspection.
    #[derive(Clone, Default)]
    struct CountingDriver {
        frames: Rc<RefCell<Vec<Vec<Rgb>>>>,
    }

    impl CountingDriver {
        fn push_count(&self) -> usize {
            self.frames.borrow().len()
        }

        fn last_frame(&self) -> Vec<Rgb> {
            self.frames.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl OutputDriver for CountingDriver {
        fn write(&mut self, colors: &[Rgb]) {
            self.frames.borrow_mut().push(colors.to_vec());
        }
    }

    fn config() -> LightEngineConfig {
        LightEngineConfig {
            bounds: RenderingBounds::strip(LED_COUNT),
            lamp_count: 3,
            seed: 42,
            color_change: Duration::from_millis(0),
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_static_fills_every_pixel() {
        let color = Rgb {
            r: 10,
            g: 20,
            b: 30,
        };
        let regs = ControlRegisters::new(ModeId::Static, color);
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        let frame = renderer.render(at(0)).expect("first frame must be pushed");
        assert_eq!(frame.len(), usize::from(LED_COUNT));
        assert!(frame.iter().all(|led| *led == color));
    }

    #[test]
    fn test_static_push_is_idempotent() {
        let regs = ControlRegisters::new(ModeId::Static, Rgb { r: 1, g: 2, b: 3 });
        let renderer = Renderer::<MAX_LEDS>::new(&regs, &config());
        let driver = CountingDriver::default();
        let mut scheduler = FrameScheduler::new(renderer, driver.clone());

        let first = scheduler.tick(at(0));
        assert!(first.pushed);

        // Unchanged mode and color: no redundant pushes
        for i in 1..5 {
            let result = scheduler.tick(at(i * 100));
            assert!(!result.pushed);
        }
        assert_eq!(driver.push_count(), 1);

        // A color change produces exactly one more push
        let port = CommandPort::new(&regs, false);
        port.set_color(Rgb { r: 9, g: 9, b: 9 });
        assert!(scheduler.tick(at(600)).pushed);
        assert!(!scheduler.tick(at(700)).pushed);
        assert_eq!(driver.push_count(), 2);
    }

    #[test]
    fn test_off_renders_black_once() {
        let regs = ControlRegisters::new(ModeId::Off, Rgb { r: 50, g: 60, b: 70 });
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        let frame = renderer.render(at(0)).expect("first frame must be pushed");
        assert!(frame.iter().all(|led| *led == Rgb { r: 0, g: 0, b: 0 }));
        assert!(renderer.render(at(100)).is_none());
    }

    #[test]
    fn test_set_color_switches_to_static() {
        let regs = ControlRegisters::new(ModeId::Aurora, Rgb { r: 0, g: 0, b: 0 });
        let port = CommandPort::new(&regs, false);
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        let ack = port.set_color(Rgb {
            r: 10,
            g: 20,
            b: 30,
        });
        assert!(!ack.active);

        let frame = renderer.render(at(0)).expect("frame after color change");
        assert!(frame.iter().all(|led| *led
            == Rgb {
                r: 10,
                g: 20,
                b: 30
            }));
        assert_eq!(renderer.current_mode(), ModeId::Static);
    }

    #[test]
    fn test_self_check_restores_prior_state() {
        let color = Rgb { r: 5, g: 5, b: 5 };
        let regs = ControlRegisters::new(ModeId::Static, color);
        let port = CommandPort::new(&regs, false);
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        renderer.render(at(0));

        let ack = port.set_mode(ModeId::Test);
        assert_eq!(ack.mode, ModeId::Test);
        assert!(regs.has_saved());

        // Pulse peaks mid-way as full white
        renderer.render(at(10));
        assert_eq!(renderer.current_mode(), ModeId::Test);
        let frame = renderer.render(at(260)).expect("mid-pulse frame");
        assert_eq!(
            frame[0],
            Rgb {
                r: 255,
                g: 255,
                b: 255
            }
        );

        // After the 0.5s pulse the saved state comes back
        let frame = renderer.render(at(600)).expect("restored frame");
        assert!(frame.iter().all(|led| *led == color));
        assert_eq!(renderer.current_mode(), ModeId::Static);
        assert_eq!(regs.snapshot().mode, ModeId::Static);
        assert_eq!(regs.snapshot().color, color);
        assert!(!regs.has_saved());
    }

    #[test]
    fn test_repeated_test_request_keeps_capture() {
        let color = Rgb { r: 7, g: 8, b: 9 };
        let regs = ControlRegisters::new(ModeId::Water, color);
        let port = CommandPort::new(&regs, false);
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        renderer.render(at(0));
        port.set_mode(ModeId::Test);
        renderer.render(at(20));
        // A second request while testing must not overwrite the capture
        port.set_mode(ModeId::Test);
        renderer.render(at(40));

        renderer.render(at(700));
        assert_eq!(regs.snapshot().mode, ModeId::Water);
        assert_eq!(regs.snapshot().color, color);
    }

    #[test]
    fn test_command_during_test_cancels_restore() {
        let regs = ControlRegisters::new(ModeId::Water, Rgb { r: 7, g: 8, b: 9 });
        let port = CommandPort::new(&regs, false);
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        renderer.render(at(0));
        port.set_mode(ModeId::Test);
        renderer.render(at(20));
        assert!(regs.has_saved());

        // An explicit command mid-test supersedes the pending restore
        let color = Rgb {
            r: 40,
            g: 50,
            b: 60,
        };
        port.set_color(color);
        assert!(!regs.has_saved());

        let frame = renderer.render(at(40)).expect("frame after color command");
        assert!(frame.iter().all(|led| *led == color));
        assert_eq!(renderer.current_mode(), ModeId::Static);

        // Long after the pulse would have ended, nothing reverts to water
        renderer.render(at(1_000));
        assert_eq!(regs.snapshot().mode, ModeId::Static);
        assert_eq!(regs.snapshot().color, color);
        assert!(!regs.has_saved());
    }

    #[test]
    fn test_mode_command_during_test_drops_snapshot() {
        let regs = ControlRegisters::new(ModeId::Water, Rgb { r: 1, g: 2, b: 3 });
        let port = CommandPort::new(&regs, false);

        port.set_mode(ModeId::Test);
        assert!(regs.has_saved());

        port.set_mode(ModeId::Fire);
        assert!(!regs.has_saved());
        assert_eq!(regs.snapshot().mode, ModeId::Fire);
    }

    #[test]
    fn test_initial_test_mode_settles_on_static() {
        let color = Rgb {
            r: 20,
            g: 30,
            b: 40,
        };
        let regs = ControlRegisters::new(ModeId::Test, color);
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        renderer.render(at(0));
        assert_eq!(renderer.current_mode(), ModeId::Test);

        // No captured state to restore: the pulse ends in a static fill of
        // the configured color
        let frame = renderer.render(at(600)).expect("settled frame");
        assert!(frame.iter().all(|led| *led == color));
        assert_eq!(renderer.current_mode(), ModeId::Static);
        assert_eq!(regs.snapshot().mode, ModeId::Static);

        // And the fill is idempotent from then on
        assert!(renderer.render(at(700)).is_none());
    }

    #[test]
    fn test_alert_pulses_red_only() {
        let regs = ControlRegisters::new(ModeId::Alert, Rgb { r: 0, g: 0, b: 0 });
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        // Quarter period: sin^2 reaches its peak at half period (600ms of 1200ms)
        let frame = renderer.render(at(600)).expect("alert frame");
        assert!(frame.iter().all(|led| led.g == 0 && led.b == 0));
        assert_eq!(frame[0].r, 255);
        assert!(frame.iter().all(|led| led.r == frame[0].r));

        assert_eq!(renderer.frame_duration(), Duration::from_millis(40));
    }

    #[test]
    fn test_fire_cadence_is_randomized_within_bounds() {
        let regs = ControlRegisters::new(ModeId::Fire, Rgb { r: 0, g: 0, b: 0 });
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        for i in 0..50 {
            let frame = renderer.render(at(i * 100)).expect("fire frame");
            // Flicker only darkens the fixed ember base
            assert!(frame.iter().all(|led| {
                led.r >= 215 && led.g >= 56 && led.g <= 96 && led.b <= 12
            }));
            let cadence = renderer.frame_duration().as_millis();
            assert!((50..=150).contains(&cadence), "cadence {cadence}ms");
        }
    }

    #[test]
    fn test_mode_dependent_cadence() {
        let regs = ControlRegisters::new(ModeId::Aurora, Rgb { r: 0, g: 0, b: 0 });
        let port = CommandPort::new(&regs, false);
        let renderer = Renderer::<MAX_LEDS>::new(&regs, &config());
        let mut scheduler = FrameScheduler::new(renderer, CountingDriver::default());

        let result = scheduler.tick(at(0));
        assert_eq!(result.sleep_duration, Duration::from_millis(20));

        port.set_mode(ModeId::Static);
        let result = scheduler.tick(at(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(100));
    }

    #[test]
    fn test_scheduler_resets_after_long_stall() {
        let regs = ControlRegisters::new(ModeId::Water, Rgb { r: 0, g: 0, b: 0 });
        let renderer = Renderer::<MAX_LEDS>::new(&regs, &config());
        let mut scheduler = FrameScheduler::new(renderer, CountingDriver::default());

        scheduler.tick(at(0));
        // A long stall must not produce a catch-up burst
        let result = scheduler.tick(at(5_000));
        assert_eq!(result.sleep_duration, Duration::from_millis(20));
        assert_eq!(result.next_deadline, at(5_020));
    }

    #[test]
    fn test_simulation_advances_identically() {
        let regs = ControlRegisters::new(ModeId::CoveWarm, Rgb { r: 0, g: 0, b: 0 });
        let mut renderer = Renderer::<MAX_LEDS>::new(&regs, &config());

        // Drive the warm-up ramp to completion; state advances whether or
        // not any driver consumes the frames.
        let mut pushes = 0;
        for i in 0..120 {
            if renderer.render(at(i * 30)).is_some() {
                pushes += 1;
            }
        }
        // 101 ramp frames, then held with no further pushes
        assert_eq!(pushes, 101);
        assert_eq!(renderer.frame_duration(), Duration::from_millis(200));
    }

    #[test]
    fn test_last_pushed_frame_is_ramp_target() {
        let regs = ControlRegisters::new(ModeId::CoveWarm, Rgb { r: 0, g: 0, b: 0 });
        let renderer = Renderer::<MAX_LEDS>::new(&regs, &config());
        let driver = CountingDriver::default();
        let mut scheduler = FrameScheduler::new(renderer, driver.clone());

        for i in 0..120 {
            scheduler.tick(at(i * 30));
        }
        let held = driver.last_frame();
        assert!(held.iter().all(|led| *led
            == Rgb {
                r: 255,
                g: 147,
                b: 41
            }));
    }
}
