#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    use glam::Vec3;

    use stealth_core::config::{IgnoreRetention, SpotterConfig, TickIntervals};
    use stealth_core::enums::SpotterState;
    use stealth_core::events::StealthEvent;
    use stealth_core::types::{ColliderHandle, LastSeen, Pose};

    use crate::behavior::{PassiveBehavior, SpotterBehavior};
    use crate::senses::Senses;
    use crate::spotter::Spotter;

    const GUARD: ColliderHandle = ColliderHandle(1);
    const SPY_A: ColliderHandle = ColliderHandle(10);
    const SPY_B: ColliderHandle = ColliderHandle(11);

    /// Hand-placed world: the guard stands at the origin facing +Z.
    #[derive(Default)]
    struct TestSenses {
        spies: HashMap<ColliderHandle, Pose>,
        sight: HashSet<ColliderHandle>,
    }

    impl TestSenses {
        fn with_spy(spy: ColliderHandle, distance: f32, in_sight: bool) -> Self {
            let mut senses = Self::default();
            senses.place(spy, Vec3::new(0.0, 0.0, distance), in_sight);
            senses
        }

        fn place(&mut self, spy: ColliderHandle, position: Vec3, in_sight: bool) {
            self.spies.insert(spy, Pose::new(position, Vec3::X));
            if in_sight {
                self.sight.insert(spy);
            } else {
                self.sight.remove(&spy);
            }
        }
    }

    impl Senses for TestSenses {
        fn spotter_pose(&self) -> Pose {
            Pose::new(Vec3::ZERO, Vec3::Z)
        }

        fn spy_pose(&self, spy: ColliderHandle) -> Option<Pose> {
            self.spies.get(&spy).copied()
        }

        fn line_of_sight(&self, spy: ColliderHandle) -> bool {
            self.sight.contains(&spy)
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Recorder {
        fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }

        fn count(&self, prefix: &str) -> usize {
            self.calls().iter().filter(|c| c.starts_with(prefix)).count()
        }

        fn push(&self, call: String) {
            self.0.lock().unwrap().push(call);
        }
    }

    impl SpotterBehavior for Recorder {
        fn on_spy_found(&mut self, spy: ColliderHandle) {
            self.push(format!("spy_found {}", spy.0));
        }
        fn on_spy_lost(&mut self, spy: ColliderHandle, _last_seen: Option<LastSeen>) {
            self.push(format!("spy_lost {}", spy.0));
        }
        fn on_target_found(&mut self, target: ColliderHandle) {
            self.push(format!("target_found {}", target.0));
        }
        fn on_target_lost(&mut self, target: ColliderHandle, _last_seen: Option<LastSeen>) {
            self.push(format!("target_lost {}", target.0));
        }
        fn forget_target(&mut self) {
            self.push("forget_target".to_string());
        }
    }

    /// Scenario tuning: min vision 2, max vision 10, every state every tick.
    fn config() -> SpotterConfig {
        SpotterConfig {
            fov_degrees: 90.0,
            investigate_visibility: 0.5,
            recognize_visibility: 0.8,
            investigate_audibility: 0.5,
            intervals: TickIntervals::EVERY_TICK,
            search_duration_secs: 5.0,
            min_vision_distance: 2.0,
            max_vision_distance: 10.0,
            ignore_retention: IgnoreRetention::Permanent,
        }
    }

    fn make_spotter(config: SpotterConfig) -> (Spotter, Recorder) {
        let recorder = Recorder::default();
        let spotter = Spotter::new(GUARD, config, Box::new(recorder.clone())).unwrap();
        (spotter, recorder)
    }

    fn show(spotter: &mut Spotter, spy: ColliderHandle, rating: f32) {
        spotter.on_spy_visible(spy);
        spotter.on_visibility_change(spy, rating);
    }

    /// Drive a spotter into Following its designated target at close range.
    fn following(senses: &TestSenses) -> (Spotter, Recorder) {
        let (mut spotter, recorder) = make_spotter(config());
        spotter.set_target(Some(SPY_A));
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.25, senses);
        spotter.on_stealth_tick(0.25, senses);
        assert_eq!(spotter.state(), SpotterState::Following);
        (spotter, recorder)
    }

    // ---- Patrolling ----

    #[test]
    fn test_midpoint_spy_triggers_investigation() {
        // d = 6 between min 2 and max 10: effective visibility 2/3 > 0.5
        let senses = TestSenses::with_spy(SPY_A, 6.0, true);
        let (mut spotter, recorder) = make_spotter(config());
        show(&mut spotter, SPY_A, 1.0);

        let effective = spotter.effective_visibility(SPY_A, &senses);
        assert!((effective - 2.0 / 3.0).abs() < 1e-4, "got {effective}");

        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Investigating);
        assert_eq!(spotter.pursued_spy(), Some(SPY_A));
        assert_eq!(recorder.calls(), vec!["spy_found 10"]);
        assert_eq!(
            spotter.drain_events(),
            vec![StealthEvent::SpyFound {
                spotter: GUARD,
                spy: SPY_A
            }]
        );
    }

    #[test]
    fn test_dim_spy_not_investigated() {
        // Rating 0.4 at d = 6: 1 - (1/3)/0.4 = 1/6, below the threshold.
        let senses = TestSenses::with_spy(SPY_A, 6.0, true);
        let (mut spotter, _) = make_spotter(config());
        show(&mut spotter, SPY_A, 0.4);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
    }

    #[test]
    fn test_spy_behind_not_investigated() {
        let mut senses = TestSenses::default();
        senses.place(SPY_A, Vec3::new(0.0, 0.0, -3.0), true);
        let (mut spotter, _) = make_spotter(config());
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
    }

    #[test]
    fn test_blocked_sight_not_investigated() {
        let senses = TestSenses::with_spy(SPY_A, 3.0, false);
        let (mut spotter, _) = make_spotter(config());
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
    }

    #[test]
    fn test_spy_out_of_range_has_zero_visibility() {
        let senses = TestSenses::with_spy(SPY_A, 3.0, true);
        let (spotter, _) = make_spotter(config());
        assert_eq!(spotter.effective_visibility(SPY_A, &senses), 0.0);
    }

    // ---- Audibility interrupt ----

    #[test]
    fn test_loud_spy_interrupts_patrol_immediately() {
        let senses = TestSenses::with_spy(SPY_A, 8.0, false);
        let (mut spotter, recorder) = make_spotter(SpotterConfig {
            intervals: TickIntervals {
                patrol: 1000,
                ..TickIntervals::EVERY_TICK
            },
            ..config()
        });
        spotter.on_spy_audible(SPY_A);
        spotter.on_audibility_change(SPY_A, 0.9);

        assert_eq!(spotter.state(), SpotterState::Investigating);
        assert_eq!(recorder.count("spy_found"), 1);

        // Sound alone keeps the investigation alive without sight.
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Investigating);
        assert_eq!(recorder.count("spy_found"), 1);
    }

    #[test]
    fn test_quiet_spy_does_not_interrupt() {
        let (mut spotter, recorder) = make_spotter(config());
        spotter.on_spy_audible(SPY_A);
        spotter.on_audibility_change(SPY_A, 0.5);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_loud_spy_interrupts_following() {
        let senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, _) = following(&senses);
        spotter.on_audibility_change(SPY_B, 0.9);
        assert_eq!(spotter.state(), SpotterState::Investigating);
        assert_eq!(spotter.pursued_spy(), Some(SPY_B));
    }

    #[test]
    fn test_loud_spy_interrupts_searching() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, _) = following(&senses);
        senses.place(SPY_A, Vec3::new(0.0, 0.0, 4.0), false);
        spotter.on_stealth_tick(0.25, &senses);
        assert_eq!(spotter.state(), SpotterState::Searching);

        spotter.on_audibility_change(SPY_A, 0.9);
        assert_eq!(spotter.state(), SpotterState::Investigating);
    }

    // ---- Investigating ----

    #[test]
    fn test_lost_spy_returns_to_patrol_with_last_seen() {
        let mut senses = TestSenses::with_spy(SPY_A, 6.0, true);
        let (mut spotter, recorder) = make_spotter(config());
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Investigating);
        assert_eq!(spotter.last_seen(), None);

        senses.place(SPY_A, Vec3::new(2.0, 0.0, 7.0), false);
        spotter.on_stealth_tick(0.1, &senses);

        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert_eq!(spotter.pursued_spy(), None);
        let seen = spotter.last_seen().expect("last seen recorded");
        assert_eq!(seen.position, Vec3::new(2.0, 0.0, 7.0));
        assert_eq!(seen.direction, Vec3::X);
        assert_eq!(recorder.calls(), vec!["spy_found 10", "spy_lost 10"]);
    }

    #[test]
    fn test_recognized_target_is_followed() {
        let senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (spotter, recorder) = following(&senses);
        assert_eq!(spotter.pursued_spy(), Some(SPY_A));
        assert_eq!(recorder.calls(), vec!["spy_found 10", "target_found 10"]);
    }

    #[test]
    fn test_investigation_continues_below_recognition() {
        // d = 6 is suspicious (2/3) but not recognizable (needs > 0.8).
        let senses = TestSenses::with_spy(SPY_A, 6.0, true);
        let (mut spotter, _) = make_spotter(config());
        spotter.set_target(Some(SPY_A));
        show(&mut spotter, SPY_A, 1.0);
        for _ in 0..10 {
            spotter.on_stealth_tick(0.1, &senses);
        }
        assert_eq!(spotter.state(), SpotterState::Investigating);
    }

    #[test]
    fn test_recognized_bystander_is_ignored_forever() {
        let senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, recorder) = make_spotter(config());
        show(&mut spotter, SPY_A, 1.0);

        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Investigating);
        spotter.on_stealth_tick(0.1, &senses);

        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert!(spotter.is_ignoring(SPY_A));
        assert_eq!(spotter.visibility_rating(SPY_A), None);
        assert_eq!(recorder.calls(), vec!["spy_found 10", "forget_target"]);
        let events = spotter.drain_events();
        assert!(events.contains(&StealthEvent::SpyIgnored {
            spotter: GUARD,
            spy: SPY_A
        }));

        // Leaves and re-enters range, fully visible and noisy.
        spotter.on_spy_invisible(SPY_A);
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_spy_audible(SPY_A);
        spotter.on_audibility_change(SPY_A, 1.0);
        for _ in 0..50 {
            spotter.on_stealth_tick(0.1, &senses);
        }
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert_eq!(recorder.count("spy_found"), 1);
    }

    #[test]
    fn test_expiring_ignore_allows_reinvestigation() {
        let senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, recorder) = make_spotter(SpotterConfig {
            ignore_retention: IgnoreRetention::Expiring { secs: 1.0 },
            ..config()
        });
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.5, &senses);
        spotter.on_stealth_tick(0.5, &senses);
        assert!(spotter.is_ignoring(SPY_A));

        assert_eq!(spotter.visible_count(), 0);

        // The spy never leaves range; the lapse alone brings it back.
        spotter.on_stealth_tick(0.5, &senses);
        spotter.on_stealth_tick(0.5, &senses);
        assert!(!spotter.is_ignoring(SPY_A));
        assert_eq!(spotter.visibility_rating(SPY_A), Some(1.0));
        assert_eq!(spotter.state(), SpotterState::Investigating);
        assert_eq!(recorder.count("spy_found"), 2);
    }

    #[test]
    fn test_expired_ignore_keeps_departed_spy_out() {
        let senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, recorder) = make_spotter(SpotterConfig {
            ignore_retention: IgnoreRetention::Expiring { secs: 1.0 },
            ..config()
        });
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.5, &senses);
        spotter.on_stealth_tick(0.5, &senses);
        assert!(spotter.is_ignoring(SPY_A));

        spotter.on_spy_invisible(SPY_A);
        for _ in 0..4 {
            spotter.on_stealth_tick(0.5, &senses);
        }
        assert!(!spotter.is_ignoring(SPY_A));
        assert_eq!(spotter.visible_count(), 0);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert_eq!(recorder.count("spy_found"), 1);
    }

    #[test]
    fn test_rating_tracked_while_ignored() {
        let senses = TestSenses::with_spy(SPY_A, 6.0, true);
        let (mut spotter, recorder) = make_spotter(SpotterConfig {
            ignore_retention: IgnoreRetention::Expiring { secs: 1.0 },
            ..config()
        });
        // At 6m a rating of 3 is recognized (1 - (32/96)/3 > 0.8).
        show(&mut spotter, SPY_A, 3.0);
        spotter.on_stealth_tick(0.5, &senses);
        spotter.on_stealth_tick(0.5, &senses);
        assert!(spotter.is_ignoring(SPY_A));

        // Dims to 0.25 while ignored: effective 0 at this range.
        spotter.on_visibility_change(SPY_A, 0.25);
        spotter.on_stealth_tick(0.5, &senses);
        spotter.on_stealth_tick(0.5, &senses);
        assert_eq!(spotter.visibility_rating(SPY_A), Some(0.25));
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert_eq!(recorder.count("spy_found"), 1);
    }

    #[test]
    fn test_second_spy_still_investigated_after_ignore() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        senses.place(SPY_B, Vec3::new(0.5, 0.0, 3.0), true);
        let (mut spotter, _) = make_spotter(config());
        spotter.set_target(Some(SPY_B));
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        spotter.on_stealth_tick(0.1, &senses);
        assert!(spotter.is_ignoring(SPY_A));

        show(&mut spotter, SPY_B, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.pursued_spy(), Some(SPY_B));
    }

    // ---- Following / Searching ----

    #[test]
    fn test_lost_target_starts_search() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, recorder) = following(&senses);
        senses.place(SPY_A, Vec3::new(0.0, 0.0, 4.0), false);
        spotter.on_stealth_tick(0.25, &senses);

        assert_eq!(spotter.state(), SpotterState::Searching);
        assert_eq!(spotter.pursued_spy(), None);
        assert_eq!(spotter.search_remaining_secs(), 5.0);
        assert_eq!(
            spotter.last_seen().map(|s| s.position),
            Some(Vec3::new(0.0, 0.0, 4.0))
        );
        assert_eq!(recorder.count("target_lost"), 1);
    }

    #[test]
    fn test_search_times_out_after_duration() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, recorder) = following(&senses);
        senses.place(SPY_A, Vec3::new(0.0, 0.0, 4.0), false);
        spotter.on_stealth_tick(0.25, &senses);
        assert_eq!(spotter.state(), SpotterState::Searching);

        // 19 * 0.25 = 4.75 s: still searching.
        for _ in 0..19 {
            spotter.on_stealth_tick(0.25, &senses);
        }
        assert_eq!(spotter.state(), SpotterState::Searching);

        // 5.0 s reached.
        spotter.on_stealth_tick(0.25, &senses);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert_eq!(recorder.count("forget_target"), 1);
        assert_eq!(spotter.search_remaining_secs(), 0.0);
    }

    #[test]
    fn test_search_counts_time_across_throttled_ticks() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, _) = make_spotter(SpotterConfig {
            intervals: TickIntervals {
                search: 4,
                ..TickIntervals::EVERY_TICK
            },
            ..config()
        });
        spotter.set_target(Some(SPY_A));
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.25, &senses);
        spotter.on_stealth_tick(0.25, &senses);
        senses.place(SPY_A, Vec3::new(0.0, 0.0, 4.0), false);
        spotter.on_stealth_tick(0.25, &senses);
        assert_eq!(spotter.state(), SpotterState::Searching);

        // Four bodies of 1.0 s each.
        for _ in 0..16 {
            spotter.on_stealth_tick(0.25, &senses);
        }
        assert!((spotter.search_remaining_secs() - 1.0).abs() < 1e-6);
        for _ in 0..4 {
            spotter.on_stealth_tick(0.25, &senses);
        }
        assert_eq!(spotter.state(), SpotterState::Patrolling);
    }

    #[test]
    fn test_search_regains_sight() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, recorder) = following(&senses);
        senses.place(SPY_A, Vec3::new(0.0, 0.0, 4.0), false);
        spotter.on_stealth_tick(0.25, &senses);
        assert_eq!(spotter.state(), SpotterState::Searching);

        senses.place(SPY_A, Vec3::new(0.0, 0.0, 5.0), true);
        spotter.on_stealth_tick(0.25, &senses);
        assert_eq!(spotter.state(), SpotterState::Following);
        assert_eq!(recorder.count("target_found"), 2);
    }

    #[test]
    fn test_search_needs_spy_in_range() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, _) = following(&senses);
        senses.place(SPY_A, Vec3::new(0.0, 0.0, 4.0), false);
        spotter.on_stealth_tick(0.25, &senses);
        spotter.on_spy_invisible(SPY_A);

        // In sight geometrically but outside the visibility probe.
        senses.place(SPY_A, Vec3::new(0.0, 0.0, 5.0), true);
        spotter.on_stealth_tick(0.25, &senses);
        assert_eq!(spotter.state(), SpotterState::Searching);
    }

    // ---- Throttling ----

    #[test]
    fn test_patrol_body_runs_every_nth_tick() {
        let senses = TestSenses::with_spy(SPY_A, 3.0, true);
        let (mut spotter, _) = make_spotter(SpotterConfig {
            intervals: TickIntervals {
                patrol: 4,
                ..TickIntervals::EVERY_TICK
            },
            ..config()
        });
        show(&mut spotter, SPY_A, 1.0);
        for _ in 0..3 {
            spotter.on_stealth_tick(0.1, &senses);
            assert_eq!(spotter.state(), SpotterState::Patrolling);
        }
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Investigating);
    }

    #[test]
    fn test_investigate_interval_counts_from_transition() {
        let mut senses = TestSenses::with_spy(SPY_A, 6.0, true);
        let (mut spotter, _) = make_spotter(SpotterConfig {
            intervals: TickIntervals {
                investigate: 3,
                ..TickIntervals::EVERY_TICK
            },
            ..config()
        });
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Investigating);

        senses.place(SPY_A, Vec3::new(0.0, 0.0, 6.0), false);
        spotter.on_stealth_tick(0.1, &senses);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Investigating);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
    }

    // ---- Lifecycle ----

    #[test]
    fn test_every_state_returns_to_patrol() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, _) = following(&senses);
        let mut seen = vec![SpotterState::Patrolling, SpotterState::Investigating];
        seen.push(spotter.state());

        senses.place(SPY_A, Vec3::new(0.0, 0.0, 4.0), false);
        spotter.on_stealth_tick(0.25, &senses);
        seen.push(spotter.state());
        for _ in 0..40 {
            spotter.on_stealth_tick(0.25, &senses);
        }
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        for state in SpotterState::ALL {
            assert!(seen.contains(&state), "{state:?} never visited");
        }
    }

    #[test]
    fn test_forgotten_spy_is_lost() {
        let senses = TestSenses::with_spy(SPY_A, 6.0, true);
        let (mut spotter, recorder) = make_spotter(config());
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        spotter.forget_spy(SPY_A);
        assert_eq!(spotter.visible_count(), 0);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert_eq!(recorder.count("spy_lost"), 1);
    }

    #[test]
    fn test_forgotten_handle_starts_fresh() {
        let senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, recorder) = make_spotter(config());
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        spotter.on_stealth_tick(0.1, &senses);
        assert!(spotter.is_ignoring(SPY_A));

        spotter.forget_spy(SPY_A);
        assert!(!spotter.is_ignoring(SPY_A));
        assert_eq!(spotter.ignored_count(), 0);

        // A new spy reusing the handle is judged on its own.
        show(&mut spotter, SPY_A, 1.0);
        spotter.on_stealth_tick(0.1, &senses);
        assert_eq!(spotter.state(), SpotterState::Investigating);
        assert_eq!(recorder.count("spy_found"), 2);
    }

    #[test]
    fn test_forgotten_target_ends_pursuit() {
        let mut senses = TestSenses::with_spy(SPY_A, 1.0, true);
        let (mut spotter, recorder) = following(&senses);

        // Lose and re-acquire once so a stale last-seen exists.
        senses.place(SPY_A, Vec3::new(0.0, 0.0, 4.0), false);
        spotter.on_stealth_tick(0.25, &senses);
        assert_eq!(spotter.state(), SpotterState::Searching);
        assert!(spotter.last_seen().is_some());
        spotter.drain_events();

        spotter.forget_spy(SPY_A);
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert_eq!(spotter.last_seen(), None);
        assert_eq!(spotter.pursued_spy(), None);
        assert_eq!(
            spotter.drain_events(),
            vec![StealthEvent::TargetForgotten { spotter: GUARD }]
        );
        assert_eq!(recorder.count("forget_target"), 1);

        for _ in 0..40 {
            spotter.on_stealth_tick(0.25, &senses);
        }
        assert_eq!(spotter.state(), SpotterState::Patrolling);
        assert_eq!(recorder.count("target_lost"), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Spotter::new(
            GUARD,
            SpotterConfig {
                intervals: TickIntervals {
                    patrol: 0,
                    ..TickIntervals::EVERY_TICK
                },
                ..config()
            },
            Box::new(PassiveBehavior),
        );
        assert!(result.is_err());
    }
}
