//! Property tests for the core engine invariants.

use std::time::Duration;

use folio_core::animation::counter::{CounterConfig, CounterTask};
use folio_core::animation::scramble::{Scramble, ScrambleConfig};
use folio_core::animation::{AnimationEvent, Callbacks, FrameAnimation};
use folio_core::debounce::Debouncer;
use folio_core::flags::ObserveTags;
use folio_core::geometry::{Region, StaticLayout};
use folio_core::mutation::{UiClass, UiMutation};
use folio_core::rng::XorShift64;
use folio_core::scroll::{ScrollConfig, ScrollCoordinator};
use folio_core::timer::{ManualTimers, TimerService};
use folio_core::viewport::{ObserverConfig, ViewportEvent, ViewportObserver};
use proptest::prelude::*;

fn layout_from(heights: &[u16]) -> (StaticLayout, Vec<String>) {
    let mut layout = StaticLayout::new(800.0);
    let mut ids = Vec::new();
    let mut top = 0.0;
    for (i, h) in heights.iter().enumerate() {
        let id = format!("s{i}");
        layout.set_region(&id, Region::new(top, f64::from(*h)));
        top += f64::from(*h);
        ids.push(id);
    }
    (layout, ids)
}

proptest! {
    #[test]
    fn counter_is_monotonic_and_exact(
        target in 1i64..100_000,
        duration in 0u64..5_000,
        frame in 1u64..100,
    ) {
        let cfg = CounterConfig { duration_ms: duration, frame_ms: frame };
        let mut task = CounterTask::new(target, &cfg);
        let mut prev = i64::MIN;
        let mut steps = 0u32;
        while !task.is_complete() {
            let v = task.step();
            prop_assert!(v >= prev);
            prev = v;
            steps += 1;
            prop_assert!(steps <= cfg.total_steps());
        }
        prop_assert_eq!(prev, target);
    }

    #[test]
    fn scramble_ends_on_new_text_and_completes_once(
        old in "\\PC{0,12}",
        new in "\\PC{0,12}",
        seed in any::<u64>(),
    ) {
        let mut rng = XorShift64::new(seed);
        let scramble = Scramble::new(&old, &new, &ScrambleConfig::default(), &mut rng);
        let mut anim = Callbacks::new(scramble).on_complete();
        let mut last = String::new();
        let mut completions = 0;
        for _ in 0..200 {
            if anim.is_complete() {
                break;
            }
            last = anim.step();
            completions += anim
                .drain_events()
                .into_iter()
                .filter(|e| *e == AnimationEvent::Completed)
                .count();
        }
        prop_assert!(anim.is_complete());
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(last, new);
    }

    #[test]
    fn debouncer_fires_once_per_burst_with_latest(gaps in prop::collection::vec(0u64..16, 1..20)) {
        let mut timers = ManualTimers::new();
        let mut d = Debouncer::new(Duration::from_millis(16));
        let mut t = 0u64;
        for (i, gap) in gaps.iter().enumerate() {
            t += gap;
            timers.set_now(Duration::from_millis(t));
            prop_assert!(timers.pop_due(Duration::from_millis(t)).is_none());
            d.call(&mut timers, (), i);
        }
        let mut fired = Vec::new();
        while let Some(()) = timers.pop_due(Duration::from_millis(t + 1_000)) {
            fired.push((timers.now(), d.fire()));
        }
        prop_assert_eq!(fired, vec![(Duration::from_millis(t + 16), Some(gaps.len() - 1))]);
    }

    #[test]
    fn at_most_one_link_active(
        heights in prop::collection::vec(1u16..2_000, 1..8),
        offsets in prop::collection::vec(-500.0f64..20_000.0, 1..40),
    ) {
        let (layout, ids) = layout_from(&heights);
        let mut coord = ScrollCoordinator::new(ScrollConfig::default());
        for id in &ids {
            coord.add_section(id.clone());
            coord.link_section(id, format!("nav-{id}"));
        }
        let mut active: Vec<String> = Vec::new();
        for offset in offsets {
            for m in coord.tick(offset, &layout) {
                match m {
                    UiMutation::AddClass { target, class: UiClass::Active } => active.push(target),
                    UiMutation::RemoveClass { target, class: UiClass::Active } => {
                        active.retain(|a| *a != target);
                    }
                    _ => {}
                }
            }
            prop_assert!(active.len() <= 1);
            prop_assert_eq!(active.first().map(String::as_str), coord.active_link());
        }
    }

    #[test]
    fn reveal_is_monotonic(
        heights in prop::collection::vec(1u16..2_000, 1..8),
        offsets in prop::collection::vec(0.0f64..20_000.0, 1..40),
    ) {
        let (layout, ids) = layout_from(&heights);
        let mut coord = ScrollCoordinator::new(ScrollConfig::default());
        for id in &ids {
            coord.add_section(id.clone());
        }
        let mut revealed = vec![false; ids.len()];
        for offset in offsets {
            for m in coord.tick(offset, &layout) {
                prop_assert!(!matches!(
                    m,
                    UiMutation::RemoveClass { class: UiClass::SectionRevealed, .. }
                ), "section reveal was removed: {:?}", m);
            }
            for (i, id) in ids.iter().enumerate() {
                let now = coord.is_revealed(id);
                prop_assert!(now || !revealed[i]);
                revealed[i] = now;
            }
        }
    }

    #[test]
    fn viewport_entry_fires_at_most_once(
        top in 0.0f64..5_000.0,
        height in 0.0f64..1_000.0,
        offsets in prop::collection::vec(0.0f64..6_000.0, 1..50),
    ) {
        let layout = StaticLayout::new(800.0).with_region("el", Region::new(top, height));
        let mut obs = ViewportObserver::new(ObserverConfig::default());
        obs.observe("el", ObserveTags::COUNTER);
        let mut entered = 0;
        let mut started = 0;
        for offset in offsets {
            for event in obs.check(offset, &layout) {
                match event {
                    ViewportEvent::Entered(_) => entered += 1,
                    ViewportEvent::CounterStart(_) => started += 1,
                    ViewportEvent::ProgressAnimate(_) => {}
                }
            }
        }
        prop_assert!(entered <= 1);
        prop_assert_eq!(entered, started);
    }
}

#[test]
fn counter_example_from_stats_section() {
    let mut task = CounterTask::new(150, &CounterConfig::default());
    let mut last = 0;
    while !task.is_complete() {
        last = task.step();
    }
    assert_eq!(last, 150);
    assert!(task.frames() <= 125);
}

#[test]
fn debouncer_example_burst() {
    let mut timers = ManualTimers::new();
    let mut d = Debouncer::new(Duration::from_millis(16));
    for (t, arg) in [(0, "a"), (5, "b"), (10, "c"), (20, "d")] {
        timers.set_now(Duration::from_millis(t));
        d.call(&mut timers, (), arg);
    }
    assert_eq!(timers.pop_due(Duration::from_millis(100)), Some(()));
    assert_eq!(timers.now(), Duration::from_millis(36));
    assert_eq!(d.fire(), Some("d"));
}
