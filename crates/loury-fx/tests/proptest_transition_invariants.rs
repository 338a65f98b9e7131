//! Property-based invariant tests for transitions and notifications.
//!
//! 1. A counter always finishes on its exact end value, for any i64 endpoints.
//! 2. Typing always finishes with the full text, one char per step.
//! 3. Any transition cancelled after k frames performs no further writes.
//! 4. Any number of removals of the same card dismisses it exactly once.

use std::rc::Rc;
use std::time::Duration;

use loury_core::{Element, ElementRef, FrameScheduler, MemoryDocument};
use loury_fx::{InterpolationEngine, NotificationKind, NotificationQueue, SlideDirection};
use proptest::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

fn drain(sched: &FrameScheduler, step: Duration, max_frames: u32) -> u32 {
    let mut now = sched.now();
    let mut frames = 0;
    while !sched.is_idle() && frames < max_frames {
        now += step;
        sched.run_frame(now);
        frames += 1;
    }
    frames
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Counter end value
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn counter_ends_exactly(start in -10_000i64..10_000, end in -10_000i64..10_000, ms in 0u64..1000) {
        let doc = MemoryDocument::new();
        let sched = FrameScheduler::new();
        let engine = InterpolationEngine::new(sched.clone());
        let el: ElementRef = doc.create_in_body("stat");

        let handle = engine.animate_counter(&el, start, end, Duration::from_millis(ms));
        drain(&sched, FRAME, 1000);

        prop_assert!(handle.is_finished());
        prop_assert_eq!(el.text(), end.to_string());
    }
}

proptest! {
    #[test]
    fn counter_handles_extreme_endpoints(start in any::<i64>(), end in any::<i64>()) {
        let doc = MemoryDocument::new();
        let sched = FrameScheduler::new();
        let engine = InterpolationEngine::new(sched.clone());
        let el: ElementRef = doc.create_in_body("stat");

        let handle = engine.animate_counter(&el, start, end, Duration::from_millis(200));
        drain(&sched, FRAME, 100);

        prop_assert!(handle.is_finished());
        prop_assert_eq!(el.text(), end.to_string());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Typing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn typing_reveals_full_text(text in "\\PC{0,24}", speed in 1u64..100) {
        let doc = MemoryDocument::new();
        let sched = FrameScheduler::new();
        let engine = InterpolationEngine::new(sched.clone());
        let el: ElementRef = doc.create_in_body("headline");

        engine.type_text(&el, &text, Duration::from_millis(speed));
        let frames = drain(&sched, Duration::from_millis(speed), 1000);

        prop_assert_eq!(el.text(), text.clone());
        prop_assert_eq!(frames as usize, text.chars().count());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Cancellation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cancel_stops_all_writes(k in 0u32..20, routine in 0u8..4) {
        let doc = MemoryDocument::new();
        let sched = FrameScheduler::new();
        let engine = InterpolationEngine::new(sched.clone());
        let el = doc.create_in_body("card");
        let target: ElementRef = el.clone();
        let duration = Duration::from_millis(500);

        let handle = match routine {
            0 => engine.fade_in(&target, duration),
            1 => engine.fade_out(&target, duration),
            2 => engine.slide_in(&target, SlideDirection::Right, duration),
            _ => engine.slide_out(&target, SlideDirection::Up, duration),
        };
        for i in 1..=k {
            sched.run_frame(FRAME * i);
        }
        handle.cancel();
        let writes = el.write_count();
        drain(&sched, FRAME, 100);

        prop_assert_eq!(el.write_count(), writes);
        prop_assert!(sched.is_idle());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Idempotent removal
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_removal_counts_once(extra in 0usize..8, lifetime_ms in 0u64..2000) {
        let doc = MemoryDocument::new();
        let sched = FrameScheduler::new();
        let queue = NotificationQueue::with_defaults(Rc::new(doc), sched.clone());

        let id = queue.show("saved", NotificationKind::Success, Duration::from_millis(lifetime_ms));
        for _ in 0..=extra {
            queue.remove(id);
        }
        drain(&sched, Duration::from_millis(100), 100);

        let stats = queue.stats();
        prop_assert_eq!(stats.user_dismissed + stats.auto_expired, 1);
        prop_assert!(!queue.is_active(id));
    }
}
