//! Property-based invariant tests for easing curves and the frame scheduler.
//!
//! 1. Every curve stays inside [0, 1] for any finite input.
//! 2. Every curve is monotonically non-decreasing.
//! 3. Ease-out and ease-in are point reflections of each other.
//! 4. A frame task re-posting itself runs once per frame, never more.
//! 5. Timers always fire in deadline order regardless of post order.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use loury_core::{
    CancellationToken, EasingFn, FrameScheduler, Step, ease_in_cubic, ease_in_out_cubic,
    ease_out_cubic, linear,
};
use proptest::prelude::*;

const CURVES: [EasingFn; 4] = [linear, ease_in_cubic, ease_out_cubic, ease_in_out_cubic];

// ═════════════════════════════════════════════════════════════════════════
// 1. Output range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn curves_stay_in_unit_interval(t in -1.0e6f32..1.0e6f32) {
        for f in CURVES {
            let v = f(t);
            prop_assert!((0.0..=1.0).contains(&v), "f({}) = {} out of range", t, v);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn curves_are_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for f in CURVES {
            prop_assert!(f(lo) <= f(hi) + 1e-6, "f({}) > f({})", lo, hi);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Reflection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ease_out_reflects_ease_in(t in 0.0f32..=1.0) {
        let reflected = 1.0 - ease_in_cubic(1.0 - t);
        prop_assert!((ease_out_cubic(t) - reflected).abs() < 1e-5);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. One run per frame
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reposting_task_runs_once_per_frame(frames in 1usize..64, gap_ms in 0u64..50) {
        let sched = FrameScheduler::new();
        let runs = Rc::new(RefCell::new(0usize));
        let r = Rc::clone(&runs);
        sched.request_frame(&CancellationToken::new(), move |_| {
            *r.borrow_mut() += 1;
            Step::NextFrame
        });
        for i in 0..frames {
            sched.run_frame(Duration::from_millis(gap_ms * i as u64));
        }
        prop_assert_eq!(*runs.borrow(), frames);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Timer order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn timers_fire_sorted(delays in proptest::collection::vec(0u64..500, 1..32)) {
        let sched = FrameScheduler::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        for &d in &delays {
            let fired = Rc::clone(&fired);
            sched.set_timeout(Duration::from_millis(d), &CancellationToken::new(), move |_| {
                fired.borrow_mut().push(d);
                Step::Done
            });
        }
        sched.run_frame(Duration::from_millis(1000));
        let mut expected = delays.clone();
        expected.sort_unstable();
        prop_assert_eq!(&*fired.borrow(), &expected);
    }
}
