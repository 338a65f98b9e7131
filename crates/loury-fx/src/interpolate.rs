#![forbid(unsafe_code)]

//! Frame-driven property transitions.
//!
//! Each routine samples the scheduler clock once when called and posts a
//! frame task. On every frame the task computes
//!
//! ```text
//! progress = clamp((now - start) / duration, 0, 1)     // duration 0 => 1
//! ```
//!
//! eases it, writes the value, and re-posts while `progress < 1`. The frame
//! that reaches 1 writes the terminal state and ends the task.
//!
//! | Routine | Writes | Curve | Terminal state |
//! |---------|--------|-------|----------------|
//! | [`fade_in`](InterpolationEngine::fade_in) | opacity 0→1 | linear | opacity 1, visible |
//! | [`fade_out`](InterpolationEngine::fade_out) | opacity current→0 | linear | opacity 0, hidden |
//! | [`slide_in`](InterpolationEngine::slide_in) | offset ±100%→0, opacity 0→1 | ease-out cubic | offset 0, opacity 1 |
//! | [`slide_out`](InterpolationEngine::slide_out) | offset 0→±100%, opacity 1→0 | ease-in cubic | hidden |
//! | [`animate_counter`](InterpolationEngine::animate_counter) | integer text | ease-out cubic | exact end value |
//! | [`type_text`](InterpolationEngine::type_text) | one char per step | none | full text |
//!
//! Two transitions on the same property are not arbitrated; the last write in
//! a frame wins.
//!
//! # Cancellation
//!
//! Every routine returns a [`TransitionHandle`]. Dropping it leaves the
//! transition running. [`TransitionHandle::cancel`] stops it before its next
//! frame, without writing a terminal state.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use loury_core::{
    Axis, CancellationToken, Display, Element, ElementRef, FrameScheduler, Step, TaskId, Transform,
    ease_in_cubic, ease_out_cubic, linear,
};
use tracing::{debug, trace};

/// Default durations for callers that do not pick their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDefaults {
    /// Fade in/out.
    pub fade: Duration,
    /// Slide in/out.
    pub slide: Duration,
    /// Counter roll-up.
    pub counter: Duration,
    /// Delay between typed characters.
    pub type_speed: Duration,
}

impl Default for TransitionDefaults {
    fn default() -> Self {
        Self {
            fade: Duration::from_millis(300),
            slide: Duration::from_millis(300),
            counter: Duration::from_millis(2000),
            type_speed: Duration::from_millis(50),
        }
    }
}

/// Edge a slide starts from (or leaves through).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl SlideDirection {
    /// Parse `"left"`, `"right"`, `"up"` or `"down"`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    /// Translation axis.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::X,
            Self::Up | Self::Down => Axis::Y,
        }
    }

    /// Off-screen offset in percent of the element's size.
    #[must_use]
    pub const fn offscreen_percent(self) -> f32 {
        match self {
            Self::Left | Self::Up => -100.0,
            Self::Right | Self::Down => 100.0,
        }
    }
}

/// Control handle for one running transition.
#[derive(Clone)]
pub struct TransitionHandle {
    token: CancellationToken,
    task: Option<TaskId>,
    finished: Rc<Cell<bool>>,
}

impl TransitionHandle {
    fn finished_now(token: CancellationToken) -> Self {
        Self {
            token,
            task: None,
            finished: Rc::new(Cell::new(true)),
        }
    }

    /// Stop the transition before its next frame.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the transition ran to its terminal state (or had no steps).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }

    /// Scheduler task driving the transition, if any was posted.
    #[must_use]
    pub fn task_id(&self) -> Option<TaskId> {
        self.task
    }

    /// The cancellation token shared with the scheduler task.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl fmt::Debug for TransitionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionHandle")
            .field("task", &self.task)
            .field("cancelled", &self.is_cancelled())
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Normalized progress at `now` for a transition that started at `start`.
#[must_use]
pub fn progress_at(start: Duration, duration: Duration, now: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Starts transitions on a shared [`FrameScheduler`].
#[derive(Debug, Clone)]
pub struct InterpolationEngine {
    scheduler: FrameScheduler,
    defaults: TransitionDefaults,
}

impl InterpolationEngine {
    /// Engine with the stock durations.
    #[must_use]
    pub fn new(scheduler: FrameScheduler) -> Self {
        Self::with_defaults(scheduler, TransitionDefaults::default())
    }

    /// Engine with custom default durations.
    #[must_use]
    pub fn with_defaults(scheduler: FrameScheduler, defaults: TransitionDefaults) -> Self {
        Self {
            scheduler,
            defaults,
        }
    }

    /// Configured default durations.
    #[must_use]
    pub fn defaults(&self) -> &TransitionDefaults {
        &self.defaults
    }

    /// The scheduler transitions are posted to.
    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Make `target` visible and raise its opacity from 0 to 1.
    pub fn fade_in(&self, target: &ElementRef, duration: Duration) -> TransitionHandle {
        target.set_opacity(0.0);
        target.set_display(Display::Block);
        self.animate("fade_in", target, duration, |el, p| {
            el.set_opacity(linear(p));
        })
    }

    /// Lower opacity from its current value to 0, then hide `target`.
    pub fn fade_out(&self, target: &ElementRef, duration: Duration) -> TransitionHandle {
        let initial = target.opacity();
        self.animate("fade_out", target, duration, move |el, p| {
            el.set_opacity(initial * (1.0 - linear(p)));
            if p >= 1.0 {
                el.set_display(Display::None);
            }
        })
    }

    /// Move `target` in from off-screen while fading it in.
    pub fn slide_in(
        &self,
        target: &ElementRef,
        direction: SlideDirection,
        duration: Duration,
    ) -> TransitionHandle {
        let axis = direction.axis();
        let from = direction.offscreen_percent();
        target.set_transform(Transform::translate_percent(axis, from));
        target.set_opacity(0.0);
        target.set_display(Display::Block);
        self.animate("slide_in", target, duration, move |el, p| {
            if p >= 1.0 {
                el.set_transform(Transform::translate_percent(axis, 0.0));
                el.set_opacity(1.0);
                return;
            }
            let eased = ease_out_cubic(p);
            el.set_transform(Transform::translate_percent(axis, from * (1.0 - eased)));
            el.set_opacity(eased);
        })
    }

    /// Move `target` off-screen while fading it out, then hide it.
    pub fn slide_out(
        &self,
        target: &ElementRef,
        direction: SlideDirection,
        duration: Duration,
    ) -> TransitionHandle {
        let axis = direction.axis();
        let to = direction.offscreen_percent();
        self.animate("slide_out", target, duration, move |el, p| {
            let eased = ease_in_cubic(p);
            el.set_transform(Transform::translate_percent(axis, to * eased));
            el.set_opacity(1.0 - eased);
            if p >= 1.0 {
                el.set_display(Display::None);
            }
        })
    }

    /// Roll the text of `target` from `start` to `end`.
    ///
    /// Intermediate values are floored; the last frame writes `end` exactly.
    pub fn animate_counter(
        &self,
        target: &ElementRef,
        start: i64,
        end: i64,
        duration: Duration,
    ) -> TransitionHandle {
        self.animate("animate_counter", target, duration, move |el, p| {
            let value = if p >= 1.0 {
                end
            } else {
                // Span in f64: `end - start` overflows i64 for wide ranges.
                let span = end as f64 - start as f64;
                (start as f64 + span * f64::from(ease_out_cubic(p))).floor() as i64
            };
            el.set_text(&value.to_string());
        })
    }

    /// Clear `target` and reveal `text` one character per `speed`.
    ///
    /// The first character lands on the next frame. Empty text posts no work.
    pub fn type_text(&self, target: &ElementRef, text: &str, speed: Duration) -> TransitionHandle {
        target.set_text("");
        let token = CancellationToken::new();
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return TransitionHandle::finished_now(token);
        }

        let finished = Rc::new(Cell::new(false));
        let done = Rc::clone(&finished);
        let el = Rc::clone(target);
        let mut next = 0usize;
        let task = self.scheduler.set_timeout(Duration::ZERO, &token, move |_| {
            if !el.is_connected() {
                trace!(message = "transition.detached", routine = "type_text", element = %el.id());
                return Step::Done;
            }
            el.push_char(chars[next]);
            next += 1;
            if next < chars.len() {
                Step::After(speed)
            } else {
                done.set(true);
                Step::Done
            }
        });

        debug!(
            message = "transition.start",
            routine = "type_text",
            element = %target.id(),
            chars = text.chars().count(),
            speed_ms = speed.as_millis() as u64
        );
        TransitionHandle {
            token,
            task: Some(task),
            finished,
        }
    }

    fn animate<F>(
        &self,
        routine: &'static str,
        target: &ElementRef,
        duration: Duration,
        mut write: F,
    ) -> TransitionHandle
    where
        F: FnMut(&dyn Element, f32) + 'static,
    {
        let token = CancellationToken::new();
        let finished = Rc::new(Cell::new(false));
        let done = Rc::clone(&finished);
        let el = Rc::clone(target);
        let start = self.scheduler.now();

        let task = self.scheduler.request_frame(&token, move |now| {
            if !el.is_connected() {
                trace!(message = "transition.detached", routine, element = %el.id());
                return Step::Done;
            }
            let progress = progress_at(start, duration, now);
            write(el.as_ref(), progress);
            if progress < 1.0 {
                Step::NextFrame
            } else {
                done.set(true);
                trace!(message = "transition.finish", routine, element = %el.id());
                Step::Done
            }
        });

        debug!(
            message = "transition.start",
            routine,
            element = %target.id(),
            duration_ms = duration.as_millis() as u64
        );
        TransitionHandle {
            token,
            task: Some(task),
            finished,
        }
    }
}
