#![forbid(unsafe_code)]

//! Single-threaded frame and timer queue.
//!
//! Multi-step visual work (a fade, a typing reveal, an auto-dismiss) is a
//! task posted to the [`FrameScheduler`]. Each time the task runs it returns a
//! [`Step`] saying whether to run again on the next frame, after a delay, or
//! never. There are no self-rescheduling closures and no blocking waits.
//!
//! # Frame order
//!
//! [`run_frame`](FrameScheduler::run_frame) does two passes:
//!
//! 1. Every timer already due at `now` fires, earliest first (ties in post
//!    order).
//! 2. Every frame task queued before the frame started runs once.
//!
//! Work posted while a frame runs (including re-posts) lands in a later
//! frame, so a task returning `Step::After(Duration::ZERO)` cannot spin.
//!
//! # Time
//!
//! Without a clock, time only moves when the host runs a frame, so work
//! posted after the frame loop was paused is measured from the last frame.
//! [`FrameScheduler::with_clock`] attaches a [`FrameClock`] that is read
//! whenever work is posted; delays and transition start times then count
//! from the moment of the call even after an idle gap.
//!
//! # Invariants
//!
//! 1. `now()` never decreases; an earlier `run_frame` timestamp is treated
//!    as the current time.
//! 2. A task whose token is cancelled is dropped before it runs again.
//! 3. The scheduler handle can be cloned freely and posted to from inside a
//!    running task.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::cancellation::CancellationToken;
use crate::clock::FrameClock;

/// What a task wants after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Run again on the next display frame.
    NextFrame,
    /// Run again once the delay has elapsed.
    After(Duration),
    /// Finished; drop the task.
    Done,
}

/// Identifier assigned to every posted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

type TaskFn = Box<dyn FnMut(Duration) -> Step>;

struct Task {
    id: TaskId,
    token: CancellationToken,
    run: TaskFn,
}

struct Timer {
    due: Duration,
    seq: u64,
    task: Task,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    // Reversed so the max-heap pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Counters for monitoring and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Frames run.
    pub frames: u64,
    /// Task invocations (frame tasks and timers).
    pub runs: u64,
    /// Tasks dropped because their token was cancelled.
    pub cancelled: u64,
    /// Tasks that returned [`Step::Done`].
    pub completed: u64,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    clock: Option<Rc<dyn FrameClock>>,
    frame_queue: Vec<Task>,
    timers: BinaryHeap<Timer>,
    next_id: u64,
    next_seq: u64,
    stats: SchedulerStats,
}

impl SchedulerState {
    fn next_task_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Latest of the last frame time and the attached clock.
    fn current_time(&self) -> Duration {
        match &self.clock {
            Some(clock) => self.now.max(clock.now_mono()),
            None => self.now,
        }
    }

    fn push_timer(&mut self, due: Duration, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer { due, seq, task });
    }
}

/// Cloneable handle to a frame/timer queue.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerState>>,
}

impl FrameScheduler {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scheduler that reads `clock` whenever work is posted.
    #[must_use]
    pub fn with_clock(clock: Rc<dyn FrameClock>) -> Self {
        let scheduler = Self::new();
        scheduler.inner.borrow_mut().clock = Some(clock);
        scheduler
    }

    /// Whether a clock is attached.
    #[must_use]
    pub fn has_clock(&self) -> bool {
        self.inner.borrow().clock.is_some()
    }

    /// Current time: the attached clock's reading, or the most recent frame
    /// timestamp when no clock is attached. Never earlier than the last frame.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().current_time()
    }

    /// Queue `task` for the next frame.
    pub fn request_frame<F>(&self, token: &CancellationToken, task: F) -> TaskId
    where
        F: FnMut(Duration) -> Step + 'static,
    {
        let mut state = self.inner.borrow_mut();
        let id = state.next_task_id();
        state.frame_queue.push(Task {
            id,
            token: token.clone(),
            run: Box::new(task),
        });
        id
    }

    /// Queue `task` to run once `delay` has elapsed from [`now`](Self::now).
    pub fn set_timeout<F>(&self, delay: Duration, token: &CancellationToken, task: F) -> TaskId
    where
        F: FnMut(Duration) -> Step + 'static,
    {
        let mut state = self.inner.borrow_mut();
        let id = state.next_task_id();
        let due = state.current_time().saturating_add(delay);
        state.push_timer(
            due,
            Task {
                id,
                token: token.clone(),
                run: Box::new(task),
            },
        );
        id
    }

    /// Run one frame at the host-supplied timestamp.
    ///
    /// Returns the number of task invocations performed.
    pub fn run_frame(&self, now: Duration) -> usize {
        let (now, due, frame) = {
            let mut state = self.inner.borrow_mut();
            state.now = state.now.max(now);
            state.stats.frames += 1;
            let now = state.now;
            let mut due = Vec::new();
            while state.timers.peek().is_some_and(|t| t.due <= now) {
                if let Some(timer) = state.timers.pop() {
                    due.push(timer.task);
                }
            }
            let frame = std::mem::take(&mut state.frame_queue);
            (now, due, frame)
        };

        trace!(
            message = "scheduler.frame",
            now_ms = now.as_millis() as u64,
            timers = due.len(),
            frame_tasks = frame.len()
        );

        let mut ran = 0;
        for task in due.into_iter().chain(frame) {
            if self.run_task(now, task) {
                ran += 1;
            }
        }
        ran
    }

    /// Sample `clock` and run one frame.
    pub fn pump(&self, clock: &impl FrameClock) -> usize {
        self.run_frame(clock.now_mono())
    }

    fn run_task(&self, now: Duration, mut task: Task) -> bool {
        if task.token.is_cancelled() {
            self.inner.borrow_mut().stats.cancelled += 1;
            trace!(message = "scheduler.cancelled", task = task.id.0);
            return false;
        }

        // The borrow is released here, so the task may post new work.
        let step = (task.run)(now);

        let mut state = self.inner.borrow_mut();
        state.stats.runs += 1;
        match step {
            Step::NextFrame => state.frame_queue.push(task),
            Step::After(delay) => {
                let due = now.saturating_add(delay);
                state.push_timer(due, task);
            }
            Step::Done => state.stats.completed += 1,
        }
        true
    }

    /// Whether a frame task is waiting for the next frame.
    #[must_use]
    pub fn has_frame_work(&self) -> bool {
        !self.inner.borrow().frame_queue.is_empty()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_timer_due(&self) -> Option<Duration> {
        self.inner.borrow().timers.peek().map(|t| t.due)
    }

    /// Whether nothing at all is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.inner.borrow();
        state.frame_queue.is_empty() && state.timers.is_empty()
    }

    /// Snapshot of the scheduler counters.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.inner.borrow().stats.clone()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("FrameScheduler")
            .field("now", &state.now)
            .field("clock", &state.clock.is_some())
            .field("frame_tasks", &state.frame_queue.len())
            .field("timers", &state.timers.len())
            .finish()
    }
}
