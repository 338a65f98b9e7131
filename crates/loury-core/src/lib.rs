#![forbid(unsafe_code)]

//! Core: frame scheduling, easing, and the host element contract.
//!
//! # Role in loury
//! `loury-core` is the bottom layer. It knows nothing about themes or
//! notifications; it only provides the pieces every visual behavior needs:
//!
//! - **FrameScheduler**: a single-threaded frame/timer queue that tasks
//!   re-post themselves to, replacing self-rescheduling frame closures.
//! - **Easing**: pure `f32 -> f32` curves used by transitions.
//! - **CancellationToken**: an opt-in stop signal for scheduled tasks.
//! - **Element / Document**: the traits through which every component
//!   touches the page, plus [`MemoryDocument`](memory::MemoryDocument) for
//!   headless hosts and tests.
//! - **UiEvent**: host-delivered input (clicks, keys, hover, scroll,
//!   intersection).
//!
//! # How it fits in the system
//! `loury-theme` and `loury-fx` build on these contracts; the `loury` facade
//! wires them into one explicitly constructed page context.

pub mod cancellation;
pub mod clock;
pub mod easing;
pub mod element;
pub mod event;
pub mod memory;
pub mod scheduler;

pub use cancellation::{CancellationSource, CancellationToken};
pub use clock::{DeterministicClock, FrameClock, MonotonicClock};
pub use easing::{EasingFn, ease_in_cubic, ease_in_out_cubic, ease_out_cubic, linear};
pub use element::{
    Axis, Display, Document, Element, ElementId, ElementRef, Elevation, Length, Rect, Transform,
};
pub use event::{Key, UiEvent};
pub use memory::{MemoryDocument, MemoryElement};
pub use scheduler::{FrameScheduler, SchedulerStats, Step, TaskId};
