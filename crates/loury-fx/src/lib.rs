#![forbid(unsafe_code)]

//! Effects: transitions, toast notifications, and pointer interactions.
//!
//! # Key Components
//!
//! - [`InterpolationEngine`] - fade, slide, counter, and typing transitions
//!   posted as frame tasks
//! - [`NotificationQueue`] - stacked toast cards with auto-dismiss
//! - [`Interactions`] - reveal-on-scroll, parallax, hover lift, ripples,
//!   and loading buttons
//!
//! # Role in loury
//! Everything here is multi-step visual work, so every component takes a
//! [`FrameScheduler`](loury_core::FrameScheduler) handle and never blocks.

pub mod interaction;
pub mod interpolate;
pub mod notification;

pub use interaction::{InteractionConfig, Interactions};
pub use interpolate::{
    InterpolationEngine, SlideDirection, TransitionDefaults, TransitionHandle, progress_at,
};
pub use notification::{
    NotificationId, NotificationKind, NotificationQueue, QueueConfig, QueueStats,
};
