#![forbid(unsafe_code)]

//! Pointer, scroll, and visibility effects on registered elements.
//!
//! Elements opt in explicitly; nothing is matched by selector. Events are
//! routed to the nearest registered element that contains the event target.
//!
//! | Effect | Trigger | Result |
//! |--------|---------|--------|
//! | reveal | intersection ratio ≥ threshold | `animate-fade-in`, then unobserved |
//! | parallax | scroll | `translateY(-(y * speed))px`, once per frame |
//! | hover lift | mouse over / out | `translateY(-4px)` + raised shadow / restored |
//! | ripple | click on button | `ripple` child, removed after 600 ms |
//! | loading | click on enabled button | `loading` class for 2000 ms |

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use loury_core::{
    CancellationToken, Document, Element, ElementId, ElementRef, Elevation, FrameScheduler,
    Rect, Step, Transform, UiEvent,
};
use tracing::{debug, trace};

const REVEAL_CLASS: &str = "animate-fade-in";
const RIPPLE_CLASS: &str = "ripple";
const LOADING_CLASS: &str = "loading";

/// Tunables for [`Interactions`].
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Minimum visible ratio that triggers a reveal.
    pub reveal_threshold: f32,
    /// Parallax speed for elements without a `data-speed` attribute.
    pub parallax_speed: f32,
    /// Hover lift distance in pixels.
    pub hover_lift_px: f32,
    /// Lifetime of a ripple element.
    pub ripple_duration: Duration,
    /// How long a clicked button shows its loading state.
    pub loading_duration: Duration,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.1,
            parallax_speed: 0.5,
            hover_lift_px: 4.0,
            ripple_duration: Duration::from_millis(600),
            loading_duration: Duration::from_millis(2000),
        }
    }
}

#[derive(Default)]
struct ParallaxState {
    layers: Vec<(ElementRef, f32)>,
    latest_y: f32,
    pending: bool,
}

/// Registry and event router for the page's decorative effects.
pub struct Interactions {
    document: Rc<dyn Document>,
    scheduler: FrameScheduler,
    config: InteractionConfig,
    reveal: Vec<ElementRef>,
    hover: Vec<ElementRef>,
    buttons: Vec<ElementRef>,
    parallax: Rc<RefCell<ParallaxState>>,
    updates: Rc<Cell<u64>>,
}

impl Interactions {
    /// Create an empty registry.
    pub fn new(
        document: Rc<dyn Document>,
        scheduler: FrameScheduler,
        config: InteractionConfig,
    ) -> Self {
        Self {
            document,
            scheduler,
            config,
            reveal: Vec::new(),
            hover: Vec::new(),
            buttons: Vec::new(),
            parallax: Rc::new(RefCell::new(ParallaxState::default())),
            updates: Rc::new(Cell::new(0)),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Reveal `el` the first time it becomes visible enough.
    pub fn observe_reveal(&mut self, el: &ElementRef) {
        if !self.reveal.iter().any(|r| r.id() == el.id()) {
            self.reveal.push(Rc::clone(el));
        }
    }

    /// Whether `el` is still waiting to be revealed.
    #[must_use]
    pub fn is_observing(&self, el: ElementId) -> bool {
        self.reveal.iter().any(|r| r.id() == el)
    }

    /// Move `el` against the scroll direction.
    ///
    /// The speed comes from the element's `data-speed` attribute when it
    /// parses, else from the configured default.
    pub fn register_parallax(&mut self, el: &ElementRef) {
        let speed = el
            .attribute("data-speed")
            .and_then(|s| s.trim().parse::<f32>().ok())
            .filter(|s| s.is_finite())
            .unwrap_or(self.config.parallax_speed);
        let mut parallax = self.parallax.borrow_mut();
        parallax.layers.retain(|(layer, _)| layer.id() != el.id());
        parallax.layers.push((Rc::clone(el), speed));
    }

    /// Lift `el` while the pointer is over it.
    pub fn register_hover(&mut self, el: &ElementRef) {
        if !self.hover.iter().any(|h| h.id() == el.id()) {
            self.hover.push(Rc::clone(el));
        }
    }

    /// Give `el` click ripples and a temporary loading state.
    pub fn register_button(&mut self, el: &ElementRef) {
        if !self.buttons.iter().any(|b| b.id() == el.id()) {
            self.buttons.push(Rc::clone(el));
        }
    }

    /// Number of parallax updates applied so far.
    #[must_use]
    pub fn parallax_updates(&self) -> u64 {
        self.updates.get()
    }

    /// Route one host event. Returns `true` if any effect reacted.
    pub fn handle_event(&mut self, event: &UiEvent) -> bool {
        match event {
            UiEvent::Intersection { target, ratio } => self.on_intersection(*target, *ratio),
            UiEvent::Scroll { y } => self.on_scroll(*y),
            UiEvent::MouseOver { target } => self.on_hover(*target, true),
            UiEvent::MouseOut { target } => self.on_hover(*target, false),
            UiEvent::Click { target, x, y } => self.on_click(*target, *x, *y),
            UiEvent::KeyDown { .. } => false,
        }
    }

    fn on_intersection(&mut self, target: ElementId, ratio: f32) -> bool {
        if ratio <= 0.0 || ratio < self.config.reveal_threshold {
            return false;
        }
        let Some(idx) = self.reveal.iter().position(|el| el.id() == target) else {
            return false;
        };
        let el = self.reveal.swap_remove(idx);
        el.add_class(REVEAL_CLASS);
        trace!(message = "interaction.reveal", element = %target, ratio = f64::from(ratio));
        true
    }

    fn on_scroll(&mut self, y: f32) -> bool {
        let mut parallax = self.parallax.borrow_mut();
        if parallax.layers.is_empty() {
            return false;
        }
        parallax.latest_y = y;
        if parallax.pending {
            return true;
        }
        parallax.pending = true;
        drop(parallax);

        let state = Rc::clone(&self.parallax);
        let updates = Rc::clone(&self.updates);
        self.scheduler
            .request_frame(&CancellationToken::new(), move |_| {
                let mut parallax = state.borrow_mut();
                parallax.pending = false;
                let y = parallax.latest_y;
                for (el, speed) in &parallax.layers {
                    el.set_transform(Transform::translate_y_px(-(y * speed)));
                }
                updates.set(updates.get() + 1);
                Step::Done
            });
        true
    }

    fn on_hover(&mut self, target: ElementId, entering: bool) -> bool {
        let Some(card) = closest(&self.hover, target) else {
            return false;
        };
        if entering {
            card.set_transform(Transform::translate_y_px(-self.config.hover_lift_px));
            card.set_elevation(Elevation::Raised);
        } else {
            card.set_transform(Transform::None);
            card.set_elevation(Elevation::Flat);
        }
        true
    }

    fn on_click(&mut self, target: ElementId, x: f32, y: f32) -> bool {
        let Some(button) = closest(&self.buttons, target) else {
            return false;
        };
        self.spawn_ripple(&button, x, y);
        if button.is_disabled() {
            trace!(message = "interaction.loading_skipped", element = %button.id());
        } else {
            self.start_loading(&button);
        }
        true
    }

    fn spawn_ripple(&self, button: &ElementRef, x: f32, y: f32) {
        let rect = button.bounds();
        let size = rect.width.max(rect.height);
        let ripple = self.document.create_element(RIPPLE_CLASS);
        ripple.set_geometry(Rect::new(
            x - rect.x - size / 2.0,
            y - rect.y - size / 2.0,
            size,
            size,
        ));
        button.append_child(&ripple);

        let id = ripple.id();
        self.scheduler.set_timeout(
            self.config.ripple_duration,
            &CancellationToken::new(),
            move |_| {
                ripple.remove();
                Step::Done
            },
        );
        debug!(message = "interaction.ripple", button = %button.id(), ripple = %id, size = f64::from(size));
    }

    fn start_loading(&self, button: &ElementRef) {
        button.add_class(LOADING_CLASS);
        let el = Rc::clone(button);
        self.scheduler.set_timeout(
            self.config.loading_duration,
            &CancellationToken::new(),
            move |_| {
                el.remove_class(LOADING_CLASS);
                Step::Done
            },
        );
    }
}

impl fmt::Debug for Interactions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interactions")
            .field("reveal", &self.reveal.len())
            .field("hover", &self.hover.len())
            .field("buttons", &self.buttons.len())
            .field("parallax", &self.parallax.borrow().layers.len())
            .field("config", &self.config)
            .finish()
    }
}

/// The innermost registered element containing `target`.
fn closest(candidates: &[ElementRef], target: ElementId) -> Option<ElementRef> {
    candidates
        .iter()
        .filter(|el| el.contains(target))
        .fold(None::<&ElementRef>, |best, el| match best {
            Some(b) if !b.contains(el.id()) => Some(b),
            _ => Some(el),
        })
        .map(Rc::clone)
}
