#![forbid(unsafe_code)]

//! Toast notifications with timed auto-dismiss.
//!
//! Cards stack inside one fixed container that is created the first time a
//! notification is shown. Each card is scheduled for removal when it is
//! shown; the user can close it earlier.
//!
//! # Lifecycle
//!
//! ```text
//!   show ──▶ Active ──remove / timer──▶ Exiting ──exit delay──▶ detached
//!                                          │
//!                        remove / timer ───┘ (ignored)
//! ```
//!
//! Removal is idempotent: the first call starts the exit animation, every
//! later call for the same card (including the auto-dismiss timer after a
//! manual close) is a no-op. A card counts as active until it is detached.
//!
//! Messages are written as text content, never parsed as markup.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use loury_core::{
    CancellationToken, Document, Element, ElementId, ElementRef, FrameScheduler, Step,
};
use tracing::{debug, trace};

const CONTAINER_CLASS: &str = "notification-container";
const EXIT_CLASS: &str = "slide-out-right";

/// Severity of a notification; selects its class and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Class added next to `notification`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Heading shown on the card.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Information",
        }
    }

    /// Parse a kind name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// Unique identifier for a shown notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

/// Configuration for the notification queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Auto-dismiss delay used by the kind shortcuts.
    pub default_duration: Duration,
    /// Time between the exit class and detaching the card.
    pub exit_delay: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            default_duration: Duration::from_millis(5000),
            exit_delay: Duration::from_millis(300),
        }
    }
}

impl QueueConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set default duration for auto-dismiss.
    #[must_use]
    pub fn default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Set the exit animation delay.
    #[must_use]
    pub fn exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = delay;
        self
    }
}

/// Queue statistics for monitoring and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Notifications shown.
    pub shown: u64,
    /// Notifications closed by the user or by [`NotificationQueue::remove`].
    pub user_dismissed: u64,
    /// Notifications removed by their auto-dismiss timer.
    pub auto_expired: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    User,
    Expired,
}

struct Card {
    id: NotificationId,
    element: ElementRef,
    close: ElementRef,
    exiting: bool,
}

struct QueueState {
    document: Rc<dyn Document>,
    config: QueueConfig,
    container: Option<ElementRef>,
    cards: Vec<Card>,
    next_id: u64,
    stats: QueueStats,
}

impl QueueState {
    fn container(&mut self) -> ElementRef {
        if let Some(container) = &self.container {
            return Rc::clone(container);
        }
        let container = self.document.create_element(CONTAINER_CLASS);
        self.document.body().append_child(&container);
        trace!(message = "notification.container", element = %container.id());
        self.container = Some(Rc::clone(&container));
        container
    }

    /// Mark a card as exiting. Returns the exit delay if this call started it.
    fn begin_exit(&mut self, id: NotificationId, cause: Removal) -> Option<Duration> {
        let card = self.cards.iter_mut().find(|c| c.id == id)?;
        if card.exiting {
            return None;
        }
        card.exiting = true;
        card.element.add_class(EXIT_CLASS);
        match cause {
            Removal::User => self.stats.user_dismissed += 1,
            Removal::Expired => self.stats.auto_expired += 1,
        }
        Some(self.config.exit_delay)
    }

    fn detach(&mut self, id: NotificationId) {
        if let Some(idx) = self.cards.iter().position(|c| c.id == id) {
            let card = self.cards.remove(idx);
            card.element.remove();
            trace!(message = "notification.detach", id = id.0);
        }
    }
}

/// Stack of toast cards driven by a [`FrameScheduler`].
///
/// Cloning yields another handle to the same queue. Scheduled timers hold
/// only a weak reference, so dropping every handle lets pending timers fire
/// as no-ops.
#[derive(Clone)]
pub struct NotificationQueue {
    state: Rc<RefCell<QueueState>>,
    scheduler: FrameScheduler,
}

impl NotificationQueue {
    /// Create a queue that builds cards in `document`.
    pub fn new(document: Rc<dyn Document>, scheduler: FrameScheduler, config: QueueConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(QueueState {
                document,
                config,
                container: None,
                cards: Vec::new(),
                next_id: 1,
                stats: QueueStats::default(),
            })),
            scheduler,
        }
    }

    /// Create a queue with default configuration.
    pub fn with_defaults(document: Rc<dyn Document>, scheduler: FrameScheduler) -> Self {
        Self::new(document, scheduler, QueueConfig::default())
    }

    /// Show a card and schedule its removal after `duration`.
    pub fn show(&self, message: &str, kind: NotificationKind, duration: Duration) -> NotificationId {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = NotificationId(state.next_id);
            state.next_id += 1;

            let container = state.container();
            let (element, close) = build_card(state.document.as_ref(), message, kind);
            container.append_child(&element);
            state.cards.push(Card {
                id,
                element,
                close,
                exiting: false,
            });
            state.stats.shown += 1;
            id
        };

        let weak = Rc::downgrade(&self.state);
        let scheduler = self.scheduler.clone();
        self.scheduler
            .set_timeout(duration, &CancellationToken::new(), move |_| {
                begin_removal(&weak, &scheduler, id, Removal::Expired);
                Step::Done
            });

        debug!(
            message = "notification.show",
            id = id.0,
            kind = kind.as_str(),
            duration_ms = duration.as_millis() as u64
        );
        id
    }

    /// Show with the configured default duration.
    pub fn show_default(&self, message: &str, kind: NotificationKind) -> NotificationId {
        let duration = self.state.borrow().config.default_duration;
        self.show(message, kind, duration)
    }

    /// Show a success card.
    pub fn success(&self, message: &str) -> NotificationId {
        self.show_default(message, NotificationKind::Success)
    }

    /// Show an error card.
    pub fn error(&self, message: &str) -> NotificationId {
        self.show_default(message, NotificationKind::Error)
    }

    /// Show a warning card.
    pub fn warning(&self, message: &str) -> NotificationId {
        self.show_default(message, NotificationKind::Warning)
    }

    /// Show an info card.
    pub fn info(&self, message: &str) -> NotificationId {
        self.show_default(message, NotificationKind::Info)
    }

    /// Show a success card that stays for `duration`.
    pub fn success_for(&self, message: &str, duration: Duration) -> NotificationId {
        self.show(message, NotificationKind::Success, duration)
    }

    /// Show an error card that stays for `duration`.
    pub fn error_for(&self, message: &str, duration: Duration) -> NotificationId {
        self.show(message, NotificationKind::Error, duration)
    }

    /// Show a warning card that stays for `duration`.
    pub fn warning_for(&self, message: &str, duration: Duration) -> NotificationId {
        self.show(message, NotificationKind::Warning, duration)
    }

    /// Show an info card that stays for `duration`.
    pub fn info_for(&self, message: &str, duration: Duration) -> NotificationId {
        self.show(message, NotificationKind::Info, duration)
    }

    /// Start removing a card. Returns `false` if it is unknown or already
    /// exiting.
    pub fn remove(&self, id: NotificationId) -> bool {
        begin_removal(&Rc::downgrade(&self.state), &self.scheduler, id, Removal::User)
    }

    /// Start removing every active card.
    pub fn dismiss_all(&self) {
        let ids: Vec<_> = self.state.borrow().cards.iter().map(|c| c.id).collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// React to a click. Clicking a card's close button removes that card.
    pub fn handle_click(&self, target: ElementId) -> bool {
        let hit = self
            .state
            .borrow()
            .cards
            .iter()
            .find(|c| c.close.contains(target))
            .map(|c| c.id);
        match hit {
            Some(id) => self.remove(id),
            None => false,
        }
    }

    /// Cards shown and not yet detached.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.state.borrow().cards.len()
    }

    /// Whether `id` is shown and not yet detached.
    #[must_use]
    pub fn is_active(&self, id: NotificationId) -> bool {
        self.state.borrow().cards.iter().any(|c| c.id == id)
    }

    /// Card element for `id`, while it is active.
    #[must_use]
    pub fn card_element(&self, id: NotificationId) -> Option<ElementRef> {
        self.state
            .borrow()
            .cards
            .iter()
            .find(|c| c.id == id)
            .map(|c| Rc::clone(&c.element))
    }

    /// Close button of `id`, while it is active.
    #[must_use]
    pub fn close_button(&self, id: NotificationId) -> Option<ElementRef> {
        self.state
            .borrow()
            .cards
            .iter()
            .find(|c| c.id == id)
            .map(|c| Rc::clone(&c.close))
    }

    /// The shared container, once the first card was shown.
    #[must_use]
    pub fn container(&self) -> Option<ElementRef> {
        self.state.borrow().container.clone()
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.state.borrow().stats.clone()
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> QueueConfig {
        self.state.borrow().config.clone()
    }
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("NotificationQueue")
            .field("active", &state.cards.len())
            .field("stats", &state.stats)
            .field("config", &state.config)
            .finish()
    }
}

fn begin_removal(
    state: &Weak<RefCell<QueueState>>,
    scheduler: &FrameScheduler,
    id: NotificationId,
    cause: Removal,
) -> bool {
    let Some(strong) = state.upgrade() else {
        return false;
    };
    let Some(delay) = strong.borrow_mut().begin_exit(id, cause) else {
        trace!(message = "notification.remove_ignored", id = id.0);
        return false;
    };

    let weak = Weak::clone(state);
    scheduler.set_timeout(delay, &CancellationToken::new(), move |_| {
        if let Some(state) = weak.upgrade() {
            state.borrow_mut().detach(id);
        }
        Step::Done
    });
    debug!(message = "notification.remove", id = id.0, cause = ?cause);
    true
}

fn build_card(
    document: &dyn Document,
    message: &str,
    kind: NotificationKind,
) -> (ElementRef, ElementRef) {
    let card = document.create_element(&format!("notification {}", kind.as_str()));

    let header = document.create_element("notification-header");
    let title = document.create_element("notification-title");
    title.set_text(kind.title());
    let close = document.create_element("notification-close");
    close.set_text("\u{00D7}");
    header.append_child(&title);
    header.append_child(&close);

    let body = document.create_element("notification-message");
    body.set_text(message);

    card.append_child(&header);
    card.append_child(&body);
    (card, close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loury_core::{DeterministicClock, MemoryDocument};
    use pretty_assertions::assert_eq;

    fn setup() -> (MemoryDocument, FrameScheduler, NotificationQueue) {
        let doc = MemoryDocument::new();
        let sched = FrameScheduler::new();
        let queue = NotificationQueue::with_defaults(Rc::new(doc.clone()), sched.clone());
        (doc, sched, queue)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn kinds_have_titles() {
        assert_eq!(NotificationKind::Info.title(), "Information");
        assert_eq!(NotificationKind::parse("warning"), Some(NotificationKind::Warning));
        assert_eq!(NotificationKind::parse("fatal"), None);
    }

    #[test]
    fn show_builds_card_in_lazy_container() {
        let (doc, _sched, queue) = setup();
        assert!(queue.container().is_none());

        let id = queue.show("Saved <b>", NotificationKind::Success, ms(1000));
        let container = doc.query(CONTAINER_CLASS).unwrap();
        assert!(container.is_connected());

        let card = doc.query("notification").unwrap();
        assert!(card.has_class("success"));
        assert_eq!(card.parent_id(), Some(container.id()));
        assert_eq!(doc.query("notification-title").unwrap().text(), "Success");
        assert_eq!(doc.query("notification-message").unwrap().text(), "Saved <b>");
        assert!(queue.close_button(id).is_some());
        assert!(queue.is_active(id));
    }

    #[test]
    fn container_is_created_once() {
        let (doc, _sched, queue) = setup();
        queue.info("one");
        queue.warning("two");
        queue.error("three");
        assert_eq!(doc.query_all(CONTAINER_CLASS).len(), 1);
        assert_eq!(queue.active_count(), 3);
        assert_eq!(queue.stats().shown, 3);
    }

    #[test]
    fn ids_increase() {
        let (_doc, _sched, queue) = setup();
        let a = queue.info("a");
        let b = queue.info("b");
        assert!(b > a);
    }

    #[test]
    fn auto_dismiss_after_duration_then_exit_delay() {
        let (doc, sched, queue) = setup();
        let id = queue.show("hello", NotificationKind::Info, ms(1000));
        let card = queue.card_element(id).unwrap();

        sched.run_frame(ms(999));
        assert!(!card.has_class(EXIT_CLASS));

        sched.run_frame(ms(1000));
        assert!(card.has_class(EXIT_CLASS));
        assert!(queue.is_active(id));

        sched.run_frame(ms(1299));
        assert!(queue.is_active(id));
        sched.run_frame(ms(1300));
        assert!(!queue.is_active(id));
        assert!(!card.is_connected());
        assert!(doc.query("notification").is_none());
        assert_eq!(queue.stats().auto_expired, 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let (_doc, sched, queue) = setup();
        let id = queue.show("x", NotificationKind::Error, ms(5000));

        assert!(queue.remove(id));
        assert!(!queue.remove(id));
        sched.run_frame(ms(300));
        assert!(!queue.is_active(id));
        assert!(!queue.remove(id));
        assert_eq!(queue.stats().user_dismissed, 1);
    }

    #[test]
    fn auto_dismiss_after_manual_close_is_a_no_op() {
        let (_doc, sched, queue) = setup();
        let id = queue.show("x", NotificationKind::Warning, ms(500));
        let close = queue.close_button(id).unwrap();

        assert!(queue.handle_click(close.id()));
        sched.run_frame(ms(300));
        assert!(!queue.is_active(id));

        sched.run_frame(ms(600));
        let stats = queue.stats();
        assert_eq!(stats.user_dismissed, 1);
        assert_eq!(stats.auto_expired, 0);
        assert!(sched.is_idle());
    }

    #[test]
    fn click_elsewhere_is_ignored() {
        let (doc, _sched, queue) = setup();
        let id = queue.info("x");
        let card = queue.card_element(id).unwrap();
        assert!(!queue.handle_click(card.id()));
        assert!(!queue.handle_click(doc.create_in_body("other").id()));
        assert!(!card.has_class(EXIT_CLASS));
    }

    #[test]
    fn kind_shortcuts_use_default_duration() {
        let doc = MemoryDocument::new();
        let sched = FrameScheduler::new();
        let queue = NotificationQueue::new(
            Rc::new(doc),
            sched.clone(),
            QueueConfig::new().default_duration(ms(200)).exit_delay(ms(50)),
        );
        let id = queue.success("done");
        sched.run_frame(ms(200));
        sched.run_frame(ms(250));
        assert!(!queue.is_active(id));
    }

    #[test]
    fn dismiss_all_starts_every_exit() {
        let (_doc, sched, queue) = setup();
        queue.info("a");
        queue.info("b");
        queue.dismiss_all();
        sched.run_frame(ms(300));
        assert_eq!(queue.active_count(), 0);
        assert_eq!(queue.stats().user_dismissed, 2);
    }

    #[test]
    fn dropped_queue_leaves_timers_harmless() {
        let (_doc, sched, queue) = setup();
        queue.info("a");
        drop(queue);
        sched.run_frame(ms(10_000));
        assert!(sched.is_idle());
    }

    #[test]
    fn kind_shortcuts_accept_a_duration() {
        let (doc, sched, queue) = setup();
        let short = queue.warning_for("quota", ms(1000));
        let long = queue.error_for("offline", ms(8000));
        let card = queue.card_element(short).unwrap();
        assert!(card.has_class("warning"));
        assert_eq!(doc.query("notification-title").unwrap().text(), "Warning");

        sched.run_frame(ms(1000));
        sched.run_frame(ms(1300));
        assert!(!queue.is_active(short));
        assert!(queue.is_active(long));

        sched.run_frame(ms(5000));
        assert!(queue.is_active(long));
        sched.run_frame(ms(8000));
        sched.run_frame(ms(8300));
        assert!(!queue.is_active(long));
        assert_eq!(queue.stats().auto_expired, 2);
    }

    #[test]
    fn removed_cards_release_their_nodes() {
        let (doc, sched, queue) = setup();
        queue.show("first", NotificationKind::Info, ms(1000));
        let baseline = doc.node_count();
        for n in 0..20 {
            queue.show(&format!("toast {n}"), NotificationKind::Info, ms(1000));
        }
        assert!(doc.node_count() > baseline);

        sched.run_frame(ms(1000));
        sched.run_frame(ms(1300));
        assert_eq!(queue.active_count(), 0);
        // Body and the container remain.
        assert_eq!(doc.node_count(), 2);
    }

    #[test]
    fn duration_counts_from_show_after_idle_gap() {
        let doc = MemoryDocument::new();
        let clock = Rc::new(DeterministicClock::new());
        let sched = FrameScheduler::with_clock(clock.clone());
        let queue = NotificationQueue::with_defaults(Rc::new(doc), sched.clone());

        clock.advance(ms(16));
        sched.pump(&*clock);
        clock.advance(ms(10_000));

        let id = queue.show("saved", NotificationKind::Success, ms(5000));
        clock.advance(ms(16));
        sched.pump(&*clock);
        let card = queue.card_element(id).unwrap();
        assert!(!card.has_class("slide-out-right"));

        clock.advance(ms(5000));
        sched.pump(&*clock);
        assert!(card.has_class("slide-out-right"));
    }
}
