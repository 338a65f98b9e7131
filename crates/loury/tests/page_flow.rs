//! End-to-end flows through one `Page`, driven by a deterministic clock.

use std::rc::Rc;
use std::time::Duration;

use loury::core::{Rect, Transform};
use loury::theme::ColorToken;
use loury::{
    DeterministicClock, Element, ElementRef, FrameClock, LouryConfig, MemoryDocument,
    MemoryStorage, Page, PreferenceStore, RecordingScope, ThemeId, UiEvent,
};
use pretty_assertions::assert_eq;

const FRAME: Duration = Duration::from_millis(16);

struct Host {
    doc: MemoryDocument,
    scope: Rc<RecordingScope>,
    store: Rc<MemoryStorage>,
    clock: Rc<DeterministicClock>,
    page: Page,
}

impl Host {
    fn new(store: MemoryStorage) -> Self {
        let doc = MemoryDocument::new();
        let scope = Rc::new(RecordingScope::new());
        let store = Rc::new(store);
        let clock = Rc::new(DeterministicClock::new());
        let page = Page::with_clock(
            Rc::new(doc.clone()),
            scope.clone(),
            store.clone(),
            LouryConfig::default(),
            clock.clone(),
        )
        .unwrap();
        Self {
            doc,
            scope,
            store,
            clock,
            page,
        }
    }

    /// Host frame loop paused: time passes, no frames run.
    fn idle(&self, gap: Duration) {
        self.clock.advance(gap);
    }

    fn advance(&mut self, total: Duration) {
        let end = self.clock.now_mono() + total;
        while self.clock.now_mono() < end {
            self.clock.advance(FRAME);
            self.page.pump(&*self.clock);
        }
    }
}

#[test]
fn persisted_theme_is_restored_and_switched_through_the_selector() {
    let mut host = Host::new(MemoryStorage::with_entry("vocabloury-theme", "purple"));
    assert_eq!(host.page.theme().current_theme(), ThemeId::Purple);
    assert_eq!(host.scope.data_theme(), Some(ThemeId::Purple));

    let toggle = host.page.theme().toggle_element().id();
    assert!(host.page.dispatch(&UiEvent::click(toggle)));

    let green = host.page.theme().option_element(ThemeId::Green).unwrap().id();
    assert!(host.page.dispatch(&UiEvent::click(green)));

    assert_eq!(host.page.theme().current_theme(), ThemeId::Green);
    assert_eq!(
        host.store.get("vocabloury-theme").unwrap().as_deref(),
        Some("green")
    );
    let accent = ThemeId::Green.palette().get(ColorToken::Accent).to_string();
    assert_eq!(host.scope.value("--accent"), Some(accent));
    assert_eq!(
        host.page.theme().toggle_element().text(),
        ThemeId::Green.icon()
    );
}

#[test]
fn counter_and_typing_finish_on_exact_values() {
    let mut host = Host::new(MemoryStorage::new());
    let stat: ElementRef = host.doc.create_in_body("stat-number");
    let headline: ElementRef = host.doc.create_in_body("hero-title");

    let counter = host
        .page
        .engine()
        .animate_counter(&stat, 0, 100, Duration::from_millis(2000));
    let typing = host
        .page
        .engine()
        .type_text(&headline, "hi", Duration::from_millis(50));

    host.advance(Duration::from_millis(2100));

    assert!(counter.is_finished());
    assert!(typing.is_finished());
    assert_eq!(stat.text(), "100");
    assert_eq!(headline.text(), "hi");
}

#[test]
fn work_posted_after_idle_gap_runs_its_full_duration() {
    let mut host = Host::new(MemoryStorage::new());
    host.advance(FRAME);
    assert!(host.page.scheduler().is_idle());
    host.idle(Duration::from_secs(30));

    let card: ElementRef = host.doc.create_in_body("card");
    let fade = host.page.engine().fade_in(&card, Duration::from_millis(300));
    let toast = host.page.notifications().info("back online");

    host.advance(FRAME);
    assert!(!fade.is_finished());
    assert!(card.opacity() < 0.1);
    let toast_card = host.page.notifications().card_element(toast).unwrap();
    assert!(!toast_card.has_class("slide-out-right"));

    host.advance(Duration::from_millis(300));
    assert!(fade.is_finished());
    assert!(host.page.notifications().is_active(toast));

    host.advance(Duration::from_millis(5000));
    assert!(!host.page.notifications().is_active(toast));
}

#[test]
fn notifications_stack_and_expire() {
    let mut host = Host::new(MemoryStorage::new());
    let first = host.page.notifications().success("Saved");
    let second = host.page.notifications().error("Network down");
    assert_eq!(host.page.notifications().active_count(), 2);
    assert_eq!(host.doc.query_all("notification").len(), 2);

    let close = host.page.notifications().close_button(first).unwrap().id();
    assert!(host.page.dispatch(&UiEvent::click(close)));
    host.advance(Duration::from_millis(400));
    assert!(!host.page.notifications().is_active(first));
    assert!(host.page.notifications().is_active(second));

    host.advance(Duration::from_millis(5000));
    assert_eq!(host.page.notifications().active_count(), 0);
    let stats = host.page.notifications().stats();
    assert_eq!(stats.user_dismissed, 1);
    assert_eq!(stats.auto_expired, 1);
    assert!(host.doc.query("notification").is_none());
}

#[test]
fn button_click_ripples_and_loads() {
    let mut host = Host::new(MemoryStorage::new());
    let button = host.doc.create_in_body("btn");
    button.set_bounds(Rect::new(10.0, 20.0, 100.0, 40.0));
    let handle: ElementRef = button.clone();
    host.page.interactions_mut().register_button(&handle);

    assert!(host.page.dispatch(&UiEvent::Click {
        target: button.id(),
        x: 60.0,
        y: 40.0,
    }));

    let ripple = host.doc.query("ripple").unwrap();
    assert_eq!(ripple.parent_id(), Some(button.id()));
    assert_eq!(ripple.geometry(), Some(Rect::new(0.0, -30.0, 100.0, 100.0)));
    assert!(button.has_class("loading"));

    host.advance(Duration::from_millis(700));
    assert!(host.doc.query("ripple").is_none());
    assert!(button.has_class("loading"));

    host.advance(Duration::from_millis(1400));
    assert!(!button.has_class("loading"));
}

#[test]
fn hover_lift_and_parallax_route_through_dispatch() {
    let mut host = Host::new(MemoryStorage::new());
    let card: ElementRef = host.doc.create_in_body("feature-card");
    let layer: ElementRef = host.doc.create_in_body("parallax");
    layer.set_attribute("data-speed", "0.25");
    host.page.interactions_mut().register_hover(&card);
    host.page.interactions_mut().register_parallax(&layer);

    assert!(host.page.dispatch(&UiEvent::MouseOver { target: card.id() }));
    assert_eq!(card.transform(), Transform::translate_y_px(-4.0));
    assert!(host.page.dispatch(&UiEvent::MouseOut { target: card.id() }));
    assert_eq!(card.transform(), Transform::None);

    assert!(host.page.dispatch(&UiEvent::Scroll { y: 100.0 }));
    assert!(host.page.dispatch(&UiEvent::Scroll { y: 200.0 }));
    host.advance(FRAME);
    assert_eq!(host.page.interactions().parallax_updates(), 1);
    assert_eq!(layer.transform(), Transform::translate_y_px(-50.0));
}

#[cfg(feature = "file-storage")]
#[test]
fn file_storage_survives_a_new_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = LouryConfig::default();
    config.theme.storage_path = Some(dir.path().join("prefs.json"));

    {
        let mut page = Page::with_file_storage(
            Rc::new(MemoryDocument::new()),
            Rc::new(RecordingScope::new()),
            config.clone(),
        )
        .unwrap();
        page.switch_theme("blue").unwrap();
    }

    let page = Page::with_file_storage(
        Rc::new(MemoryDocument::new()),
        Rc::new(RecordingScope::new()),
        config,
    )
    .unwrap();
    assert_eq!(page.theme().current_theme(), ThemeId::Blue);
}
