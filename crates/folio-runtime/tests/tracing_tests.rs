#![forbid(unsafe_code)]

//! Log output of the page coordinator.
//!
//!   cargo test -p folio-runtime --test tracing_tests

use std::sync::{Arc, Mutex};

use folio_core::geometry::StaticLayout;
use folio_runtime::event::PageEvent;
use folio_runtime::markup::PageMarkup;
use folio_runtime::page::Page;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    message: String,
    span: Option<String>,
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        let span = ctx.event_span(event).map(|s| s.name().to_owned());
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
            span,
        });
    }
}

fn page() -> Page<StaticLayout> {
    Page::with_defaults(PageMarkup::default(), StaticLayout::new(800.0)).unwrap()
}

#[test]
fn duplicate_lifecycle_events_warn_inside_event_span() {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut page = page();
        page.handle_event(PageEvent::DomReady);
        page.handle_event(PageEvent::DomReady);
        page.handle_event(PageEvent::Loaded);
        page.handle_event(PageEvent::Loaded);
    });

    let warnings: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.level == Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(warnings[0].message.contains("DomReady"));
    assert!(warnings[1].message.contains("Loaded"));
    assert!(
        warnings
            .iter()
            .all(|w| w.span.as_deref() == Some("page_event"))
    );
}

#[test]
fn unknown_targets_warn_without_mutations() {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    let out = tracing::subscriber::with_default(subscriber, || {
        let mut page = page();
        page.handle_event(PageEvent::ButtonClicked {
            button: "ghost".into(),
        });
        page.handle_event(PageEvent::NavLinkClicked {
            link: "ghost".into(),
        });
        page.handle_event(PageEvent::Submit);
        page.drain_mutations()
    });

    assert!(out.is_empty());
    let warns = capture
        .events()
        .iter()
        .filter(|e| e.level == Level::WARN)
        .count();
    assert_eq!(warns, 3);
}
