#![forbid(unsafe_code)]

//! Structured log events emitted over a roll's lifecycle.
//!
//! Run:
//!   cargo test -p rollword-runtime --test tracing_roll_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rollword_core::{Alphabet, RollConfig};
use rollword_runtime::{RecordingSurface, RollEngine};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
    parent_span_name: Option<String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned().unwrap_or_default();

        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
            parent_span_name,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(EventCapture {
            events: Arc::clone(&events),
        });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn config() -> RollConfig {
    RollConfig::new(["OK"])
        .alphabet(Alphabet::parse("X").unwrap())
        .tick_interval(ms(10))
        .total_duration(ms(30))
        .frame_length(3)
}

fn find<'a>(events: &'a [CapturedEvent], message: &str) -> Vec<&'a CapturedEvent> {
    events.iter().filter(|e| e.message == message).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn start_and_settle_are_logged_at_info() {
    let events = with_captured_events(|| {
        let mut engine = RollEngine::with_rng(SmallRng::seed_from_u64(1));
        let mut surface = RecordingSurface::new();
        engine.start(&config(), ms(0)).unwrap();
        engine.advance(ms(30), &mut surface);
    });

    let started = find(&events, "roll started");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].level, tracing::Level::INFO);
    assert_eq!(started[0].fields["tick_ms"], "10");
    assert_eq!(started[0].fields["duration_ms"], "30");

    let settled = find(&events, "roll settled");
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].level, tracing::Level::INFO);
    assert_eq!(settled[0].fields["word"], "OK");
    assert_eq!(settled[0].fields["ticks"], "3");
    assert_eq!(settled[0].parent_span_name.as_deref(), Some("roll.advance"));
}

#[test]
fn ignored_start_is_logged_at_debug() {
    let events = with_captured_events(|| {
        let mut engine = RollEngine::with_rng(SmallRng::seed_from_u64(2));
        engine.start(&config(), ms(0)).unwrap();
        engine.start(&config(), ms(5)).unwrap();
        engine.start(&config(), ms(6)).unwrap();
    });

    let ignored = find(&events, "start ignored while rolling");
    assert_eq!(ignored.len(), 2);
    assert!(ignored.iter().all(|e| e.level == tracing::Level::DEBUG));
    assert_eq!(find(&events, "roll started").len(), 1);
}

#[test]
fn ticks_are_traced_inside_advance_span() {
    let events = with_captured_events(|| {
        let mut engine = RollEngine::with_rng(SmallRng::seed_from_u64(3));
        let mut surface = RecordingSurface::new();
        engine.start(&config(), ms(0)).unwrap();
        engine.advance(ms(20), &mut surface);
    });

    let ticks = find(&events, "tick");
    assert_eq!(ticks.len(), 2);
    for tick in ticks {
        assert_eq!(tick.level, tracing::Level::TRACE);
        assert_eq!(tick.fields["frame"], "XXX");
        assert_eq!(tick.parent_span_name.as_deref(), Some("roll.advance"));
    }
}

#[test]
fn release_is_logged_without_settle() {
    let events = with_captured_events(|| {
        let mut engine = RollEngine::with_rng(SmallRng::seed_from_u64(4));
        engine.start(&config(), ms(0)).unwrap();
        engine.release();
    });

    assert_eq!(find(&events, "roll released").len(), 1);
    assert!(find(&events, "roll settled").is_empty());
}
