//! Colorful console output for neighborhood events.
//!
//! Provides a custom `tracing` layer that renders the structured events
//! emitted by `knobforge_neighborhood`:
//!
//! - **DEBUG**: counting and the enumerate/sample decision
//! - **TRACE**: generator details (written slots, rejected draws)

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Directive used when `RUST_LOG` is unset or invalid.
const DEFAULT_DIRECTIVE: &str = "knobforge_neighborhood=debug";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Honors
/// `RUST_LOG`; does nothing if another global subscriber is already set.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(NeighborhoodConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats neighborhood events with colors.
pub struct NeighborhoodConsoleLayer;

impl<S: Subscriber> Layer<S> for NeighborhoodConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("knobforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    estimate: Option<String>,
    distance: Option<u64>,
    budget: Option<u64>,
    count: Option<u64>,
    appended: Option<u64>,
    requested: Option<u64>,
    total: Option<u64>,
    written: Option<u64>,
    sampled: Option<u64>,
    rejected: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "estimate" => self.estimate = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "distance" => self.distance = Some(value),
            "budget" => self.budget = Some(value),
            "count" => self.count = Some(value),
            "appended" => self.appended = Some(value),
            "requested" => self.requested = Some(value),
            "total" => self.total = Some(value),
            "written" => self.written = Some(value),
            "sampled" => self.sampled = Some(value),
            "rejected" => self.rejected = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "estimate" => self.estimate = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "neighborhood_count" => format_count(v),
        "neighborhood_sample" => format_decision(v, "sampled"),
        "neighborhood_enumerate" => format_decision(v, "enumerated"),
        "neighborhood_enumerated" => format_enumerated(v),
        "neighborhood_sampled" => format_sampled(v),
        _ => String::new(),
    }
}

fn format_count(v: &EventVisitor) -> String {
    let budget = v.budget.unwrap_or(0);
    let count = v.count.unwrap_or(0);
    let size = if count > budget {
        format!("> {}", budget.to_formatted_string(&Locale::en))
            .bright_yellow()
            .to_string()
    } else {
        count
            .to_formatted_string(&Locale::en)
            .bright_green()
            .to_string()
    };

    let mut output = format!(
        "{} {} {} d={} │ {} neighbors",
        timestamp().bright_black(),
        "DEBUG".bright_blue(),
        "[Count]".bright_cyan(),
        v.distance.unwrap_or(0).to_string().white().bold(),
        size,
    );
    if let Some(estimate) = v.estimate.as_deref().filter(|e| *e != "None") {
        output.push_str(&format!(" │ estimate {} recounted", estimate.yellow()));
    }
    output
}

fn format_decision(v: &EventVisitor, how: &str) -> String {
    format!(
        "{} {} {} d={} │ {} {}",
        timestamp().bright_black(),
        "DEBUG".bright_blue(),
        "[Neighborhood]".bright_cyan(),
        v.distance.unwrap_or(0).to_string().white().bold(),
        v.appended
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        how,
    )
}

fn format_enumerated(v: &EventVisitor) -> String {
    format!(
        "    {} wrote {} of {} slots",
        "->".bright_blue(),
        v.written.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.requested.unwrap_or(0).to_formatted_string(&Locale::en).white(),
    )
}

fn format_sampled(v: &EventVisitor) -> String {
    format!(
        "    {} drew {} │ {} duplicates rejected",
        "->".bright_blue(),
        v.sampled.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.rejected.unwrap_or(0).to_formatted_string(&Locale::en).bright_black(),
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}
