use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

use crate::settings::{LogFormat, LogSettings};

lazy_static! {
    pub static ref QUIZ_QUESTIONS_CNTR: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions served to quiz players",
        &["category"]
    )
    .expect("quiz_questions_served_total is registered once");
}

fn span_events(settings: &LogSettings) -> FmtSpan {
    if settings.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured filter so a single run can be made more verbose.
pub fn init_tracing(settings: &LogSettings) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let (pretty, json) = match settings.format {
        LogFormat::Pretty => (
            Some(fmt::layer().with_span_events(span_events(settings))),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_events(span_events(settings)),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()
}
