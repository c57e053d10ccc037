//! Custom tracing Layer that writes events through a [`Logger`].
//!
//! Lets code instrumented with `tracing` share a sink, defaults and debug
//! scopes with code calling the logger directly.
//!
//! | tracing level  | entry level |
//! |----------------|-------------|
//! | TRACE, DEBUG   | debug       |
//! | INFO, WARN     | info        |
//! | ERROR          | error       |
//!
//! Debug entries are gated with the event's module path as call-site identity.

use std::fmt::Write as FmtWrite;

use tracing::field::{Field, Visit};
use tracing::{Event, Level as TracingLevel, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::entry::{Data, Level};
use crate::logger::Logger;

/// A tracing Layer that forwards events to a [`Logger`].
pub struct LoggedLayer {
    logger: Logger,
}

impl LoggedLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

fn entry_level(level: &TracingLevel) -> Level {
    match *level {
        TracingLevel::TRACE | TracingLevel::DEBUG => Level::Debug,
        TracingLevel::INFO | TracingLevel::WARN => Level::Info,
        TracingLevel::ERROR => Level::Error,
    }
}

impl<S> Layer<S> for LoggedLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = entry_level(metadata.level());

        if level == Level::Debug {
            let call_site = metadata.module_path().unwrap_or_else(|| metadata.target());
            if !self.logger.is_debug_for(call_site) {
                return;
            }
        }

        let mut visitor = DataVisitor::default();
        event.record(&mut visitor);

        let message = visitor.message.unwrap_or_default();

        // A subscriber has no caller to report a failed write to
        let _ = self.logger.log(level, &message, &[&visitor.data]);
    }
}

/// Visitor that collects event fields as string metadata.
#[derive(Default)]
struct DataVisitor {
    message: Option<String>,
    data: Data,
}

impl Visit for DataVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);

        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.data.insert(field.name().to_string(), buf);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.data
                .insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.data
            .insert(field.name().to_string(), value.to_string());
    }
}
