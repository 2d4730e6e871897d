//! Logging infrastructure: structured event logging.
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer that implements
//! the [`EventSink`](palaver_application::EventSink) port.

mod jsonl_event_logger;

pub use jsonl_event_logger::JsonlEventLogger;
