//! Progress and live output sinks

pub mod reporter;
pub mod stream;
