//! Live printing of streamed model output

use colored::Colorize;
use palaver_application::{EventSink, ForumEvent};
use palaver_domain::ModelId;
use std::io::Write;
use std::sync::Mutex;

/// Prints text chunks as they arrive, with a header whenever the speaking
/// model changes. Concurrent streams interleave at chunk boundaries.
pub struct StreamPrinter<W: Write + Send> {
    state: Mutex<PrinterState<W>>,
}

struct PrinterState<W> {
    out: W,
    current: Option<ModelId>,
}

impl StreamPrinter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> StreamPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: Mutex::new(PrinterState { out, current: None }),
        }
    }

    /// Give back the writer. Used by tests to inspect what was printed.
    pub fn into_inner(self) -> W {
        match self.state.into_inner() {
            Ok(state) => state.out,
            Err(poisoned) => poisoned.into_inner().out,
        }
    }
}

impl<W: Write + Send> EventSink for StreamPrinter<W> {
    fn emit(&self, event: ForumEvent) {
        let ForumEvent::Chunk(chunk) = event else {
            return;
        };
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let PrinterState { out, current } = &mut *state;

        // terminal write errors are not worth failing a stream over
        if chunk.done {
            if current.as_ref() == Some(&chunk.model) {
                let _ = writeln!(out);
                *current = None;
            }
        } else {
            if current.as_ref() != Some(&chunk.model) {
                let _ = writeln!(out, "\n{}", format!("── {} ──", chunk.model).yellow().bold());
                *current = Some(chunk.model);
            }
            let _ = write!(out, "{}", chunk.text);
        }
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver_domain::ChunkEvent;

    #[test]
    fn test_headers_on_model_change() {
        colored::control::set_override(false);
        let printer = StreamPrinter::new(Vec::new());
        let a = ModelId::new("a");
        let b = ModelId::new("b");

        printer.emit(ForumEvent::Chunk(ChunkEvent::delta(a.clone(), "Hel")));
        printer.emit(ForumEvent::Chunk(ChunkEvent::delta(a.clone(), "lo")));
        printer.emit(ForumEvent::Chunk(ChunkEvent::done(a)));
        printer.emit(ForumEvent::Chunk(ChunkEvent::delta(b.clone(), "Hi")));
        printer.emit(ForumEvent::Chunk(ChunkEvent::done(b)));

        let text = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(text, "\n── a ──\nHello\n\n── b ──\nHi\n");
    }

    #[test]
    fn test_done_without_text_prints_nothing() {
        let printer = StreamPrinter::new(Vec::new());
        printer.emit(ForumEvent::Chunk(ChunkEvent::done(ModelId::new("a"))));
        printer.emit(ForumEvent::QueryCompleted {
            succeeded: 0,
            failed: 1,
        });
        assert!(printer.into_inner().is_empty());
    }
}
