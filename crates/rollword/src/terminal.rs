#![forbid(unsafe_code)]

//! Single-line terminal render surface.
//!
//! Every render returns the cursor to column zero, clears the rest of the
//! line and prints the new text, so scramble frames overwrite each other in
//! place. [`TerminalSurface::finish`] ends the line.
//!
//! A write failure is kept and reported by `finish`; later renders are
//! dropped, since [`RenderSurface::render`] cannot fail.

use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use rollword_runtime::RenderSurface;

/// Renders onto the current line of a terminal (or any writer).
#[derive(Debug)]
pub struct TerminalSurface<W: Write> {
    out: W,
    current: String,
    renders: u64,
    error: Option<io::Error>,
}

impl<W: Write> TerminalSurface<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: String::new(),
            renders: 0,
            error: None,
        }
    }

    /// The text currently on the line.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Number of successful renders.
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// End the line and flush, reporting any earlier write failure.
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.renders > 0 {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::UntilNewLine),
            Print(text)
        )?;
        self.out.flush()
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn render(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        match self.write_line(text) {
            Ok(()) => {
                self.current.clear();
                self.current.push_str(text);
                self.renders += 1;
            }
            Err(err) => {
                tracing::warn!(error = %err, "terminal write failed; dropping further frames");
                self.error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn renders_overwrite_the_line() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.render("ABC");
        surface.render("OK");
        surface.finish().expect("finish");
        assert_eq!(surface.current(), "OK");
        assert_eq!(surface.renders(), 2);

        let out = String::from_utf8(surface.into_inner()).expect("utf8");
        assert!(out.contains("ABC"));
        assert!(out.ends_with("OK\n"));
        assert_eq!(out.matches('\n').count(), 1);
        assert!(out.matches('\u{1b}').count() >= 4);
    }

    #[test]
    fn finish_without_renders_writes_nothing() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.finish().expect("finish");
        assert!(surface.into_inner().is_empty());
    }

    #[test]
    fn write_failure_is_reported_once_by_finish() {
        let mut surface = TerminalSurface::new(BrokenPipe);
        surface.render("A");
        surface.render("B");
        assert_eq!(surface.renders(), 0);
        assert_eq!(surface.current(), "");
        let err = surface.finish().expect_err("broken pipe");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
