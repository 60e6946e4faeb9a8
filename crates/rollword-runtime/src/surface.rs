#![forbid(unsafe_code)]

//! The render boundary between the engine and its host.
//!
//! The engine hands every scramble frame and the settled word to a
//! [`RenderSurface`]. The surface owns what is on screen and overwrites it
//! on every call.

/// Receives the text to display.
pub trait RenderSurface {
    /// Replace the displayed text.
    fn render(&mut self, text: &str);
}

impl<F: FnMut(&str)> RenderSurface for F {
    fn render(&mut self, text: &str) {
        self(text);
    }
}

/// A surface that keeps every rendered string, for tests and replays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSurface {
    frames: Vec<String>,
}

impl RecordingSurface {
    /// Create an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rendered string, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// The currently displayed text.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    /// Number of renders so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing has been rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Forget the recorded frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn render(&mut self, text: &str) {
        self.frames.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let mut surface = RecordingSurface::new();
        surface.render("A");
        surface.render("B");
        assert_eq!(surface.frames(), ["A", "B"]);
        assert_eq!(surface.last(), Some("B"));
        assert_eq!(surface.len(), 2);
        surface.clear();
        assert!(surface.is_empty());
    }

    #[test]
    fn closures_are_surfaces() {
        let mut seen = Vec::new();
        {
            let mut surface = |text: &str| seen.push(text.len());
            surface.render("abc");
            surface.render("");
        }
        assert_eq!(seen, vec![3, 0]);
    }
}
