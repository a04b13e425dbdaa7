//! Nesting depth inferred from open and close tags.

/// Current nesting level, for diagnostics and indentation.
///
/// Never negative: closing at depth zero is reported and clamped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DepthTracker {
    depth: usize,
    max_depth: usize,
}

impl DepthTracker {
    /// A tracker at depth zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            depth: 0,
            max_depth: 0,
        }
    }

    /// Record an open tag. Self-closing tags leave the depth unchanged.
    pub const fn open(&mut self, self_closing: bool) {
        if !self_closing {
            self.depth += 1;
            if self.depth > self.max_depth {
                self.max_depth = self.depth;
            }
        }
    }

    /// Record a close tag. Returns false (and stays at zero) when there was
    /// nothing open.
    #[must_use]
    pub const fn close(&mut self) -> bool {
        if self.depth == 0 {
            false
        } else {
            self.depth -= 1;
            true
        }
    }

    /// Current depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest level reached so far.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Four spaces per level.
    #[must_use]
    pub fn indent(&self) -> String {
        "    ".repeat(self.depth)
    }
}
