//! Rune-level cursor over the input.
//!
//! The scanner owns the input and three cursor fields: the current
//! `position`, the `start` of the pending span, and the byte `width` of the
//! last rune returned by [`Scanner::next`]. It has no output of its own; the
//! state machine reads spans out of it and decides what to emit.
//!
//! The line of `start` is carried forward as the span start moves, so line
//! lookups near the cursor never rescan the input from the beginning.

use super::error::TokenizerError;

/// Cursor over a fully buffered input string.
#[derive(Debug)]
pub struct Scanner {
    input: String,
    position: usize,
    start: usize,
    width: usize,
    // Set by `next`, cleared by `backup`. Guards the single-step undo.
    can_backup: bool,
    // 1-based line of `start`.
    start_line: usize,
}

impl Scanner {
    /// Create a scanner positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            input,
            position: 0,
            start: 0,
            width: 0,
            can_backup: false,
            start_line: 1,
        }
    }

    /// Return the next rune without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Undo the last [`Scanner::next`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenizerError::DoubleBackup`] if there was no `next` since
    /// the previous backup.
    pub const fn backup(&mut self) -> Result<(), TokenizerError> {
        if !self.can_backup {
            return Err(TokenizerError::DoubleBackup {
                position: self.position,
            });
        }
        self.can_backup = false;
        self.position -= self.width;
        Ok(())
    }

    /// Consume the next rune if it is one of `valid`.
    pub fn accept(&mut self, valid: &str) -> bool {
        match self.peek() {
            Some(c) if valid.contains(c) => {
                let _ = self.next();
                true
            }
            _ => false,
        }
    }

    /// Consume runes for as long as they satisfy `pred`. Returns how many
    /// bytes were consumed.
    pub fn accept_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let from = self.position;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            let _ = self.next();
        }
        self.position - from
    }

    /// Consume `prefix` if the remaining input starts with it.
    pub fn accept_prefix(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.advance_by(prefix.len());
            true
        } else {
            false
        }
    }

    /// Consume an ASCII `keyword` matched case-insensitively.
    pub fn accept_keyword_ignore_case(&mut self, keyword: &str) -> bool {
        let rest = self.rest().as_bytes();
        let matched = rest.len() >= keyword.len()
            && rest[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes());
        if matched {
            self.advance_by(keyword.len());
        }
        matched
    }

    /// Move forward to the start of the next occurrence of `needle` and
    /// return true, or move to end of input and return false.
    pub fn skip_until(&mut self, needle: &str) -> bool {
        match self.rest().find(needle) {
            Some(offset) => {
                self.advance_by(offset);
                true
            }
            None => {
                self.advance_by(self.rest().len());
                false
            }
        }
    }

    /// Move forward to the first of `stops` and return true, or move to end
    /// of input and return false.
    pub fn skip_to_any(&mut self, stops: &[char]) -> bool {
        match self.rest().find(stops) {
            Some(offset) => {
                self.advance_by(offset);
                true
            }
            None => {
                self.advance_by(self.rest().len());
                false
            }
        }
    }

    /// Discard the pending span; it now starts at the current position.
    pub fn ignore(&mut self) {
        self.start_line = self.line_at(self.position);
        self.start = self.position;
    }

    /// The pending span, from its start to the current position.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizerError::SpanOutOfOrder`] if the span start has
    /// moved past the position.
    pub fn span(&self) -> Result<&str, TokenizerError> {
        if self.start > self.position {
            return Err(TokenizerError::SpanOutOfOrder {
                start: self.start,
                position: self.position,
            });
        }
        Ok(&self.input[self.start..self.position])
    }

    /// The input between two byte offsets previously read from
    /// [`Scanner::position`].
    #[must_use]
    pub fn slice(&self, from: usize, to: usize) -> &str {
        &self.input[from..to]
    }

    /// Everything not yet consumed.
    #[must_use]
    pub fn rest(&self) -> &str {
        &self.input[self.position..]
    }

    /// Current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Byte offset where the pending span starts.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns true once every rune has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// 1-based line number of the byte offset `at`.
    ///
    /// Counts newlines between `at` and the span start only, so the cost is
    /// proportional to their distance rather than to `at`.
    #[must_use]
    pub fn line_at(&self, at: usize) -> usize {
        let at = at.min(self.input.len());
        if at >= self.start {
            self.start_line + self.count_newlines(self.start, at)
        } else {
            self.start_line - self.count_newlines(at, self.start)
        }
    }

    fn count_newlines(&self, from: usize, to: usize) -> usize {
        self.input
            .get(from..to)
            .map_or(0, |between| between.matches('\n').count())
    }

    // Callers only pass byte counts that land on a char boundary.
    fn advance_by(&mut self, bytes: usize) {
        self.position += bytes;
        self.width = 0;
        self.can_backup = false;
    }
}

impl Iterator for Scanner {
    type Item = char;

    /// Return and consume the next rune, or `None` at end of input.
    ///
    /// At end of input the position is left unchanged; a following
    /// [`Scanner::backup`] is then a no-op.
    fn next(&mut self) -> Option<char> {
        self.can_backup = true;
        match self.input[self.position..].chars().next() {
            Some(c) => {
                self.width = c.len_utf8();
                self.position += self.width;
                Some(c)
            }
            None => {
                self.width = 0;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_advances_by_rune_width() {
        let mut scanner = Scanner::new("aé€".to_string());
        assert_eq!(scanner.next(), Some('a'));
        assert_eq!(scanner.position(), 1);
        assert_eq!(scanner.next(), Some('é'));
        assert_eq!(scanner.position(), 3);
        assert_eq!(scanner.next(), Some('€'));
        assert_eq!(scanner.position(), 6);
        assert_eq!(scanner.next(), None);
        assert_eq!(scanner.position(), 6);
        assert_eq!(scanner.next(), None);
        assert_eq!(scanner.position(), 6);
    }

    #[test]
    fn backup_undoes_one_multibyte_rune() {
        let mut scanner = Scanner::new("€x".to_string());
        assert_eq!(scanner.next(), Some('€'));
        scanner.backup().unwrap();
        assert_eq!(scanner.position(), 0);
        assert_eq!(scanner.peek(), Some('€'));
    }

    #[test]
    fn double_backup_is_an_internal_error() {
        let mut scanner = Scanner::new("ab".to_string());
        let _ = scanner.next();
        scanner.backup().unwrap();
        assert_eq!(
            scanner.backup(),
            Err(TokenizerError::DoubleBackup { position: 0 })
        );
    }

    #[test]
    fn backup_before_any_next_is_an_internal_error() {
        let mut scanner = Scanner::new("ab".to_string());
        assert!(scanner.backup().is_err());
    }

    #[test]
    fn backup_after_end_of_input_is_a_no_op() {
        let mut scanner = Scanner::new("a".to_string());
        let _ = scanner.next();
        assert_eq!(scanner.next(), None);
        scanner.backup().unwrap();
        assert_eq!(scanner.position(), 1);
    }

    #[test]
    fn peek_never_advances() {
        let scanner = Scanner::new("xy".to_string());
        assert_eq!(scanner.peek(), Some('x'));
        assert_eq!(scanner.peek(), Some('x'));
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn accept_consumes_only_members() {
        let mut scanner = Scanner::new("<a".to_string());
        assert!(!scanner.accept("/!"));
        assert_eq!(scanner.position(), 0);
        assert!(scanner.accept("<>"));
        assert_eq!(scanner.position(), 1);
    }

    #[test]
    fn span_and_ignore() {
        let mut scanner = Scanner::new("ab cd".to_string());
        let _ = scanner.next();
        let _ = scanner.next();
        assert_eq!(scanner.span().unwrap(), "ab");
        let _ = scanner.accept_while(char::is_whitespace);
        scanner.ignore();
        assert_eq!(scanner.span().unwrap(), "");
        let _ = scanner.accept_while(char::is_alphabetic);
        assert_eq!(scanner.span().unwrap(), "cd");
    }

    #[test]
    fn keyword_match_ignores_ascii_case() {
        let mut scanner = Scanner::new("DocType html".to_string());
        assert!(scanner.accept_keyword_ignore_case("DOCTYPE"));
        assert_eq!(scanner.rest(), " html");
    }

    #[test]
    fn keyword_match_is_safe_on_multibyte_input() {
        let mut scanner = Scanner::new("DOCé".to_string());
        assert!(!scanner.accept_keyword_ignore_case("DOCTYPE"));
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn skip_until_stops_before_needle_or_at_end() {
        let mut scanner = Scanner::new("abc-->d".to_string());
        assert!(scanner.skip_until("-->"));
        assert_eq!(scanner.position(), 3);
        let mut scanner = Scanner::new("abc".to_string());
        assert!(!scanner.skip_until("-->"));
        assert!(scanner.at_end());
    }

    #[test]
    fn line_numbers_count_newlines_before_offset() {
        let scanner = Scanner::new("a\nb\nc".to_string());
        assert_eq!(scanner.line_at(0), 1);
        assert_eq!(scanner.line_at(2), 2);
        assert_eq!(scanner.line_at(4), 3);
        assert_eq!(scanner.line_at(100), 3);
    }

    #[test]
    fn skip_to_any_stops_at_first_match() {
        let mut scanner = Scanner::new("ab<c>".to_string());
        assert!(scanner.skip_to_any(&['>', '<']));
        assert_eq!(scanner.position(), 2);
        let mut scanner = Scanner::new("abc".to_string());
        assert!(!scanner.skip_to_any(&['>', '<']));
        assert!(scanner.at_end());
    }

    #[test]
    fn line_of_span_start_follows_ignore() {
        let mut scanner = Scanner::new("a\nb\n\nc\nd".to_string());
        let _ = scanner.skip_until("c");
        scanner.ignore();
        assert_eq!(scanner.line_at(scanner.start()), 4);
        assert_eq!(scanner.line_at(scanner.start() + 2), 5);
        // Offsets behind the span start are still answered
        assert_eq!(scanner.line_at(2), 2);
        assert_eq!(scanner.line_at(0), 1);
    }
}
