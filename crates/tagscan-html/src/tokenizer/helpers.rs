//! Helper functions for the tokenizer state machine.
//!
//! This module contains the pieces shared by several states:
//! - Token emission into the pending queue, with source spans
//! - Recovery from malformed markup
//! - Attribute accumulation
//! - Issue recording and warning output

use tagscan_common::warning::warn_once;

use super::core::{TokenizerState, Tokenizer};
use super::error::{IssueKind, TokenizeIssue, TokenizerError};
use super::token::{Attribute, SourceSpan, Token};

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl Tokenizer {
    /// Queue `token` with the pending span as its source range, then start a
    /// new span at the current position.
    pub(super) fn emit(&mut self, token: Token) -> Result<(), TokenizerError> {
        let start = self.scanner.start();
        let span = SourceSpan::new(start, start + self.scanner.span()?.len());
        self.queue.push_back((token, span));
        self.scanner.ignore();
        Ok(())
    }

    /// Emit the pending span as a text token, if it is not empty.
    pub(super) fn emit_pending_text(&mut self) -> Result<(), TokenizerError> {
        let content = self.scanner.span()?;
        if content.is_empty() {
            return Ok(());
        }
        let token = Token::text(content);
        self.emit(token)
    }

    /// Emit the tag assembled so far and update the depth.
    pub(super) fn emit_open_tag(&mut self, self_closing: bool) -> Result<(), TokenizerError> {
        let tag = self.current_tag.take().unwrap_or_default();
        self.depth.open(self_closing);
        self.emit(Token::OpenTag {
            name: tag.name,
            attributes: tag.attributes,
            self_closing,
        })
    }
}

// =============================================================================
// Recovery Helpers
// =============================================================================

impl Tokenizer {
    /// End of input inside a tag: the whole fragment from `<` becomes one
    /// text token and the stream ends.
    pub(super) fn emit_fragment_as_text(&mut self) -> Result<TokenizerState, TokenizerError> {
        self.record_issue(IssueKind::MalformedTag, self.scanner.start());
        self.current_tag = None;
        self.emit_pending_text()?;
        Ok(TokenizerState::Done)
    }

    /// A `<` that does not open well-formed markup. What has been consumed
    /// since the `<` stays in the pending span and scanning resumes as text.
    pub(super) fn recover_as_text(&mut self) -> TokenizerState {
        self.record_issue(IssueKind::MalformedTag, self.scanner.start());
        self.current_tag = None;
        TokenizerState::Text
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl Tokenizer {
    /// Append an attribute to the current tag. Duplicates are kept.
    pub(super) fn push_attribute(&mut self, name: String, value: String) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.attributes.push(Attribute::new(name, value));
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl Tokenizer {
    /// Record a recoverable issue at byte `position`. Malformed markup is
    /// never fatal; the tokenizer recovers and continues.
    pub(super) fn record_issue(&mut self, kind: IssueKind, position: usize) {
        let line = self.scanner.line_at(position);
        if self.options.report_warnings {
            warn_once(
                "HTML Tokenizer",
                &format!("{kind} at line {line} (byte {position})"),
            );
        }
        self.issues.push(TokenizeIssue {
            kind,
            position,
            line,
        });
    }
}
