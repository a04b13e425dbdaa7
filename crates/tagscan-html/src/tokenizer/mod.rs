//! Markup tokenizer module.
//!
//! A scanner over the buffered input feeds a closed set of states; each
//! state consumes runes, queues tokens, and names the next state.

/// Tokenizer state machine implementation.
pub mod core;
/// Nesting depth tracking.
pub mod depth;
/// Internal errors and recoverable issues.
pub mod error;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Rune-level cursor over the input.
pub mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{SpannedTokens, Tokenizer, TokenizerOptions, TokenizerState, tokenize};
pub use depth::DepthTracker;
pub use error::{IssueKind, TokenizeIssue, TokenizerError};
pub use token::{Attribute, SourceSpan, Token};
