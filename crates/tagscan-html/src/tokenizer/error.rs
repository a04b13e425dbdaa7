use serde::Serialize;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

/// A defect in the tokenizer itself.
///
/// Malformed markup never produces one of these; the tokenizer recovers from
/// all input. These surface only when the state machine breaks an invariant
/// of its own scanner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizerError {
    /// `backup` was called without a `next` since the previous `backup`.
    #[error("scanner backed up twice without advancing (position {position})")]
    DoubleBackup {
        /// Scanner position at the time of the call.
        position: usize,
    },

    /// The pending span start moved past the scanner position.
    #[error("pending span starts at {start}, after the scanner position {position}")]
    SpanOutOfOrder {
        /// Start of the pending span.
        start: usize,
        /// Scanner position.
        position: usize,
    },
}

/// Kinds of recoverable problems found in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum IssueKind {
    /// A `<` that does not start a well-formed tag, comment or doctype, or a
    /// tag missing its closing `>`. The fragment is emitted as text.
    #[strum(serialize = "malformed tag")]
    MalformedTag,
    /// A quoted attribute value, comment or doctype running to end of input.
    /// The rest of the input becomes the construct's content.
    #[strum(serialize = "unterminated construct")]
    UnterminatedConstruct,
    /// A close tag at depth zero. The token is still emitted.
    #[strum(serialize = "close tag without matching open tag")]
    DepthUnderflow,
}

/// A recoverable problem, recorded where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizeIssue {
    /// What went wrong.
    pub kind: IssueKind,
    /// Byte offset of the construct that triggered the issue.
    pub position: usize,
    /// 1-based line of `position`.
    pub line: usize,
}
