//! Streaming tokenizer for HTML-like markup.
//!
//! # Scope
//!
//! This crate turns a fully buffered string into an ordered stream of
//! lexical tokens:
//! - **Text runs**, **open tags** (with ordered attributes and a
//!   self-closing flag), **close tags**, **comments**, **doctypes**
//! - A single **end-of-stream** token closing every stream
//!
//! Tokens come out one at a time on demand, or all at once. Nesting depth
//! is tracked for diagnostics and indentation. Malformed markup is turned
//! into text or truncated constructs and recorded as an issue; it never
//! stops the run.
//!
//! # Not In Scope
//!
//! - Tree construction and tag matching
//! - Entity/character reference decoding
//! - Encoding detection
//! - Script and style sub-lexing

/// Indented token dumps.
pub mod printer;
/// Tokenizer for converting input into tokens.
pub mod tokenizer;

pub use printer::{format_tokens, print_tokens, summarize_issues};
pub use tokenizer::{
    Attribute, IssueKind, SourceSpan, Token, TokenizeIssue, Tokenizer, TokenizerError,
    TokenizerOptions, TokenizerState, tokenize,
};
