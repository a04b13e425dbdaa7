use std::collections::VecDeque;

use strum_macros::Display;

use super::depth::DepthTracker;
use super::error::{IssueKind, TokenizeIssue, TokenizerError};
use super::scanner::Scanner;
use super::token::{Attribute, SourceSpan, Token};

/// The tokenizer state machine. The set of states is closed; every step
/// dispatches on exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Accumulating a text run up to the next `<` or end of input.
    Text,
    /// At a `<`, deciding what kind of markup follows.
    TagOpenStart,
    /// Reading an open tag's name.
    TagName,
    /// Between attributes inside an open tag.
    AttributeList,
    /// Reading an attribute name.
    AttributeName,
    /// Reading an attribute value after `=`.
    AttributeValue,
    /// Reading a `</name>` tag.
    ClosingTag,
    /// Inside `<!-- ... -->`.
    CommentBody,
    /// Inside `<!DOCTYPE ... >`.
    DoctypeBody,
    /// End of input reached. Emits the end-of-stream token once.
    Done,
}

/// Behaviour switches for a tokenizer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Print each recoverable issue through the shared warning system.
    ///
    /// Warnings are deduplicated process-wide by
    /// [`tagscan_common::warning::warn_once`], and the set of printed
    /// messages is never cleared by the tokenizer. A long-running caller
    /// tokenizing many documents should call
    /// [`tagscan_common::warning::clear_warnings`] before each one, or the
    /// set keeps growing and repeated messages stay silent.
    pub report_warnings: bool,
}

/// An open tag being assembled across the tag and attribute states.
#[derive(Debug, Default)]
pub(super) struct PendingTag {
    pub(super) name: String,
    pub(super) attributes: Vec<Attribute>,
    /// Name of the attribute whose value is being read.
    pub(super) attribute_name: Option<String>,
}

/// Streaming tokenizer for HTML-like markup.
///
/// One instance tokenizes one input. Tokens are produced on demand through
/// [`Tokenizer::next_token`] or the [`Iterator`] impl, or all at once with
/// [`Tokenizer::run`]. Malformed markup is recovered from locally; the only
/// errors are [`TokenizerError`]s signalling a defect in the machine itself.
///
/// ```
/// use tagscan_html::{Token, Tokenizer};
///
/// let tokens: Vec<Token> = Tokenizer::new("<a>hello</a>")
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(tokens[1], Token::text("hello"));
/// assert!(tokens[3].is_end_of_stream());
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    pub(super) state: TokenizerState,
    pub(super) scanner: Scanner,
    pub(super) depth: DepthTracker,
    pub(super) current_tag: Option<PendingTag>,
    pub(super) queue: VecDeque<(Token, SourceSpan)>,
    pub(super) issues: Vec<TokenizeIssue>,
    pub(super) options: TokenizerOptions,
    /// Set once the end-of-stream token has been queued, or after an
    /// internal error.
    pub(super) finished: bool,
    pub(super) token_stream: Vec<Token>,
}

impl Tokenizer {
    /// Create a tokenizer for `input`, starting in the text state.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self::with_options(input, TokenizerOptions::default())
    }

    /// Create a tokenizer with explicit options.
    #[must_use]
    pub fn with_options(input: impl Into<String>, options: TokenizerOptions) -> Self {
        Self {
            state: TokenizerState::Text,
            scanner: Scanner::new(input.into()),
            depth: DepthTracker::new(),
            current_tag: None,
            queue: VecDeque::new(),
            issues: Vec::new(),
            options,
            finished: false,
            token_stream: Vec::new(),
        }
    }

    /// Produce the next token, or `None` once the end-of-stream token has
    /// been returned.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenizerError`] if the state machine violates a scanner
    /// invariant. The tokenizer produces nothing further after that.
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizerError> {
        Ok(self.next_spanned()?.map(|(token, _)| token))
    }

    /// Like [`Tokenizer::next_token`], paired with the source range the
    /// token was scanned from.
    ///
    /// # Errors
    ///
    /// See [`Tokenizer::next_token`].
    pub fn next_spanned(&mut self) -> Result<Option<(Token, SourceSpan)>, TokenizerError> {
        loop {
            if let Some(item) = self.queue.pop_front() {
                return Ok(Some(item));
            }
            if self.finished {
                return Ok(None);
            }
            if let Err(err) = self.step() {
                self.finished = true;
                return Err(err);
            }
        }
    }

    /// Turn this tokenizer into an iterator of `(token, span)` pairs.
    #[must_use]
    pub const fn spanned(self) -> SpannedTokens {
        SpannedTokens { tokenizer: self }
    }

    /// Run the tokenizer to completion.
    ///
    /// Processes the input and populates the token stream.
    ///
    /// # Errors
    ///
    /// See [`Tokenizer::next_token`].
    pub fn run(&mut self) -> Result<(), TokenizerError> {
        while let Some(token) = self.next_token()? {
            self.token_stream.push(token);
        }
        Ok(())
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after run() to get the tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth.depth()
    }

    /// Deepest nesting reached so far.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.depth.max_depth()
    }

    /// The state the next step will run.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Recoverable problems found so far, in input order.
    #[must_use]
    pub fn issues(&self) -> &[TokenizeIssue] {
        &self.issues
    }

    /// 1-based line of the start of the construct being scanned.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.scanner.line_at(self.scanner.start())
    }

    /// Run one state and move to the state it returns.
    fn step(&mut self) -> Result<(), TokenizerError> {
        self.state = match self.state {
            TokenizerState::Text => self.handle_text_state()?,
            TokenizerState::TagOpenStart => self.handle_tag_open_start_state()?,
            TokenizerState::TagName => self.handle_tag_name_state()?,
            TokenizerState::AttributeList => self.handle_attribute_list_state()?,
            TokenizerState::AttributeName => self.handle_attribute_name_state()?,
            TokenizerState::AttributeValue => self.handle_attribute_value_state()?,
            TokenizerState::ClosingTag => self.handle_closing_tag_state()?,
            TokenizerState::CommentBody => self.handle_comment_body_state()?,
            TokenizerState::DoctypeBody => self.handle_doctype_body_state()?,
            TokenizerState::Done => self.handle_done_state()?,
        };
        Ok(())
    }

    /// Accumulate text until `<` or end of input. The `<` is left for
    /// the tag-open state.
    fn handle_text_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        loop {
            match self.scanner.next() {
                Some('<') => {
                    self.scanner.backup()?;
                    self.emit_pending_text()?;
                    return Ok(TokenizerState::TagOpenStart);
                }
                None => {
                    self.emit_pending_text()?;
                    return Ok(TokenizerState::Done);
                }
                Some(_) => {}
            }
        }
    }

    /// Consume `<` and route on the rune after it.
    fn handle_tag_open_start_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        let _ = self.scanner.next();
        match self.scanner.peek() {
            // A lone `<` at the very end
            None => self.emit_fragment_as_text(),
            Some('/') => Ok(TokenizerState::ClosingTag),
            Some('!') => {
                let _ = self.scanner.next();
                if self.scanner.accept_prefix("--") {
                    Ok(TokenizerState::CommentBody)
                } else if self.scanner.accept_keyword_ignore_case("DOCTYPE") {
                    Ok(TokenizerState::DoctypeBody)
                } else {
                    Ok(self.recover_as_text())
                }
            }
            Some(_) => Ok(TokenizerState::TagName),
        }
    }

    /// Read the tag name up to whitespace, `/` or `>`.
    fn handle_tag_name_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        let name_start = self.scanner.position();
        loop {
            match self.scanner.next() {
                None => return self.emit_fragment_as_text(),
                Some(c) if is_tag_delimiter(c) => {
                    self.scanner.backup()?;
                    break;
                }
                // A name never starts with another `<`
                Some('<') if self.scanner.position() - 1 == name_start => {
                    self.scanner.backup()?;
                    break;
                }
                Some(_) => {}
            }
        }

        let name = self
            .scanner
            .slice(name_start, self.scanner.position())
            .to_string();
        if name.is_empty() {
            // `<` followed by whitespace, `>` or `<`: keep `<` and the rune
            // after it as text, unless that rune may start a tag itself.
            if self.scanner.peek() != Some('<') {
                let _ = self.scanner.next();
            }
            return Ok(self.recover_as_text());
        }
        self.current_tag = Some(PendingTag {
            name,
            ..PendingTag::default()
        });

        match self.scanner.peek() {
            Some('>') => {
                let _ = self.scanner.next();
                self.emit_open_tag(false)?;
                Ok(TokenizerState::Text)
            }
            Some('/') => {
                let _ = self.scanner.next();
                if self.scanner.accept(">") {
                    self.emit_open_tag(true)?;
                    Ok(TokenizerState::Text)
                } else {
                    Ok(TokenizerState::AttributeList)
                }
            }
            _ => Ok(TokenizerState::AttributeList),
        }
    }

    /// Skip whitespace, then close the tag or start the next attribute.
    fn handle_attribute_list_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        let _ = self.scanner.accept_while(is_whitespace);
        match self.scanner.peek() {
            None => self.emit_fragment_as_text(),
            Some('>') => {
                let _ = self.scanner.next();
                self.emit_open_tag(false)?;
                Ok(TokenizerState::Text)
            }
            Some('/') => {
                let _ = self.scanner.next();
                if self.scanner.accept(">") {
                    self.emit_open_tag(true)?;
                    Ok(TokenizerState::Text)
                } else {
                    // Stray solidus
                    Ok(TokenizerState::AttributeList)
                }
            }
            Some(_) => Ok(TokenizerState::AttributeName),
        }
    }

    /// Read an attribute name up to `=`, whitespace, `/` or `>`.
    fn handle_attribute_name_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        let name_start = self.scanner.position();
        // The first rune is part of the name even if it is `=`.
        let _ = self.scanner.next();
        loop {
            match self.scanner.next() {
                None => return self.emit_fragment_as_text(),
                Some(c) if c == '=' || is_tag_delimiter(c) => {
                    self.scanner.backup()?;
                    break;
                }
                Some(_) => {}
            }
        }
        let name = self
            .scanner
            .slice(name_start, self.scanner.position())
            .to_string();

        let _ = self.scanner.accept_while(is_whitespace);
        if self.scanner.accept("=") {
            if let Some(tag) = self.current_tag.as_mut() {
                tag.attribute_name = Some(name);
            }
            return Ok(TokenizerState::AttributeValue);
        }
        self.push_attribute(name, String::new());
        Ok(TokenizerState::AttributeList)
    }

    /// Read a quoted or unquoted value after `=`.
    fn handle_attribute_value_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        let _ = self.scanner.accept_while(is_whitespace);
        let name = self
            .current_tag
            .as_mut()
            .and_then(|tag| tag.attribute_name.take())
            .unwrap_or_default();

        match self.scanner.next() {
            None => self.emit_fragment_as_text(),
            Some(quote @ ('"' | '\'')) => {
                let value_start = self.scanner.position();
                let closing = if quote == '"' { "\"" } else { "'" };
                let terminated = self.scanner.skip_until(closing);
                let value = self
                    .scanner
                    .slice(value_start, self.scanner.position())
                    .to_string();
                self.push_attribute(name, value);
                if terminated {
                    let _ = self.scanner.next();
                    Ok(TokenizerState::AttributeList)
                } else {
                    self.record_issue(IssueKind::UnterminatedConstruct, value_start - 1);
                    self.emit_open_tag(false)?;
                    Ok(TokenizerState::Done)
                }
            }
            Some(_) => {
                self.scanner.backup()?;
                let value_start = self.scanner.position();
                let _ = self
                    .scanner
                    .accept_while(|c| !is_whitespace(c) && c != '>');
                let value = self
                    .scanner
                    .slice(value_start, self.scanner.position())
                    .to_string();
                self.push_attribute(name, value);
                Ok(TokenizerState::AttributeList)
            }
        }
    }

    /// Consume `/` and the name, with whitespace allowed around the name.
    /// Junk after the name is dropped up to `>`, but never past a `<`.
    fn handle_closing_tag_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        let _ = self.scanner.next();
        let _ = self.scanner.accept_while(is_whitespace);
        let name_start = self.scanner.position();
        let _ = self
            .scanner
            .accept_while(|c| !is_tag_delimiter(c) && c != '<');
        let name = self
            .scanner
            .slice(name_start, self.scanner.position())
            .to_string();
        if name.is_empty() {
            return Ok(self.recover_as_text());
        }

        let _ = self.scanner.accept_while(|c| is_whitespace(c) || c == '/');
        let junk = match self.scanner.peek() {
            None => return self.emit_fragment_as_text(),
            Some('>') => {
                let _ = self.scanner.next();
                None
            }
            Some(_) => {
                let junk_start = self.scanner.position();
                if !self.scanner.skip_to_any(&['>', '<']) {
                    return self.emit_fragment_as_text();
                }
                // A `<` is left for the text state so the markup it opens
                // is still tokenized.
                let _ = self.scanner.accept(">");
                Some(junk_start)
            }
        };

        let tag_start = self.scanner.start();
        if !self.depth.close() {
            self.record_issue(IssueKind::DepthUnderflow, tag_start);
        }
        if let Some(position) = junk {
            self.record_issue(IssueKind::MalformedTag, position);
        }
        self.emit(Token::CloseTag { name })?;
        Ok(TokenizerState::Text)
    }

    /// Everything up to `-->` is the comment.
    fn handle_comment_body_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        let content_start = self.scanner.position();
        let terminated = self.scanner.skip_until("-->");
        let content = self
            .scanner
            .slice(content_start, self.scanner.position())
            .to_string();
        if terminated {
            let _ = self.scanner.accept_prefix("-->");
            self.emit(Token::Comment { content })?;
            Ok(TokenizerState::Text)
        } else {
            self.record_issue(IssueKind::UnterminatedConstruct, self.scanner.start());
            self.emit(Token::Comment { content })?;
            Ok(TokenizerState::Done)
        }
    }

    /// Everything up to `>` is the doctype content, unparsed.
    fn handle_doctype_body_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        let content_start = self.scanner.position();
        let terminated = self.scanner.skip_until(">");
        let content = self
            .scanner
            .slice(content_start, self.scanner.position())
            .to_string();
        if terminated {
            let _ = self.scanner.next();
            self.emit(Token::Doctype { content })?;
            Ok(TokenizerState::Text)
        } else {
            self.record_issue(IssueKind::UnterminatedConstruct, self.scanner.start());
            self.emit(Token::Doctype { content })?;
            Ok(TokenizerState::Done)
        }
    }

    /// Queue the end-of-stream token the first time through; afterwards a
    /// no-op.
    fn handle_done_state(&mut self) -> Result<TokenizerState, TokenizerError> {
        if !self.finished {
            self.emit(Token::EndOfStream)?;
            self.finished = true;
        }
        Ok(TokenizerState::Done)
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Token, TokenizerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Iterator over `(token, span)` pairs. See [`Tokenizer::spanned`].
#[derive(Debug)]
pub struct SpannedTokens {
    tokenizer: Tokenizer,
}

impl SpannedTokens {
    /// The underlying tokenizer, for depth and issue inspection mid-stream.
    #[must_use]
    pub const fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

impl Iterator for SpannedTokens {
    type Item = Result<(Token, SourceSpan), TokenizerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokenizer.next_spanned().transpose()
    }
}

/// Tokenize `input` eagerly.
///
/// # Errors
///
/// Returns a [`TokenizerError`] only on an internal defect; malformed
/// markup is never an error.
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    let mut tokenizer = Tokenizer::new(input);
    tokenizer.run()?;
    Ok(tokenizer.into_tokens())
}

/// Whitespace as far as tag syntax is concerned.
pub(super) const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Runes that end a tag or attribute name.
pub(super) const fn is_tag_delimiter(c: char) -> bool {
    is_whitespace(c) || c == '/' || c == '>'
}
