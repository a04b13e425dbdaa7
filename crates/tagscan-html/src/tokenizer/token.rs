use core::fmt;
use core::ops::Range;

use serde::Serialize;

/// An attribute on an open tag token.
///
/// Attributes keep source order and are never deduplicated: a later
/// attribute with the same name as an earlier one is a separate entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name, exactly as written in the source.
    pub name: String,
    /// Attribute value without surrounding quotes. Empty for valueless
    /// (boolean) attributes such as `disabled`.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// One classified unit of markup emitted by the tokenizer.
///
/// A stream always ends with exactly one [`Token::EndOfStream`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    /// A maximal run of characters outside any tag markup.
    Text {
        /// The raw text, with no entity decoding applied.
        content: String,
    },

    /// `<name attr="value">` or, when `self_closing` is set, `<name/>`.
    OpenTag {
        /// The tag name.
        name: String,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
        /// Set when the tag ended with `/>`.
        self_closing: bool,
    },

    /// `</name>`.
    CloseTag {
        /// The tag name.
        name: String,
    },

    /// `<!--content-->`.
    Comment {
        /// Everything between `<!--` and `-->`.
        content: String,
    },

    /// `<!DOCTYPE content>`. The content is raw; nothing inside it is parsed.
    Doctype {
        /// Everything between the `DOCTYPE` keyword and `>`.
        content: String,
    },

    /// Marks the end of input.
    EndOfStream,
}

impl Token {
    /// Create a text token.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create an open tag token.
    #[must_use]
    pub fn open_tag(name: impl Into<String>, attributes: Vec<Attribute>, self_closing: bool) -> Self {
        Self::OpenTag {
            name: name.into(),
            attributes,
            self_closing,
        }
    }

    /// Create a close tag token.
    #[must_use]
    pub fn close_tag(name: impl Into<String>) -> Self {
        Self::CloseTag { name: name.into() }
    }

    /// Create a comment token.
    #[must_use]
    pub fn comment(content: impl Into<String>) -> Self {
        Self::Comment {
            content: content.into(),
        }
    }

    /// Create a doctype token.
    #[must_use]
    pub fn doctype(content: impl Into<String>) -> Self {
        Self::Doctype {
            content: content.into(),
        }
    }

    /// Returns true if this is the end-of-stream token.
    #[must_use]
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// The tag name of an open or close tag token.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::OpenTag { name, .. } | Self::CloseTag { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { content } => {
                // Show whitespace explicitly
                let display = content.replace('\n', "\\n").replace('\t', "\\t");
                write!(f, "Text(\"{display}\")")
            }
            Self::OpenTag {
                name,
                attributes,
                self_closing,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    if attr.value.is_empty() {
                        write!(f, " {}", attr.name)?;
                    } else {
                        write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                    }
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::CloseTag { name } => write!(f, "</{name}>"),
            Self::Comment { content } => write!(f, "<!--{content}-->"),
            Self::Doctype { content } => write!(f, "<!DOCTYPE{content}>"),
            Self::EndOfStream => write!(f, "EOS"),
        }
    }
}

/// The byte range of the source a token was scanned from.
///
/// Both ends lie on character boundaries. Spans of consecutive tokens are
/// contiguous, so concatenating them reproduces the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl SourceSpan {
    /// Create a span covering `start..end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for the zero-width span of the end-of-stream token.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The span as a range, for slicing the source.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
