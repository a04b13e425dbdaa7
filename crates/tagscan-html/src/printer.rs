//! Human-readable token dumps.
//!
//! Each token goes on its own line, indented four spaces per nesting level.
//! Depth is replayed from the tokens themselves, so any slice of a stream
//! can be printed.

use std::fmt::Write;

use strum::IntoEnumIterator;

use crate::tokenizer::{DepthTracker, IssueKind, Token, TokenizeIssue};

/// Render `tokens` one per line, indented by nesting depth.
#[must_use]
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut depth = DepthTracker::new();
    let mut out = String::new();
    for token in tokens {
        if matches!(token, Token::CloseTag { .. }) {
            let _ = depth.close();
        }
        // One line per token, even for multi-line comments
        let line = token.to_string().replace('\n', "\\n");
        let _ = writeln!(out, "{}{line}", depth.indent());
        if let Token::OpenTag { self_closing, .. } = token {
            depth.open(*self_closing);
        }
    }
    out
}

/// Print `tokens` to stdout, indented by nesting depth.
pub fn print_tokens(tokens: &[Token]) {
    print!("{}", format_tokens(tokens));
}

/// Count issues per kind, in declaration order of [`IssueKind`]. Kinds
/// that did not occur are left out.
#[must_use]
pub fn summarize_issues(issues: &[TokenizeIssue]) -> Vec<(IssueKind, usize)> {
    IssueKind::iter()
        .map(|kind| (kind, issues.iter().filter(|i| i.kind == kind).count()))
        .filter(|&(_, count)| count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    #[test]
    fn nested_tags_are_indented() {
        let tokens = tokenize("<ul><li>a</li></ul>").unwrap();
        let expected = "<ul>\n    <li>\n        Text(\"a\")\n    </li>\n</ul>\nEOS\n";
        assert_eq!(format_tokens(&tokens), expected);
    }

    #[test]
    fn self_closing_tags_do_not_indent() {
        let tokens = tokenize("<br/>x").unwrap();
        assert_eq!(format_tokens(&tokens), "<br />\nText(\"x\")\nEOS\n");
    }

    #[test]
    fn multi_line_comment_stays_on_one_line() {
        let tokens = tokenize("<!--a\nb-->").unwrap();
        assert_eq!(format_tokens(&tokens), "<!--a\\nb-->\nEOS\n");
    }

    #[test]
    fn stray_close_tag_stays_at_column_zero() {
        let tokens = tokenize("</p>").unwrap();
        assert_eq!(format_tokens(&tokens), "</p>\nEOS\n");
    }

    #[test]
    fn issues_are_counted_per_kind() {
        let mut tokenizer = crate::Tokenizer::new("</a></b><!-- open");
        tokenizer.run().unwrap();
        let summary = summarize_issues(tokenizer.issues());
        assert_eq!(
            summary,
            vec![
                (IssueKind::UnterminatedConstruct, 1),
                (IssueKind::DepthUnderflow, 2),
            ]
        );
    }
}
