//! Property tests over generated markup.

use quickcheck_macros::quickcheck;
use tagscan_html::tokenizer::DepthTracker;
use tagscan_html::{SourceSpan, Token, Tokenizer};

/// Markup fragments that exercise every state and most recovery paths.
const PIECES: &[&str] = &[
    "<", ">", "/", "!", "-", "--", "=", "\"", "'", " ", "\n", "a", "div", "é", "€", "text",
    "<p>", "</p>", "<br/>", "<!--", "-->", "<!DOCTYPE", "<a x=", "\"v\"", "'w'", "</",
];

fn assemble(indices: &[u8]) -> String {
    indices
        .iter()
        .map(|&i| PIECES[usize::from(i) % PIECES.len()])
        .collect()
}

fn spanned(input: &str) -> Vec<(Token, SourceSpan)> {
    Tokenizer::new(input)
        .spanned()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn stream_ends_with_single_eos(input: &str) -> bool {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token().unwrap() {
        tokens.push(token);
    }
    let eos_count = tokens.iter().filter(|t| t.is_end_of_stream()).count();
    eos_count == 1
        && tokens.last().is_some_and(Token::is_end_of_stream)
        && tokenizer.next_token().unwrap().is_none()
}

fn spans_reconstruct_input(input: &str) -> bool {
    let items = spanned(input);
    let mut expected_start = 0;
    let mut rebuilt = String::new();
    for (_, span) in &items {
        if span.start != expected_start {
            return false;
        }
        rebuilt.push_str(&input[span.range()]);
        expected_start = span.end;
    }
    rebuilt == input
}

#[quickcheck]
fn markup_stream_ends_with_single_eos(indices: Vec<u8>) -> bool {
    stream_ends_with_single_eos(&assemble(&indices))
}

#[quickcheck]
fn arbitrary_stream_ends_with_single_eos(input: String) -> bool {
    stream_ends_with_single_eos(&input)
}

#[quickcheck]
fn markup_spans_reconstruct_input(indices: Vec<u8>) -> bool {
    spans_reconstruct_input(&assemble(&indices))
}

#[quickcheck]
fn arbitrary_spans_reconstruct_input(input: String) -> bool {
    spans_reconstruct_input(&input)
}

#[quickcheck]
fn text_tokens_match_their_source(indices: Vec<u8>) -> bool {
    let input = assemble(&indices);
    spanned(&input).iter().all(|(token, span)| match token {
        Token::Text { content } => content == &input[span.range()],
        _ => true,
    })
}

#[quickcheck]
fn depth_matches_replayed_tokens(indices: Vec<u8>) -> bool {
    let input = assemble(&indices);
    let mut tokenizer = Tokenizer::new(input.as_str());
    let mut replay = DepthTracker::new();
    while let Some(token) = tokenizer.next_token().unwrap() {
        match token {
            Token::OpenTag { self_closing, .. } => replay.open(self_closing),
            Token::CloseTag { .. } => {
                let _ = replay.close();
            }
            _ => {}
        }
        if tokenizer.depth() != replay.depth() {
            return false;
        }
    }
    true
}

#[quickcheck]
fn balanced_tags_return_to_zero(names: Vec<u8>) -> bool {
    let mut input = String::new();
    for n in &names {
        input.push_str(&format!("<t{n}>"));
    }
    for n in names.iter().rev() {
        input.push_str(&format!("</t{n}>"));
    }
    let mut tokenizer = Tokenizer::new(input);
    tokenizer.run().unwrap();
    tokenizer.depth() == 0 && tokenizer.max_depth() == names.len() && tokenizer.issues().is_empty()
}

#[quickcheck]
fn attribute_order_and_duplicates_are_preserved(names: Vec<u8>) -> bool {
    let mut input = String::from("<e");
    for (i, n) in names.iter().enumerate() {
        input.push_str(&format!(" a{} = \"{i}\"", n % 4));
    }
    input.push('>');
    let tokens = tagscan_html::tokenize(&input).unwrap();
    match &tokens[0] {
        Token::OpenTag { attributes, .. } => {
            attributes.len() == names.len()
                && attributes.iter().zip(&names).enumerate().all(|(i, (attr, n))| {
                    attr.name == format!("a{}", n % 4) && attr.value == i.to_string()
                })
        }
        _ => false,
    }
}

#[quickcheck]
fn self_closing_tags_never_nest(count: u8) -> bool {
    let input = "<br/><img src='x'/>".repeat(usize::from(count));
    let mut tokenizer = Tokenizer::new(input);
    tokenizer.run().unwrap();
    tokenizer.max_depth() == 0
}
