//! tagscan CLI
//!
//! Loads a document and dumps its token stream, for testing and debugging
//! the tokenizer.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use tagscan_common::warning::clear_warnings;
use tagscan_html::{
    SourceSpan, Token, Tokenizer, TokenizerOptions, format_tokens, print_tokens, summarize_issues,
};

/// tagscan — dump the token stream of an HTML-like document
#[derive(Parser, Debug)]
#[command(name = "tagscan")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the indented token stream of a file
    tagscan ./index.html

    # Tokenize an inline string
    tagscan --html '<p class="x">Hi</p>'

    # Emit JSON instead
    tagscan --json ./index.html

    # Show source byte ranges and the issue summary
    tagscan --spans --issues ./index.html
"#)]
struct Cli {
    /// Path to the document to tokenize
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Tokenize this string instead of reading a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the tokens as a JSON array
    #[arg(long)]
    json: bool,

    /// Prefix each token with the byte range it was scanned from
    #[arg(long)]
    spans: bool,

    /// Print recoverable issues and the final nesting depth
    #[arg(long)]
    issues: bool,

    /// Do not print warnings while tokenizing
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let input = load_input(&cli)?;

    clear_warnings();
    let options = TokenizerOptions {
        report_warnings: !cli.quiet,
    };
    let mut tokenizer = Tokenizer::with_options(input, options);
    let mut tokens = Vec::new();
    let mut spans = Vec::new();
    while let Some((token, span)) = tokenizer.next_spanned()? {
        tokens.push(token);
        spans.push(span);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else if cli.spans {
        print_with_spans(&tokens, &spans);
    } else {
        print_tokens(&tokens);
    }

    if cli.issues {
        print_issues(&tokenizer);
    }
    Ok(())
}

fn load_input(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        return Ok(html.clone());
    }
    let Some(ref path) = cli.path else {
        bail!("Nothing to tokenize: pass a FILE or --html '<p>...</p>'");
    };
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn print_with_spans(tokens: &[Token], spans: &[SourceSpan]) {
    let rendered = format_tokens(tokens);
    for (line, span) in rendered.lines().zip(spans) {
        let range = format!("{:>12}", span.to_string());
        println!("{}  {line}", range.dimmed());
    }
}

fn print_issues(tokenizer: &Tokenizer) {
    println!("\n=== Issues ===");
    if tokenizer.issues().is_empty() {
        println!("{}", "none".green());
    }
    for issue in tokenizer.issues() {
        println!(
            "{} line {} (byte {})",
            issue.kind.to_string().yellow(),
            issue.line,
            issue.position
        );
    }
    for (kind, count) in summarize_issues(tokenizer.issues()) {
        println!("  {kind}: {count}");
    }
    println!("\n=== Depth ===");
    println!("final {}, max {}", tokenizer.depth(), tokenizer.max_depth());
}
