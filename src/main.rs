// src/main.rs
//
// htmlfrag: list the translatable text of an HTML file, optionally rebuild it
// with edited texts.
//
// - One line per fragment: index, DOM path, warning (if any), text.
// - --json        : print fragments as a JSON array instead
// - --tree        : also print the DOM path of every element
// - --warnings    : also print scan diagnostics
// - --attr NAME   : extract attribute NAME on every tag (repeatable)
// - --tag-attr TAG=NAME[,NAME] : extract attributes on one tag (repeatable)
// - --set N=TEXT  : replace the text of fragment N (repeatable)
// - OUTPUT        : write the rebuilt document there
//
// Logging: HTMLFRAG_LOG (EnvFilter syntax) overrides -v / -q.

use clap::{ArgAction, Parser};
use htmlfrag::{Extraction, Scanner, TagParseOptions};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Attribute extracted as text on every tag
    #[arg(long = "attr", value_name = "NAME")]
    attrs: Vec<String>,

    /// Attributes extracted as text on one tag, e.g. button=value,title
    #[arg(long = "tag-attr", value_name = "TAG=NAMES", value_parser = parse_tag_attr)]
    tag_attrs: Vec<(String, Vec<String>)>,

    /// Replace the text of fragment INDEX
    #[arg(long = "set", value_name = "INDEX=TEXT", value_parser = parse_edit)]
    edits: Vec<(usize, String)>,

    /// Print fragments as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Print the DOM path of every element
    #[arg(long, action = ArgAction::SetTrue)]
    tree: bool,

    /// Print scan warnings
    #[arg(long, action = ArgAction::SetTrue)]
    warnings: bool,

    /// Log debug diagnostics
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "verbose")]
    quiet: bool,

    /// Input file
    input: PathBuf,

    /// Output file for the rebuilt document
    output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output: {0}")]
    Stdout(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Extract(#[from] htmlfrag::Error),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("htmlfrag: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    init_tracing(cli.quiet, cli.verbose)?;

    let options = TagParseOptions::new()
        .with_default_attributes(&cli.attrs)?
        .with_tag_attributes(cli.tag_attrs.iter().map(|(tag, names)| (tag, names)));

    let src = fs::read_to_string(&cli.input).map_err(|source| CliError::Io {
        path: cli.input.clone(),
        source,
    })?;
    let mut extraction = Scanner::new(options).parse(&src);
    tracing::info!(
        input = %cli.input.display(),
        fragments = extraction.fragments().len(),
        "scanned"
    );

    for (index, text) in &cli.edits {
        extraction.set_text(*index, text.as_str())?;
    }

    let mut out = io::stdout().lock();
    print_report(&mut out, cli, &extraction)?;

    if let Some(path) = &cli.output {
        fs::write(path, extraction.render()).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

fn print_report(out: &mut impl Write, cli: &Cli, extraction: &Extraction) -> Result<(), CliError> {
    if cli.json {
        serde_json::to_writer_pretty(&mut *out, extraction.fragments())?;
        writeln!(out)?;
    } else {
        for (index, fragment) in extraction.fragments().iter().enumerate() {
            if fragment.warning().is_empty() {
                writeln!(out, "{index}\t{}\t{:?}", fragment.dom(), fragment.text())?;
            } else {
                writeln!(
                    out,
                    "{index}\t{}\t{:?}\t[{}]",
                    fragment.dom(),
                    fragment.text(),
                    fragment.warning()
                )?;
            }
        }
    }
    if cli.tree {
        for path in extraction.dom_trace() {
            writeln!(out, "{path}")?;
        }
    }
    if cli.warnings {
        for warning in extraction.warnings() {
            writeln!(out, "warning: {warning}")?;
        }
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<(), CliError> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HTMLFRAG_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| CliError::Logging(error.to_string()))
}

/* ============================ Argument parsing =========================== */

fn parse_tag_attr(arg: &str) -> Result<(String, Vec<String>), String> {
    let (tag, names) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=NAME[,NAME], got {arg:?}"))?;
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(format!("missing tag name in {arg:?}"));
    }
    let names: Vec<String> = names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        return Err(format!("missing attribute names in {arg:?}"));
    }
    Ok((tag.to_owned(), names))
}

fn parse_edit(arg: &str) -> Result<(usize, String), String> {
    let (index, text) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=TEXT, got {arg:?}"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|e| format!("invalid fragment index in {arg:?}: {e}"))?;
    Ok((index, text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn tag_attr_lists_are_split_and_trimmed() {
        assert_eq!(
            parse_tag_attr("button=value, title"),
            Ok(("button".to_owned(), vec!["value".to_owned(), "title".to_owned()]))
        );
        assert!(parse_tag_attr("button").is_err());
        assert!(parse_tag_attr("=value").is_err());
        assert!(parse_tag_attr("button=,").is_err());
    }

    #[test]
    fn edits_keep_text_verbatim() {
        assert_eq!(parse_edit("3= Hi = there"), Ok((3, " Hi = there".to_owned())));
        assert!(parse_edit("x=1").is_err());
        assert!(parse_edit("nothing").is_err());
    }

    #[test]
    fn report_lists_fragments_with_warnings() {
        let cli = Cli::parse_from(["htmlfrag", "--warnings", "in.html"]);
        let extraction = htmlfrag::extract("<p>Some text</span>");
        let mut out = Vec::new();
        print_report(&mut out, &cli, &extraction).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "0\t1:p:1\t\"Some text\"\n\
             1\tEOF\t\"\"\t[end of file]\n\
             warning: dom tree error - close tag span has no matching open tag\n"
        );
    }
}
