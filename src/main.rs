use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};

use contract_text::docx::text::extract_document_text;
use contract_text::progress::ConsoleProgress;
use contract_text::qa::{scan_raw_text, scan_value, PhraseRules};

#[derive(Parser, Debug)]
#[command(name = "contract-text")]
#[command(about = "Contract document text extraction + disallowed-phrase QA", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract normalized plain text from a zip-based document container
    Extract {
        /// Input container (.docx)
        #[arg(value_name = "DOCX")]
        input: PathBuf,

        /// Output text file (default: <input_stem>.txt beside the input)
        #[arg(short, long, value_name = "TXT")]
        output: Option<PathBuf>,
    },
    /// Scan JSON or plain-text files for disallowed phrase occurrences
    Qa {
        /// Files to scan (JSON is traversed; anything else is treated as raw text)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Phrase rules TOML (default: built-in disallowed-language list)
        #[arg(long, value_name = "TOML")]
        rules: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(true);

    let Some(command) = args.command else {
        let mut cmd = Args::command();
        cmd.print_help().context("print help")?;
        std::process::exit(1);
    };

    match command {
        Command::Extract { input, output } => run_extract(&input, output, &progress),
        Command::Qa { files, rules } => run_qa(&files, rules, &progress),
    }
}

fn run_extract(
    input: &Path,
    output: Option<PathBuf>,
    progress: &ConsoleProgress,
) -> anyhow::Result<()> {
    if !input.is_file() {
        eprintln!("input not found: {}", input.display());
        std::process::exit(1);
    }
    let bytes =
        std::fs::read(input).with_context(|| format!("read input: {}", input.display()))?;
    let text = extract_document_text(&bytes);
    if text.is_empty() {
        eprintln!("no text extracted from {}", input.display());
        std::process::exit(1);
    }
    let output = output.unwrap_or_else(|| default_text_output_for(input));
    std::fs::write(&output, &text)
        .with_context(|| format!("write output: {}", output.display()))?;
    progress.info(format!(
        "wrote {} ({} chars)",
        output.display(),
        text.chars().count()
    ));
    Ok(())
}

fn default_text_output_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let dir = input.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("{stem}.txt"))
}

fn run_qa(
    files: &[PathBuf],
    rules_path: Option<PathBuf>,
    progress: &ConsoleProgress,
) -> anyhow::Result<()> {
    if files.is_empty() {
        let mut cmd = Args::command();
        cmd.print_help().context("print help")?;
        eprintln!("\nqa requires at least one file argument");
        std::process::exit(1);
    }
    let rules = match rules_path {
        Some(p) => PhraseRules::from_toml_path(&p)?,
        None => PhraseRules::default(),
    };
    for path in files {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => {
                println!("file not found: {}", path.display());
                continue;
            }
        };
        // Input that does not parse as JSON is scanned as raw text.
        let report = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => scan_value(&value, &rules),
            Err(_) => scan_raw_text(&raw, &rules),
        };
        println!("== {}", path.display());
        print!("{}", report.render());
    }
    progress.info(format!("scanned {} file(s)", files.len()));
    Ok(())
}
