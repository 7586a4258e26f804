//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use clarity_domain::Language;
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted console report
    Text,
    /// JSON report
    Json,
}

/// CLI arguments for legal-clarity
#[derive(Parser, Debug)]
#[command(name = "legal-clarity")]
#[command(author, version, about = "Plain-language help with Indian legal documents")]
#[command(long_about = r#"
Legal Clarity reads a legal document and explains it in plain language.

It summarizes the document, flags risky clauses with a severity, suggests
how to negotiate them, lists each party's obligations, answers questions,
translates the summary into Indian languages and reads it aloud.

Configuration files are loaded from (in priority order):
1. LEGAL_CLARITY_* environment variables (e.g. LEGAL_CLARITY_MODEL__VOICE)
2. --config <path>             Explicit config file
3. ./legal-clarity.toml        Project-level config
4. ~/.config/legal-clarity/config.toml   Global config

The Gemini API key is read from GEMINI_API_KEY unless [model] api_key_env
says otherwise.

Example:
  legal-clarity analyze lease.txt --tips --language hindi
  legal-clarity analyze --sample --obligations --speak
  legal-clarity chat lease.txt
  legal-clarity draft --client "Asha Rao" --freelancer "Vikram Iyer" \
      --scope "Build an inventory app" --amount 80000 \
      --terms "50% upfront, 50% on delivery" --deadline "30 June 2025"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize a document and flag risky clauses
    Analyze(AnalyzeArgs),
    /// Ask questions about a document interactively
    Chat(DocumentArgs),
    /// Draft a freelancer agreement
    Draft(DraftArgs),
}

/// Which document to load
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Plain UTF-8 text file containing the document
    #[arg(value_name = "FILE", required_unless_present = "sample")]
    pub file: Option<PathBuf>,

    /// Use the bundled sample rental agreement
    #[arg(long, conflicts_with = "file")]
    pub sample: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Also show the summary in this language (Hindi, Tamil, Telugu,
    /// Kannada, Bengali, Marathi)
    #[arg(short, long, value_name = "LANGUAGE")]
    pub language: Option<Language>,

    /// Fetch a negotiation tip for every risk
    #[arg(long)]
    pub tips: bool,

    /// List each party's obligations
    #[arg(long)]
    pub obligations: bool,

    /// Party you represent (defaults to [session] user_party)
    #[arg(long, value_name = "PARTY", requires = "obligations")]
    pub user_party: Option<String>,

    /// Counterparty (defaults to [session] other_party)
    #[arg(long, value_name = "PARTY", requires = "obligations")]
    pub other_party: Option<String>,

    /// Read the summary aloud
    #[arg(long)]
    pub speak: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct DraftArgs {
    /// Client's full name
    #[arg(long)]
    pub client: String,

    /// Freelancer's full name
    #[arg(long)]
    pub freelancer: String,

    /// What the freelancer will deliver
    #[arg(long)]
    pub scope: String,

    /// Total payment in INR
    #[arg(long)]
    pub amount: f64,

    /// How the payment is split and when it is due
    #[arg(long)]
    pub terms: String,

    /// Completion deadline
    #[arg(long)]
    pub deadline: String,

    /// Write the agreement to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}
