use crate::ai::genai_backend::Provider;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// LLM-powered extraction of Prior Authorization requirements from insurance policy PDFs
#[derive(Parser, Debug)]
#[command(
    name = "priorscan",
    about = "Extract services requiring Prior Authorization from insurance policy PDFs",
    version,
    long_about = "priorscan scans an insurance policy PDF for pages mentioning Prior \
                  Authorization, classifies each candidate region with an LLM, and emits \
                  a deduplicated list of covered services requiring Prior Authorization. \
                  It supports multiple AI backends (Ollama, OpenAI, Claude, Gemini, Grok, Groq)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Extract Prior Authorization services from a policy PDF",
        long_about = "Extracts per-page text, locates pages mentioning the trigger phrase, \
                      classifies each three-page window with the configured LLM, and prints \
                      the deduplicated services.\n\n\
                      Examples:\n  \
                      priorscan extract policy.pdf\n  \
                      priorscan extract policy.pdf --format json\n  \
                      priorscan extract policy.pdf --backend ollama --model qwen2.5:7b"
    )]
    Extract(ExtractArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(value_name = "PDF", help = "Path to the insurance policy PDF")]
    pub pdf_path: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'b',
        long,
        value_enum,
        help = "AI backend provider (default from PRIORSCAN_PROVIDER, else ollama)"
    )]
    pub backend: Option<Provider>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name to use (provider-specific, e.g., 'qwen2.5:7b' for Ollama)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Request timeout in seconds (default 60)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'c',
        long,
        value_name = "N",
        help = "Number of concurrent classification calls (default 8)"
    )]
    pub concurrency: Option<usize>,

    #[arg(
        long,
        value_name = "N",
        help = "Attempts per classification call, counting the first (default 3)"
    )]
    pub max_attempts: Option<u32>,

    #[arg(
        long,
        value_name = "PHRASE",
        help = "Trigger phrase flagging candidate pages (default 'Prior Authorization')"
    )]
    pub trigger: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    /// Titled service blocks for reading in a terminal
    Human,
    /// Full report as JSON
    Json,
}
