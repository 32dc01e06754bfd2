//! CLI command handlers
//!
//! Each handler wires configuration, backend, and the extraction service
//! together and returns a process exit code. Rendering lives here, outside
//! the pipeline: the core hands back a report, the handler decides how to
//! show it.

use crate::cli::commands::{ExtractArgs, OutputFormatArg};
use crate::config::PriorscanConfig;
use crate::extraction::service::ExtractionService;
use crate::extraction::types::ExtractionReport;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Handles `priorscan extract`.
pub async fn handle_extract(args: &ExtractArgs, quiet: bool) -> i32 {
    let mut config = match PriorscanConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    // CLI flags override the environment.
    if let Some(provider) = args.backend {
        config.provider = provider;
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        config.pool_width = concurrency;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }
    if let Some(trigger) = &args.trigger {
        config.trigger_phrase = trigger.clone();
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        eprintln!("Error: {}", e);
        return 2;
    }

    let bytes = match std::fs::read(&args.pdf_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Cannot read {}: {}", args.pdf_path.display(), e);
            eprintln!("Error: cannot read {}: {}", args.pdf_path.display(), e);
            return 1;
        }
    };

    let backend = match config.create_backend() {
        Ok(backend) => backend,
        Err(e) => {
            error!("Backend initialization failed: {}", e);
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    info!(
        "Extracting from {} ({} bytes) using {}:{}",
        args.pdf_path.display(),
        bytes.len(),
        config.provider,
        config.model
    );

    let service = ExtractionService::new(Arc::new(backend), config.pipeline());
    let report = match service.process(&bytes).await {
        Ok(report) => report,
        Err(e) => {
            error!("Extraction failed: {}", e);
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    for failure in &report.failures {
        warn!(
            "Window {} failed at {} stage: {}",
            failure.window, failure.stage, failure.error
        );
    }

    let rendered = match args.format {
        OutputFormatArg::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return 1;
            }
        },
        OutputFormatArg::Human => render_human(&report, quiet),
    };

    if let Some(path) = &args.output {
        if let Err(e) = write_output(path, &rendered) {
            error!("Cannot write {}: {}", path.display(), e);
            eprintln!("Error: cannot write {}: {}", path.display(), e);
            return 1;
        }
        if !quiet {
            println!("Report written to {}", path.display());
        }
    } else {
        println!("{}", rendered);
    }

    0
}

/// Renders the report as titled service blocks.
fn render_human(report: &ExtractionReport, quiet: bool) -> String {
    let mut out = String::new();

    if report.services.is_empty() {
        out.push_str("No services requiring Prior Authorization were identified.\n");
    } else {
        for record in &report.services {
            out.push_str(&format!("## {}\n{}\n\n", record.service, record.details));
        }
    }

    if !quiet {
        out.push_str(&format!(
            "{} service(s) from {} window(s) across {} page(s) in {}ms\n",
            report.services.len(),
            report.windows_submitted,
            report.page_count,
            report.processing_time_ms
        ));
        if !report.is_complete() {
            out.push_str(&format!(
                "Warning: {} window(s) failed; results may be incomplete.\n",
                report.failures.len()
            ));
        }
    }

    out
}

fn write_output(path: &Path, content: &str) -> std::io::Result<()> {
    std::fs::write(path, content)
}
