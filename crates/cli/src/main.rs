mod args;

use std::collections::HashMap;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use sweep_domain::{BatchResult, FieldCheck};
use sweep_executor::{BulkTransitionExecutor, LOG_PREFIX, LogSink, WriterSink, report_summary};
use sweep_tracker::TrackerClient;
use sweep_tracker_jira::JiraTracker;

use crate::args::Cli;

const EXIT_OK: u8 = 0;
/// Some issues could not be updated.
const EXIT_PARTIAL: u8 = 1;
/// Misconfiguration or failed search; nothing was updated.
const EXIT_FATAL: u8 = 2;
const EXIT_CANCELLED: u8 = 130;

fn exit_code_for(batch: &BatchResult) -> u8 {
    if batch.incomplete {
        EXIT_CANCELLED
    } else if batch.is_success() {
        EXIT_OK
    } else {
        EXIT_PARTIAL
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("jira-sweep: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let out: Box<dyn Write + Send> = if cli.json {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    let sink = WriterSink::new(out);

    let config = cli.sweep_config()?;
    if cli.check {
        return Ok(report_checks(&config.checks(), &sink));
    }

    let mut env: HashMap<String, String> = std::env::vars().collect();
    env.extend(cli.vars.iter().cloned());

    let (query, request) = match config.resolve(&env) {
        Ok(resolved) => resolved,
        Err(e) => {
            sink.write_line(&format!("{LOG_PREFIX} {e}"));
            tracing::error!(error = %e, "configuration rejected");
            return Ok(EXIT_FATAL);
        }
    };

    let tracker: Option<Arc<dyn TrackerClient>> = match cli.jira_config() {
        Some(jira) => Some(Arc::new(JiraTracker::new(jira)?)),
        None => None,
    };
    let executor = BulkTransitionExecutor::new(tracker).with_call_timeout(cli.call_timeout());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping after the current issue");
            on_signal.cancel();
        }
    });

    let Ok(batch) = executor.run(&query, &request, &sink, &cancel).await else {
        // the executor already reported the cause
        return Ok(EXIT_FATAL);
    };
    report_summary(&batch, &sink);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    }
    Ok(exit_code_for(&batch))
}

fn report_checks(checks: &[(&'static str, FieldCheck)], sink: &dyn LogSink) -> u8 {
    let mut code = EXIT_OK;
    for (field, check) in checks {
        match check {
            FieldCheck::Ok => sink.write_line(&format!("{field}: ok")),
            FieldCheck::Warning(msg) => sink.write_line(&format!("{field}: warning: {msg}")),
            FieldCheck::Error(msg) => {
                sink.write_line(&format!("{field}: error: {msg}"));
                code = EXIT_FATAL;
            }
        }
    }
    code
}
