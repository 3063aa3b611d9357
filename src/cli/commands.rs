//! CLI command implementations
//!
//! Session commands build one coordinator from the loaded config. One-shot
//! commands drive a single intent; `shell` reads intents line by line and
//! renders the session each time it changes.

use std::io::Write;
use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::Config;
use crate::coordinator::{ExplanationOutcome, PredictionOutcome, RequestCoordinator};
use crate::model::{RawPredictionInput, COEFFICIENTS};
use crate::observability::{log_event_with_fields, Event, Logger};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{
    parse_intent, print_block, render_session, render_validation_error, write_block, Intent, HELP,
};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.config.as_deref(), cli.command).await
}

/// Run one command against the given config file
pub async fn run_command(config_path: Option<&Path>, cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Formula => formula(),
        Command::Predict { param1, param2 } => {
            let coordinator = boot(config_path)?;
            predict(&coordinator, &RawPredictionInput::new(param1, param2)).await
        }
        Command::Explain => explain(&boot(config_path)?).await,
        Command::Shell => {
            let coordinator = boot(config_path)?;
            let input = BufReader::new(tokio::io::stdin());
            shell(coordinator, input, &mut std::io::stdout()).await
        }
    }
}

/// Load config, apply the log level and start a session.
fn boot(config_path: Option<&Path>) -> CliResult<RequestCoordinator> {
    let config = Config::load_or_default(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("source", source.as_str()), ("log_level", config.log_level.as_str())],
    );

    Ok(RequestCoordinator::new(config.gateway.build(), config.coordinator()))
}

/// Print the model formula
pub fn formula() -> CliResult<()> {
    print_block(&format!(
        "{}\n{}",
        COEFFICIENTS.display_formula(),
        COEFFICIENTS.formula()
    ))
}

/// Compute one prediction
///
/// Nothing else submits on this coordinator, so `Superseded` only shows up
/// if it is shared with another caller.
pub async fn predict(coordinator: &RequestCoordinator, raw: &RawPredictionInput) -> CliResult<()> {
    match coordinator.submit_prediction(raw).await {
        Ok(PredictionOutcome::Published(result)) => {
            print_block(&format!("Predicted Output (y): {}", result))
        }
        Ok(PredictionOutcome::Superseded) => Err(CliError::prediction_superseded()),
        Err(err) => {
            print_block(&render_validation_error(&err))?;
            Err(CliError::validation_failed(err.to_string()))
        }
    }
}

/// Fetch the explanation once
pub async fn explain(coordinator: &RequestCoordinator) -> CliResult<()> {
    match coordinator.request_explanation().await {
        ExplanationOutcome::Loaded(text) => print_block(&text),
        ExplanationOutcome::Failed(notice) => {
            print_block(&format!("Error: {}", notice))?;
            Err(CliError::explanation_failed(notice))
        }
        ExplanationOutcome::Suppressed { state } => Err(CliError::explanation_failed(format!(
            "explanation already {}",
            state
        ))),
    }
}

/// Interactive session
///
/// Intents run as independent tasks so a slow explanation never holds up a
/// prediction. Tasks and the renderer hand their output to this loop over a
/// channel; only this loop writes to `out`. `quit` (or end of input) waits
/// for in-flight work, then prints the final session.
pub async fn shell<R, W>(coordinator: RequestCoordinator, input: R, out: &mut W) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write_block(out, &render_session(&coordinator.snapshot()))?;

    let (output, mut blocks) = mpsc::unbounded_channel::<String>();

    let mut updates = coordinator.subscribe();
    let renderer_output = output.clone();
    let renderer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let rendered = render_session(&updates.borrow_and_update());
            if renderer_output.send(rendered).is_err() {
                break;
            }
        }
    });

    let mut tasks: JoinSet<()> = JoinSet::new();
    let mut lines = input.lines();

    loop {
        tokio::select! {
            biased;

            Some(block) = blocks.recv() => write_block(out, &block)?,

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let intent = match parse_intent(&line) {
                    Ok(Some(intent)) => intent,
                    Ok(None) => continue,
                    Err(message) => {
                        Logger::warn("SHELL_INTENT_REJECTED", &[("line", line.as_str())]);
                        write_block(out, &message)?;
                        continue;
                    }
                };

                match intent {
                    Intent::Predict(raw) => {
                        let coordinator = coordinator.clone();
                        let output = output.clone();
                        tasks.spawn(async move {
                            if let Err(err) = coordinator.submit_prediction(&raw).await {
                                let _ = output.send(render_validation_error(&err));
                            }
                        });
                    }
                    Intent::Expand => {
                        let coordinator = coordinator.clone();
                        tasks.spawn(async move {
                            coordinator.request_explanation().await;
                        });
                    }
                    Intent::Retry => {
                        if !coordinator.config().allow_explanation_retry {
                            write_block(out, "retry is disabled for this session")?;
                            continue;
                        }
                        let coordinator = coordinator.clone();
                        let output = output.clone();
                        tasks.spawn(async move {
                            if let ExplanationOutcome::Suppressed { state } =
                                coordinator.retry_explanation().await
                            {
                                let _ = output
                                    .send(format!("nothing to retry (explanation is {})", state));
                            }
                        });
                    }
                    Intent::State => write_block(out, &render_session(&coordinator.snapshot()))?,
                    Intent::Metrics => write_block(out, &coordinator.metrics().to_json())?,
                    Intent::Help => write_block(out, HELP)?,
                    Intent::Quit => break,
                }

                // Reap finished tasks so the set does not grow for the whole session
                while let Some(joined) = tasks.try_join_next() {
                    report_task(joined);
                }
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        report_task(joined);
    }
    renderer.abort();

    while let Ok(block) = blocks.try_recv() {
        write_block(out, &block)?;
    }
    write_block(out, &render_session(&coordinator.snapshot()))
}

fn report_task(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        Logger::error("SHELL_TASK_FAILED", &[("error", err.to_string().as_str())]);
    }
}
