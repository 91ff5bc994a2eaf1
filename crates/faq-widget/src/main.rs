mod accordion;
mod answer;
mod config;
mod controller;
mod debounce;
mod error;
mod input;
mod markup;
mod model;
mod render;
mod search;
mod slug;
mod store;
mod view;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use answer::AnswerClient;
use config::Config;
use controller::{FaqController, UiEvent};
use input::{HostCommand, InputTracker, HELP};
use store::FaqStore;
use view::TerminalView;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // stderr only: stdout carries the widget itself
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting faq-widget");

    let config = Config::from_env()?;
    info!(
        base_url = %config.gemini.base_url,
        model = %config.gemini.model,
        debounce_ms = config.debounce.as_millis(),
        markup = ?config.markup,
        fragment = config.initial_fragment.as_deref().unwrap_or(""),
        "configuration loaded"
    );

    let answers = AnswerClient::new(config.gemini.clone()).map_err(error::AppError::from)?;
    info!(enabled = answers.is_configured(), "answer client ready");

    let mut controller = FaqController::new(
        FaqStore::embedded(),
        TerminalView::new(std::io::stdout()),
        Arc::new(answers),
        config.controller_settings(),
    );
    println!("{HELP}\n");
    controller.start(config.initial_fragment.as_deref());

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(read_events(tx));
    controller.run(rx).await;

    info!("faq-widget shut down");
    Ok(())
}

/// Feed stdin lines to the controller until EOF or `/quit`.
async fn read_events(tx: mpsc::Sender<UiEvent>) {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut input = InputTracker::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match stdin.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "failed to read stdin");
                break;
            }
        }
        match input.parse_bytes(&buf) {
            HostCommand::Event(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            HostCommand::Help => println!("{HELP}"),
            HostCommand::Quit => break,
            HostCommand::Ignore => {}
        }
    }
}
