//! grabber-cli - タスクファイルを読んでエンジンを動かす
//!
//! 本物の教務システムクライアントは同梱しないので、`--script` で渡した台本
//! （ScriptedClient）に対して走らせる。ポリシーやタイミングの確認用。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::time::{Duration, interval};

use grabber_core::impls::{ScriptStep, ScriptedClient, StaticConnector};
use grabber_core::{Grabber, GrabberStatus, GrabberTask};

#[derive(Parser)]
#[command(
    name = "grabber-cli",
    about = "Drive the course grabber engine from a JSON task file",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG wins if set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine until its queue is done (Ctrl-C cancels).
    Run {
        /// Path to the task file.
        task: PathBuf,

        /// Scripted outcomes for the built-in client.
        #[arg(long)]
        script: Option<PathBuf>,

        /// Status polling interval in milliseconds.
        #[arg(long, default_value_t = 200)]
        poll_ms: u64,
    },

    /// Validate a task file and print the resolved policy.
    Validate {
        /// Path to the task file.
        task: PathBuf,
    },
}

/// Script file for the built-in client.
///
/// ```json
/// {
///   "fallback": "success",
///   "latency_ms": 50,
///   "steps": { "1": ["not_selection_time", "success"], "2": ["target_full"] }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
struct Script {
    #[serde(default)]
    fallback: Option<ScriptStep>,

    #[serde(default)]
    latency_ms: u64,

    #[serde(default)]
    steps: HashMap<u64, Vec<ScriptStep>>,
}

impl Script {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid script {}", path.display()))
    }

    fn into_client(self) -> ScriptedClient {
        let fallback = self.fallback.unwrap_or(ScriptStep::Success).into_result();
        let mut client = ScriptedClient::with_fallback(fallback)
            .with_latency(Duration::from_millis(self.latency_ms));
        for (id, steps) in self.steps {
            client = client.script(id, steps.into_iter().map(ScriptStep::into_result));
        }
        client
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            task,
            script,
            poll_ms,
        } => run(&task, script.as_deref(), poll_ms).await,
        Commands::Validate { task } => validate(&task),
    }
}

fn validate(path: &Path) -> anyhow::Result<()> {
    let task = GrabberTask::from_path(path)?;
    let policy = task.policy()?;

    println!("account: {:?}", task.account);
    println!("policy: {policy:?}");
    println!("courses ({}):", task.courses.len());
    for course in &task.courses {
        println!("  - {course}");
    }
    Ok(())
}

async fn run(path: &Path, script: Option<&Path>, poll_ms: u64) -> anyhow::Result<()> {
    let task = GrabberTask::from_path(path)?;
    let script = match script {
        Some(p) => Script::load(p)?,
        None => Script::default(),
    };

    let connector = Arc::new(StaticConnector::new(Arc::new(script.into_client())));
    let grabber = task.into_grabber(connector)?;

    anyhow::ensure!(grabber.start(), "grabber refused to start");

    let mut ticker = interval(Duration::from_millis(poll_ms.max(1)));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, cancelling");
                grabber.cancel().await;
                break;
            }
            _ = ticker.tick() => {
                let view = grabber.view();
                println!(
                    "status={:?} queued={} attempts={}",
                    view.status, view.queued, view.attempts
                );
                if view.status == GrabberStatus::Idle {
                    break;
                }
            }
        }
    }

    print_summary(&grabber);
    Ok(())
}

fn print_summary(grabber: &Grabber) {
    println!("--- attempts ---");
    for record in grabber.history() {
        println!(
            "{} {} ({}) {:?} -> {:?}",
            record.started_at.format("%H:%M:%S%.3f"),
            record.target_name,
            record.target_id,
            record.outcome,
            record.decision
        );
    }

    let remaining = grabber.queue();
    if !remaining.is_empty() {
        println!("--- still queued ---");
        for course in remaining {
            println!("  - {course}");
        }
    }

    match grabber.last_exit() {
        Some(exit) => println!("exit: {exit:?}"),
        None => println!("exit: unknown"),
    }
}
