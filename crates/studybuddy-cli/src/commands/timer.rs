use std::sync::Arc;

use clap::{Subcommand, ValueEnum};
use studybuddy_core::{
    Alerter, AppConfig, CompletionAlert, Event, SessionType, TimerController, TimerOptions,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::open_repository;

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Study,
    ShortBreak,
    LongBreak,
}

impl From<KindArg> for SessionType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Study => SessionType::Study,
            KindArg::ShortBreak => SessionType::ShortBreak,
            KindArg::LongBreak => SessionType::LongBreak,
        }
    }
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground, printing events as JSON lines
    Run {
        /// Start a fresh session of this kind instead of resuming
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// Stop after the first completed session
        #[arg(long)]
        once: bool,
    },
    /// Print the persisted countdown as JSON
    Status,
    /// Discard the persisted countdown
    Reset,
}

/// Rings the terminal bell when sound is enabled.
struct BellAlerter;

impl Alerter for BellAlerter {
    fn alert(&self, alert: CompletionAlert) {
        if alert.is_silent() {
            return;
        }
        if alert.sound {
            eprint!("\x07");
        }
        info!(completed = alert.completed.label(), "session finished");
    }
}

pub fn run(action: TimerAction, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        TimerAction::Run { kind, once } => {
            let options = TimerOptions::from(&config.timer);
            let controller = TimerController::new(repo, Arc::new(BellAlerter), options);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_foreground(controller, kind.map(SessionType::from), once))?;
        }
        TimerAction::Status => {
            let state = repo.get_timer_state();
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        TimerAction::Reset => {
            repo.save_timer_state(None)?;
            println!("{{\"type\": \"timer_reset\"}}");
        }
    }
    Ok(())
}

async fn run_foreground(
    controller: TimerController,
    kind: Option<SessionType>,
    once: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = controller.events();

    match kind {
        Some(kind) => {
            controller.start_new_session(kind)?;
        }
        None => match controller.restore() {
            Some(state) if state.is_running => {}
            // Paused: pick it back up.
            Some(_) => {
                controller.toggle()?;
            }
            None => {
                controller.start_new_session(SessionType::Study)?;
            }
        },
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted, keeping countdown for next run");
                controller.shutdown();
                break;
            }
            received = events.recv() => match received {
                Ok(event) => {
                    println!("{}", serde_json::to_string(&event)?);
                    if once && matches!(event, Event::NextSessionScheduled { .. }) {
                        controller.reset();
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}
