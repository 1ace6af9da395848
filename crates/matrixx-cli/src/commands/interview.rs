use clap::Subcommand;
use matrixx_core::format::format_clock;
use matrixx_core::{Config, Route, SessionController};

use super::driver;

#[derive(Subcommand)]
pub enum InterviewAction {
    /// List the practice questions
    Questions {
        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },
    /// Start a timed practice session
    Run {
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: InterviewAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        InterviewAction::Questions { json } => {
            let questions = Config::load_or_default().engine_settings().questions;
            if json {
                println!("{}", serde_json::to_string_pretty(&questions)?);
            } else {
                for q in &questions {
                    println!("{}. [{}] {}", q.id, format_clock(q.time_limit_seconds), q.text);
                }
            }
        }
        InterviewAction::Run { json } => {
            let config = Config::load()?;
            let mut ctl = SessionController::from_config(&config);
            ctl.navigate(Route::Interview);
            driver::run_interactive(ctl, json)?;
        }
    }
    Ok(())
}
