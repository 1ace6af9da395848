use clap::Args;
use matrixx_core::{Config, SessionController, Tool};

use super::driver;

#[derive(Args)]
pub struct ChatArgs {
    /// Tool to open with (general, resume, interview, cover-letter, portfolio)
    #[arg(long, default_value = "general")]
    tool: Tool,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

pub fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut ctl = SessionController::from_config(&config);
    ctl.select_tool(args.tool);
    driver::run_interactive(ctl, args.json)
}
