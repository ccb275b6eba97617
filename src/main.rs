//! Prompt Assist - improve-prompt button for AI chat pages
//!
//! Command-line entry point: credential management, site registry
//! inspection, one-shot prompt improvement and running the overlay against
//! page fixtures.

use clap::Parser;
use tracing::debug;

mod cli;
mod cmd_attach;
mod cmd_improve;
mod cmd_key;
mod cmd_sites;
mod context;
mod logging;

use cli::{Cli, Commands};
use cmd_attach::AttachActions;
use context::AppContext;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let ctx = AppContext::load(cli.config)?;
    logging::init_tracing(&ctx.config.logging)?;
    debug!("Using config {}", ctx.config_path.display());

    match cli.command {
        Commands::Key { action } => cmd_key::handle_key_command(&ctx, action).await,
        Commands::Sites => cmd_sites::list_sites(&ctx),
        Commands::Resolve { url } => cmd_sites::resolve_url(&ctx, &url),
        Commands::Validate => cmd_sites::validate(&ctx),
        Commands::Improve { text } => cmd_improve::improve(&ctx, &text).await,
        Commands::Attach {
            page,
            type_text,
            click,
            json,
        } => {
            let actions = AttachActions {
                type_text,
                click,
                json,
            };
            cmd_attach::attach(&ctx, &page, actions).await
        }
    }
}
