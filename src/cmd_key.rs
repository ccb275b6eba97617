//! API key subcommand handlers.

use tracing::info;

use promptassist_protocols::CredentialStore;

use crate::cli::KeyAction;
use crate::context::AppContext;

/// Handle key subcommands.
pub(crate) async fn handle_key_command(
    ctx: &AppContext,
    action: KeyAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.settings_store().await?;
    match action {
        KeyAction::Set { key } => {
            store.set(&key).await?;
            info!("Stored API key in {:?}", store.path());
            println!("API key saved to {}", store.path().display());
        }
        KeyAction::Show => match store.get().await? {
            Some(key) => println!("API key: {}", mask(&key)),
            None => {
                println!("No API key stored.");
                println!("Run `promptassist key set <KEY>` to add one.");
            }
        },
        KeyAction::Clear => {
            store.clear().await?;
            println!("API key removed.");
        }
    }
    if ctx.config.provider.api_key.is_some() {
        println!(
            "Note: [provider] api_key in {} overrides the stored key.",
            ctx.config_path.display()
        );
    }
    Ok(())
}

/// Keep the first and last four characters of a key.
pub(crate) fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}
