//! Config commands

use anyhow::Result;
use kankercare_intake::IntakeConfig;
use serde_json::json;

use super::{Context, Status};
use crate::ConfigCommands;

pub fn handle(ctx: &Context, action: ConfigCommands) -> Result<Status> {
    let profile = ctx.profile.as_deref();

    match action {
        ConfigCommands::Show => {
            let mut shown = ctx.config.clone();
            shown.database.auth = shown.database.auth.as_deref().map(mask);
            if ctx.format.is_json() {
                ctx.format.print(&shown);
            } else {
                print!("{}", toml_string(&shown)?);
            }
        }
        ConfigCommands::Path => {
            let path = IntakeConfig::config_path(profile)?;
            if ctx.format.is_json() {
                ctx.format.print(&json!({ "path": path }));
            } else {
                println!("{}", path.display());
            }
        }
        ConfigCommands::SetWebhook { url } => {
            // Edit the file as stored, without flag or environment overrides
            let mut config = IntakeConfig::load(profile)?;
            config.webhook.url = Some(url);
            config.webhook_url()?;
            let path = config.save(profile)?;
            println!("Set webhook.url in {}", path.display());
        }
        ConfigCommands::SetDatabase { url, auth } => {
            let mut config = IntakeConfig::load(profile)?;
            config.database.url = Some(url);
            if auth.is_some() {
                config.database.auth = auth;
            }
            config.database_url()?;
            let path = config.save(profile)?;
            println!("Set database.url in {}", path.display());
        }
    }
    Ok(Status::Done)
}

fn toml_string(config: &IntakeConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// Keep the first four characters of a secret
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("AIzaSyExample"), "AIza****");
        assert_eq!(mask("ab"), "ab****");
    }
}
