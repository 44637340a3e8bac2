//! `nextdns-updater config` - configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&ctx, &key, &value),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

/// Keep the first and last four characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    config.api_key = config.api_key.as_deref().map(mask_key);

    if ctx.output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let unset = || "(not set)".dimmed().to_string();

    println!("{}", "Current Configuration:".bold());
    println!();
    println!("  {} {}", "api_key:".bold(), config.api_key.unwrap_or_else(unset));
    println!("  {} {}", "profile_id:".bold(), config.profile_id.unwrap_or_else(unset));
    println!(
        "  {} {}",
        "base_url:".bold(),
        config.base_url.unwrap_or_else(|| "https://api.nextdns.io".to_string())
    );
    println!();

    let submit = &config.submit;
    println!("  {} {}", "batch_size:".bold(), submit.batch_size);
    println!("  {} {}", "max_concurrency:".bold(), submit.max_concurrency);
    println!("  {} {}", "max_retries:".bold(), submit.max_retries);
    println!("  {} {}s", "retry_delay_secs:".bold(), submit.retry_delay_secs);
    println!("  {} {}s", "cooldown_secs:".bold(), submit.cooldown_secs);
    println!("  {} {}s", "request_timeout_secs:".bold(), submit.request_timeout_secs);
    println!(
        "  {} {}",
        "requests_per_second:".bold(),
        submit
            .requests_per_second
            .map_or_else(|| "unlimited".to_string(), |r| r.to_string())
    );
    println!();
    println!("  {} {}", "allowlist_file:".bold(), config.files.allowlist.display());
    println!("  {} {}", "denylist_file:".bold(), config.files.denylist.display());
    println!(
        "  {} {}",
        "log_dir:".bold(),
        config
            .log_dir
            .map_or_else(|| ".".to_string(), |d| d.display().to_string())
    );

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config: Config = ctx.config.clone();
    config.set(key, value)?;
    config.save_to(&ctx.config_path)?;

    let shown = if key == "api_key" { mask_key(value) } else { value.to_string() };
    println!("{} {} set to {}.", "Success:".green().bold(), key, shown.cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("0123456789abcdef"), "0123...cdef");
        assert_eq!(mask_key("short"), "****");
    }
}
