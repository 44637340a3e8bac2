//! Output formatting for run summaries.

use clap::ValueEnum;
use colored::Colorize;
use nextdns::RunSummary;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Print the summaries of every pipeline that ran.
pub fn print_summaries(summaries: &[RunSummary], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summaries)?),
        OutputFormat::Pretty => {
            for summary in summaries {
                print!("{}", render_pretty(summary));
            }
        }
    }
    Ok(())
}

/// Human-readable block for one pipeline.
#[must_use]
pub fn render_pretty(summary: &RunSummary) -> String {
    let title = summary
        .list
        .map_or_else(|| "Domains".to_string(), |l| capitalize(l.path_segment()));

    let status = if summary.is_clean() {
        "OK".green().bold()
    } else {
        "INCOMPLETE".red().bold()
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {}/{} submitted",
        status,
        format!("{title}:").as_str().bold(),
        summary.submitted,
        summary.total
    );

    if summary.empty_responses > 0 {
        let _ = writeln!(
            out,
            "  {} {}",
            "empty responses:".yellow(),
            summary.empty_responses
        );
    }
    if summary.failed > 0 {
        let _ = writeln!(out, "  {} {}", "failed:".red(), summary.failed);
    }
    if summary.exhausted > 0 {
        let _ = writeln!(out, "  {} {}", "retries exhausted:".red(), summary.exhausted);
    }

    #[allow(clippy::cast_precision_loss)]
    let seconds = summary.elapsed_ms as f64 / 1000.0;
    let _ = writeln!(
        out,
        "  {} batches, {} requests, {:.1}s",
        summary.batches, summary.attempts, seconds
    );
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextdns::ListKind;

    fn summary() -> RunSummary {
        RunSummary {
            list: Some(ListKind::Denylist),
            total: 10,
            submitted: 8,
            empty_responses: 1,
            failed: 1,
            exhausted: 1,
            batches: 2,
            attempts: 14,
            elapsed_ms: 2500,
        }
    }

    #[test]
    fn test_render_pretty() {
        colored::control::set_override(false);
        let text = render_pretty(&summary());
        assert!(text.starts_with("INCOMPLETE Denylist: 8/10 submitted\n"));
        assert!(text.contains("failed: 1"));
        assert!(text.contains("retries exhausted: 1"));
        assert!(text.contains("2 batches, 14 requests, 2.5s"));
    }

    #[test]
    fn test_render_clean_run() {
        colored::control::set_override(false);
        let clean = RunSummary {
            list: Some(ListKind::Allowlist),
            total: 3,
            submitted: 3,
            batches: 1,
            attempts: 3,
            ..RunSummary::default()
        };
        let text = render_pretty(&clean);
        assert!(text.starts_with("OK Allowlist: 3/3 submitted\n"));
        assert!(!text.contains("failed"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
