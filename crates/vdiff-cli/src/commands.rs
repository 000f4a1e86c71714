use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use vdiff_engine::{canonical, Comparator, ComparatorConfig, Comparison, Difference};
use vdiff_types::Value;

use crate::cli::*;

/// Exit status when the documents are equal or the command succeeded.
pub const EXIT_OK: u8 = 0;
/// Exit status when the compared documents differ.
pub const EXIT_DIFFERENT: u8 = 1;
/// Exit status when the run failed.
pub const EXIT_FAILED: u8 = 2;

pub fn run_command(cli: Cli) -> anyhow::Result<u8> {
    match cli.command {
        Command::Compare(args) => cmd_compare(args, &cli.format),
        Command::Canonicalize(args) => cmd_canonicalize(args, &cli.format),
        Command::Fingerprint(args) => cmd_fingerprint(args, &cli.format),
    }
}

/// Report a failed run on stderr and map the outcome to an exit status.
pub fn exit_status(result: anyhow::Result<u8>) -> u8 {
    match result {
        Ok(status) => status,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            EXIT_FAILED
        }
    }
}

fn cmd_compare(args: CompareArgs, format: &OutputFormat) -> anyhow::Result<u8> {
    let show_combination = args.combination;
    let comparison = compare_files(&args)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        OutputFormat::Text => print_comparison(&comparison, show_combination)?,
    }

    Ok(if comparison.is_equal() {
        EXIT_OK
    } else {
        EXIT_DIFFERENT
    })
}

fn cmd_canonicalize(args: FileArgs, format: &OutputFormat) -> anyhow::Result<u8> {
    let value = canonical::canonicalized(&load_value(&args.path)?)
        .with_context(|| format!("cannot canonicalize {}", args.path.display()))?;
    let json = value.to_json()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&json)?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(EXIT_OK)
}

fn cmd_fingerprint(args: FileArgs, format: &OutputFormat) -> anyhow::Result<u8> {
    let value = load_value(&args.path)?;
    let fingerprint = canonical::fingerprint(&value)
        .with_context(|| format!("cannot fingerprint {}", args.path.display()))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "fingerprint": fingerprint.to_hex() })),
        OutputFormat::Text => println!("{}  {}", fingerprint.to_hex().yellow(), args.path.display()),
    }
    Ok(EXIT_OK)
}

/// Load both documents and compare them with the effective configuration.
pub fn compare_files(args: &CompareArgs) -> anyhow::Result<Comparison> {
    let config = effective_config(args)?;
    let a = load_value(&args.a)?;
    let b = load_value(&args.b)?;
    tracing::debug!(a = %args.a.display(), b = %args.b.display(), "comparing documents");

    Comparator::new(a, b)
        .with_config(config)
        .calculate()
        .context("comparison failed")
}

/// Settings from `--config`, overridden by command-line flags.
pub fn effective_config(args: &CompareArgs) -> anyhow::Result<ComparatorConfig> {
    let mut config: ComparatorConfig = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ComparatorConfig::default(),
    };
    if args.ignore_array_sorting {
        config.ignore_array_sorting = true;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    Ok(config)
}

pub fn load_value(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(Value::from(json))
}

fn print_comparison(comparison: &Comparison, show_combination: bool) -> anyhow::Result<()> {
    if comparison.is_equal() {
        println!("{} No differences.", "✓".green().bold());
    } else {
        for difference in comparison.differences() {
            print_difference(difference)?;
        }
        let count = comparison.differences().len();
        let noun = if count == 1 { "difference" } else { "differences" };
        println!("\n{} {}", count.to_string().bold(), noun);
    }

    if show_combination {
        println!("\n{}", serde_json::to_string_pretty(comparison.combination())?);
    }
    Ok(())
}

fn print_difference(difference: &Difference) -> anyhow::Result<()> {
    let side = |v: Option<&Value>| -> anyhow::Result<String> {
        Ok(match v {
            Some(value) => value.to_canonical_json()?,
            None => "(absent)".to_string(),
        })
    };
    println!(
        "  {}  {} → {}",
        difference.path().yellow(),
        side(difference.a())?.red(),
        side(difference.b())?.green()
    );
    Ok(())
}
