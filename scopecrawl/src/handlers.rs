use crate::report::{OutputFormat, generate_summary, render_report, write_report};
use crate::run::{RunOptions, execute_run};
use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use scopecrawl_scanner::{EngineConfig, WaitUntil};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use url::Url;

// Helper functions for crawl handler

/// Load seeds from a seeds file, falling back to the `--url` arguments.
pub fn load_seeds_from_source(urls: &[Url], seeds_file: Option<&Path>) -> Result<Vec<String>> {
    let mut seeds: Vec<String> = urls.iter().map(|url| url.as_str().to_string()).collect();
    if let Some(path) = seeds_file {
        seeds.extend(load_seeds_from_file(path)?);
    }
    if seeds.is_empty() {
        bail!("Either --url or --seeds-file must be provided");
    }
    Ok(seeds)
}

/// Load and parse seed URLs from a newline-delimited file
pub fn load_seeds_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seeds file {}", path.display()))?;

    let seeds: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_seed_line)
        .collect();

    if seeds.is_empty() {
        bail!("No valid URLs found in {}", path.display());
    }

    Ok(seeds)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_seed_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && matches!(url.scheme(), "http" | "https")
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    warn!("Skipping invalid seed URL '{}'", line);
    None
}

/// Build the engine configuration from parsed `crawl` arguments.
pub fn engine_config_from_matches(args: &ArgMatches) -> EngineConfig {
    let defaults = EngineConfig::default();
    EngineConfig {
        max_concurrency: args
            .get_one::<usize>("max-concurrency")
            .copied()
            .unwrap_or(defaults.max_concurrency),
        max_requests: args
            .get_one::<usize>("max-requests")
            .copied()
            .unwrap_or(defaults.max_requests),
        navigation_timeout: args
            .get_one::<u64>("navigation-timeout")
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or(defaults.navigation_timeout),
        handler_timeout: args
            .get_one::<u64>("handler-timeout")
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or(defaults.handler_timeout),
        wait_until: args
            .get_one::<WaitUntil>("wait-until")
            .copied()
            .unwrap_or(defaults.wait_until),
        headless: !args.get_flag("headful"),
        user_agent: defaults.user_agent,
    }
}

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "scopecrawl".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    eprintln!("{}", "scope-aware link discovery".bright_black());
    eprintln!();
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let urls: Vec<Url> = sub_matches
        .get_many::<Url>("url")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let seeds_file = sub_matches.get_one::<PathBuf>("seeds-file");
    let same_domain_only = !sub_matches.get_flag("any-domain");
    let format = sub_matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or_default();
    let output = sub_matches
        .get_one::<String>("output")
        .map(|path| PathBuf::from(shellexpand::tilde(path).as_ref()));

    let seeds = load_seeds_from_source(&urls, seeds_file.map(PathBuf::as_path))?;
    let engine = engine_config_from_matches(sub_matches);

    if !quiet {
        eprintln!("Seeds: {}", seeds.len());
        eprintln!("Workers: {}", engine.max_concurrency);
        eprintln!("Max requests: {}", engine.max_requests);
        let scope_str = if same_domain_only {
            "same domain only"
        } else {
            "any domain"
        };
        eprintln!("Scope: {}\n", scope_str);
    }

    let options = RunOptions {
        seeds,
        same_domain_only,
        engine,
        show_progress_bars: !quiet,
    };

    let progress_callback: Option<crate::run::RunProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| eprintln!("{}", msg)))
    };

    let report = execute_run(options, progress_callback).await?;

    if !quiet {
        eprintln!("\n{} Crawl complete!\n", "✓".green().bold());
        eprint!("{}", generate_summary(&report));
    }

    let rendered = render_report(&report, format)?;
    write_report(&rendered, output.as_deref())?;

    if let Some(path) = output
        && !quiet
    {
        eprintln!(
            "{} Results written to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    Ok(())
}
