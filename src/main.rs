use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use colored::*;
use std::path::PathBuf;
use std::process;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use baas::{
    config::{ScanConfig, DEFAULT_THREADS, DEFAULT_TIMEOUT_MS},
    output::{OutputConfig, OutputFormat, OutputManager, Reporter},
    probe::{NegativeStatusSet, DEFAULT_NEGATIVE_CODES},
    scanner::ScanEngine,
    utils::{wordlist::WordSource, Logger},
    ScanError,
};

fn print_banner() {
    println!("{}", "    ____  ___    ___   _____".bright_cyan().bold());
    println!("{}", "   / __ )/   |  /   | / ___/".bright_cyan().bold());
    println!("{}", "  / __  / /| | / /| | \\__ \\ ".bright_cyan().bold());
    println!("{}", " / /_/ / ___ |/ ___ |___/ / ".bright_cyan().bold());
    println!("{}", "/_____/_/  |_/_/  |_/____/  ".bright_cyan().bold());
    println!();
    println!(
        "{}",
        "BAAS is a directory enumeration tool designed for penetration testers and security researchers."
            .bright_cyan()
    );
}

fn print_run_header(config: &ScanConfig) {
    println!("{}", "=".repeat(101));
    println!("[+] URL:                     {}", config.target);
    println!("[+] Threads:                 {}", config.threads);
    println!("[+] Wordlist:                {}", config.wordlist.display());
    println!("[+] Negative Status codes:   {}", config.negative_codes);
    println!("[+] Timeout:                 {}ms", config.timeout);
    println!("{}", "=".repeat(101));
}

/// Print a pre-run failure and exit with status 1
fn fail(lines: &[String]) -> ! {
    for line in lines {
        eprintln!("{}{}{} {}", "[".bright_cyan(), "!".bright_red(), "]".bright_cyan(), line);
    }
    process::exit(1);
}

fn build_cli() -> Command {
    let default_codes = DEFAULT_NEGATIVE_CODES
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    Command::new("baas")
        .version(env!("CARGO_PKG_VERSION"))
        .about("BAAS: directory enumeration tool for penetration testers and security researchers")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("Target URL (e.g., http://example.com)")
                .required(true),
        )
        .arg(
            Arg::new("wordlist")
                .short('w')
                .long("wordlist")
                .value_name("WORDLIST")
                .help("Path to the wordlist file")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .value_name("STATUS")
                .help(format!(
                    "Negative status codes to exclude, replaces the default set [default: {}]",
                    default_codes
                ))
                .num_args(1..)
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("THREAD")
                .help(format!("Number of concurrent requests [default: {}]", DEFAULT_THREADS))
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("MS")
                .help(format!("Per-request timeout in milliseconds [default: {}]", DEFAULT_TIMEOUT_MS))
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("user-agent")
                .long("user-agent")
                .value_name("UA")
                .help("User-Agent header to send"),
        )
        .arg(
            Arg::new("insecure")
                .short('k')
                .long("insecure")
                .help("Accept invalid TLS certificates")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show failed requests and debug logs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the final report to a file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Report file format")
                .value_parser(["text", "json", "greppable"]),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (default: ~/.baas.toml)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("no-banner")
                .long("no-banner")
                .help("Hide the banner")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Hide the progress bar")
                .action(ArgAction::SetTrue),
        )
}

/// Merge config file values with command line flags
fn resolve_config(matches: &clap::ArgMatches) -> baas::Result<ScanConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ScanConfig::from_toml_file(path)?,
        None => ScanConfig::load_default_config(),
    };

    if let Some(url) = matches.get_one::<String>("url") {
        config.target = url.clone();
    }
    if let Some(wordlist) = matches.get_one::<PathBuf>("wordlist") {
        config.wordlist = wordlist.clone();
    }
    if let Some(codes) = matches.get_many::<u16>("status") {
        config.negative_codes = NegativeStatusSet::new(codes.copied());
    }
    if let Some(&threads) = matches.get_one::<usize>("threads") {
        config.threads = threads;
    }
    if let Some(&timeout) = matches.get_one::<u64>("timeout") {
        config.timeout = timeout;
    }
    if let Some(ua) = matches.get_one::<String>("user-agent") {
        config.user_agent = ua.clone();
    }
    if let Some(path) = matches.get_one::<PathBuf>("output") {
        config.output_file = Some(path.clone());
    }
    if let Some(format) = matches.get_one::<String>("format") {
        config.output_format = format
            .parse::<OutputFormat>()
            .map_err(ScanError::ConfigError)?;
    }
    config.insecure |= matches.get_flag("insecure");
    config.verbose |= matches.get_flag("verbose");

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    // Ctrl-c during the wordlist count still ends with status 0
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    if matches.get_flag("no-color") {
        colored::control::set_override(false);
    }

    let verbose = matches.get_flag("verbose");
    Logger::init(if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });

    if !matches.get_flag("no-banner") {
        print_banner();
    }

    let config = match resolve_config(&matches) {
        Ok(config) => config,
        Err(e) => fail(&[e.to_string()]),
    };

    if let Err(e) = config.validate() {
        match e {
            ScanError::InvalidTarget(_) => fail(&[
                format!("Incorrect URL: {}", config.target),
                "URL should start with 'http://' or 'https://'.".to_string(),
            ]),
            other => fail(&[other.to_string()]),
        }
    }

    print_run_header(&config);

    // Count up front: an unreadable wordlist must stop us before any request
    let source = match WordSource::from_file(&config.wordlist) {
        Ok(source) => source,
        Err(e) => {
            log::debug!("{}", e);
            fail(&["Wordlist file not found.".to_string()])
        }
    };
    let total = match source.count() {
        Ok(total) => total,
        Err(e) => fail(&[e.to_string()]),
    };

    let engine = match ScanEngine::new(&config) {
        Ok(engine) => engine,
        Err(e) => fail(&[e.to_string()]),
    };

    let output_config = OutputConfig {
        format: config.output_format,
        file: config.output_file.clone(),
        verbose: config.verbose,
        progress_bar: !matches.get_flag("no-progress"),
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let reporter = tokio::spawn(Reporter::new(&output_config, total).run(event_rx));

    let result = engine.scan_counted(&source, total, cancel, Some(event_tx)).await;
    if let Err(e) = reporter.await {
        log::error!("Reporter task failed: {}", e);
    }

    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_pre_run() => fail(&[e.to_string()]),
        Err(e) => return Err(e.into()),
    };

    // Nothing is kept from an interrupted run
    if report.interrupted {
        return Ok(());
    }

    log::info!(
        "{} found, {} errors, {:.1} req/s",
        report.found_count(),
        report.errors,
        report.scan_rate()
    );

    OutputManager::new(output_config)
        .write_report(&report)
        .context("failed to write report")?;

    Ok(())
}
