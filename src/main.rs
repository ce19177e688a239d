//! DocGap - Documentation freshness checks
//!
//! Decides whether documentation is still current with the source files it
//! describes, using git history and content signatures.

use anyhow::{Context, Result};
use docgap::cli::{
    check, coverage, coverage_passes, init, print_check_text, print_coverage_text, print_json,
    triggers_check, CheckArgs, Cli, Commands, OutputFormat, Project,
};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    // Logs go to stderr so JSON output stays clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let repo_path = cli.path.as_path();
    let config_path = cli.config.as_deref();

    match cli.command.unwrap_or(Commands::Check(CheckArgs::default())) {
        Commands::Check(args) => {
            let project = Project::open(repo_path, config_path)?;
            let outcome = check(&project, args.coverage)?;

            match cli.format {
                OutputFormat::Json => print_json(&outcome)?,
                OutputFormat::Text => print_check_text(&outcome),
            }

            Ok(exit_code(!outcome.is_failure(args.strict)))
        }

        Commands::Coverage => {
            let project = Project::open(repo_path, config_path)?;
            let coverage = coverage(&project);

            match cli.format {
                OutputFormat::Json => print_json(&coverage)?,
                OutputFormat::Text => print_coverage_text(&coverage),
            }

            Ok(exit_code(coverage_passes(&project.config, &coverage)))
        }

        Commands::Init(args) => {
            let path = init(repo_path, args.force)?;
            println!("✓ Wrote {}", path.display());
            println!("\nAdd a rule to pair a doc with its sources:\n");
            println!("  [[rules]]");
            println!("  doc = \"docs/main.md\"");
            println!("  source = [\"src/main.ts\"]");
            Ok(ExitCode::SUCCESS)
        }

        Commands::Config => {
            let project = Project::open(repo_path, config_path)?;
            show_config(&project, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Watch(args) => {
            run_watch(repo_path, config_path, args.debounce, args.coverage, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print the effective configuration and resolved rules
fn show_config(project: &Project, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "root": project.repo.root(),
            "config": project.config,
            "rules": project.rules,
        }));
    }

    let config = &project.config;

    println!("DocGap Configuration");
    println!("====================\n");
    println!("Repository: {}", project.repo.root().display());

    println!("\nIgnore commit patterns:");
    if config.git.ignore_commit_patterns.is_empty() {
        println!("  (none)");
    }
    for pattern in &config.git.ignore_commit_patterns {
        println!("  - {}", pattern);
    }

    println!("\nMax history: {}", config.git.max_history);
    if let Some(min) = config.coverage.min_score {
        println!("Minimum coverage: {:.0}%", min * 100.0);
    }

    println!("\nRules:");
    if project.rules.is_empty() {
        println!("  (none)");
    }
    for rule in &project.rules {
        println!("  {}", rule.doc.display());
        for source in &rule.sources {
            println!("    <- {}", source.display());
        }
    }

    Ok(())
}

/// Run in watch mode
fn run_watch(
    path: &Path,
    config_path: Option<&Path>,
    debounce_ms: u64,
    with_coverage: bool,
    format: OutputFormat,
) -> Result<()> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc::{channel, RecvTimeoutError};
    use std::time::{Duration, Instant};

    let project = Project::open(path, config_path)?;
    let root = project.repo.root().to_path_buf();
    let watched = project.watched_paths();

    println!("Watching {} path(s) in {:?}...", watched.len(), root);
    println!("Press Ctrl+C to stop.\n");

    let run_check = |project: &Project| match check(project, with_coverage) {
        Ok(outcome) => match format {
            OutputFormat::Json => {
                if let Err(e) = print_json(&outcome) {
                    eprintln!("Output error: {}", e);
                }
            }
            OutputFormat::Text => print_check_text(&outcome),
        },
        Err(e) => eprintln!("Check error: {:#}", e),
    };

    run_check(&project);

    let (tx, rx) = channel::<notify::Result<notify::Event>>();
    let config = Config::default().with_poll_interval(Duration::from_millis(debounce_ms));

    let mut watcher =
        RecommendedWatcher::new(tx, config).context("Failed to start file watcher")?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {:?}", root))?;

    let debounce = Duration::from_millis(debounce_ms);
    // Time of the first relevant event not yet checked
    let mut pending: Option<Instant> = None;

    loop {
        let next = match pending {
            Some(since) => rx.recv_timeout(debounce.saturating_sub(since.elapsed())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match next {
            Ok(Ok(event)) => {
                let relevant = event
                    .paths
                    .iter()
                    .any(|p| triggers_check(&root, &watched, p));
                if relevant && pending.is_none() {
                    pending = Some(Instant::now());
                }
            }
            Ok(Err(e)) => tracing::warn!("Watch error: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if pending.is_some_and(|since| since.elapsed() >= debounce) {
            pending = None;
            println!("\n📝 Changes detected, checking...");
            run_check(&project);
        }
    }

    Ok(())
}
