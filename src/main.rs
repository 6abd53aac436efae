use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use devsweep::constants::{ENV_DRY_RUN, ENV_LOG_FILE};
use devsweep::walker::{measure_candidate, scan_result_for};
use devsweep::{
    CategoryType, CleanResult, CleanSummary, Cleaner, Config, FsWalker, SafetyValidator,
    ScanResult, TreeNode, format_size, total_size,
};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysinfo::Disks;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print debug logs
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Delete cache directories that pass the safety checks
    Clean(CleanArgs),
    /// Browse a directory a few levels deep
    Tree(TreeArgs),
}

#[derive(Args)]
struct CleanArgs {
    /// Directories to remove
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Category recorded for every path
    #[arg(short, long, default_value = "cache")]
    category: CategoryType,

    /// Log what would be deleted without deleting anything
    #[arg(short = 'n', long, env = ENV_DRY_RUN)]
    dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Audit log location (defaults to ~/.devsweep.log)
    #[arg(long, env = ENV_LOG_FILE)]
    log_file: Option<PathBuf>,
}

#[derive(Args)]
struct TreeArgs {
    path: PathBuf,

    /// Levels to expand below the root
    #[arg(short, long, default_value_t = 1)]
    depth: usize,

    #[arg(short, long, default_value = "cache")]
    category: CategoryType,

    /// Leave out dotfiles
    #[arg(long)]
    skip_hidden: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Clean(args) => run_clean(args),
        Command::Tree(args) => run_tree(&args),
    }
}

fn run_clean(args: CleanArgs) -> Result<()> {
    let config = Config::from_env()
        .with_dry_run(args.dry_run)
        .with_log_path(args.log_file);

    let candidates = measure_candidates(&args.paths, args.category, &config.validator())?;
    if candidates.is_empty() {
        println!("Nothing to clean.");
        return Ok(());
    }

    let verb = if config.dry_run { "Would delete" } else { "About to delete" };
    println!(
        "{verb} {} item(s), {}",
        candidates.len(),
        format_size(total_size(&candidates))
    );

    if !config.dry_run && !args.yes && !confirm("Proceed? [y/N] ")? {
        println!("Aborted.");
        return Ok(());
    }

    let mut cleaner = Cleaner::new(&config).context("cannot start cleaner")?;
    let results = cleaner.clean(&candidates);
    for result in &results {
        print_result(result);
    }

    let summary = CleanSummary::from_results(&results);
    if summary.dry_run {
        println!(
            "Dry run: {} item(s), {} would be freed.",
            summary.succeeded,
            format_size(summary.reclaimed)
        );
    } else {
        println!(
            "Cleaned {} item(s), freed {}.",
            summary.succeeded,
            format_size(summary.reclaimed)
        );
        if let Some(available) = candidates.first().and_then(|c| available_space(&c.path)) {
            println!("Available disk space: {}", format_size(available));
        }
    }
    println!("Audit log: {}", cleaner.audit_path().display());

    if summary.failed > 0 {
        bail!("{} item(s) could not be cleaned", summary.failed);
    }
    Ok(())
}

fn measure_candidates(
    paths: &[PathBuf],
    category: CategoryType,
    validator: &SafetyValidator,
) -> Result<Vec<ScanResult>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Measuring {} path(s)...", paths.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let measured: Vec<(PathBuf, io::Result<ScanResult>)> = paths
        .par_iter()
        .map(|p| {
            let result = std::path::absolute(p)
                .and_then(|abs| measure_candidate(&abs, category, validator));
            (p.clone(), result)
        })
        .collect();
    spinner.finish_and_clear();

    let mut candidates = Vec::with_capacity(measured.len());
    for (path, result) in measured {
        match result {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => eprintln!("Skipping {}: {err}", path.display()),
        }
    }
    Ok(candidates)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_result(result: &CleanResult) {
    let size = format_size(result.size);
    match &result.error {
        None if result.was_dry_run => println!("  ~ {} ({size})", result.path.display()),
        None => println!("  ✓ {} ({size})", result.path.display()),
        Some(err) => println!("  ✗ {} ({size}): {err}", result.path.display()),
    }
}

/// Free space on the disk whose mount point holds `path`.
fn available_space(path: &Path) -> Option<u64> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .filter(|d| path.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())
        .map(sysinfo::Disk::available_space)
}

fn run_tree(args: &TreeArgs) -> Result<()> {
    let path = std::path::absolute(&args.path)?;
    let result = scan_result_for(&path, args.category)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let mut root = TreeNode::from_scan_result(&result);
    let walker = FsWalker {
        skip_hidden: args.skip_hidden,
    };
    root.expand_to_depth(&walker, args.depth)
        .with_context(|| format!("cannot list {}", path.display()))?;

    println!("{} [{}]", path.display(), result.category.name());
    print_node(&root);
    Ok(())
}

fn print_node(node: &TreeNode) {
    let indent = "  ".repeat(node.depth);
    let suffix = if node.is_dir { "/" } else { "" };
    println!(
        "{indent}{}{suffix}  {}  ({} files)",
        node.name,
        format_size(node.size),
        node.file_count
    );
    for child in node.children() {
        print_node(child);
    }
}
