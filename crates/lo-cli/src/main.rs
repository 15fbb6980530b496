//! CLI binary for lo-planner: estimate, sequence and inspect LO selections.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lo_core::config::PlannerConfig;
use lo_core::index::MetadataIndex;
use lo_plan::{CourseProgress, PathEntry, Sequencer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lo-planner", about = "Learning Object time estimation and sequencing")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Metadata file to use instead of .lo/metadata.json
    #[arg(short, long, global = true)]
    metadata: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a metadata payload as the session index
    Import {
        /// JSON file as returned by the metadata endpoint
        file: PathBuf,
    },

    /// Estimate study time for LOs and all their prerequisites
    Estimate {
        /// Selected LO ids
        #[arg(required = true)]
        ids: Vec<String>,

        /// LOs the learner has already completed (repeatable)
        #[arg(long)]
        completed: Vec<String>,
    },

    /// Order a selection into a study sequence
    Sequence {
        /// Selected LO ids, in any order
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// List LOs and prerequisites in dependency-safe order
    Order {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show prerequisite chains from each LO down to its foundations
    Chains {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Report progress along a learning path
    Progress {
        /// JSON array of {id, started_on, completed_on} entries
        path: PathBuf,
    },

    /// Check metadata for dangling prerequisites and cycles
    Validate,

    /// Show index statistics
    Info,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = PlannerConfig::load(&project_root)?;

    let out = Output {
        json: cli.json,
        time_unit: &config.estimation.time_unit,
    };
    let metadata = cli.metadata.as_deref();
    let load = || load_index(&project_root, metadata);

    match &cli.command {
        Commands::Import { file } => cmd_import(&project_root, file),
        Commands::Estimate { ids, completed } => cmd_estimate(&load()?, ids, completed, &out),
        Commands::Sequence { ids } => cmd_sequence(&load()?, &config, ids, &out),
        Commands::Order { ids } => cmd_order(&load()?, ids, &out),
        Commands::Chains { ids } => cmd_chains(&load()?, ids, &out),
        Commands::Progress { path } => cmd_progress(&load()?, path, &out),
        Commands::Validate => cmd_validate(&load()?, &out),
        Commands::Info => cmd_info(&load()?, &config, &out),
    }
}

/// How command results are printed.
struct Output<'a> {
    json: bool,
    time_unit: &'a str,
}

impl Output<'_> {
    fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn load_index(project_root: &Path, metadata: Option<&Path>) -> Result<MetadataIndex> {
    if let Some(path) = metadata {
        return lo_core::storage::load_file(path);
    }
    if !lo_core::storage::index_exists(project_root) {
        anyhow::bail!("No LO metadata found. Run `lo-planner import <file>` first.");
    }
    lo_core::storage::load(project_root)
}

fn cmd_import(project_root: &Path, file: &Path) -> Result<()> {
    let index = lo_core::storage::load_file(file)?;
    lo_core::storage::save(project_root, &index)?;
    println!(
        "Imported {} LOs into {}",
        index.len(),
        lo_core::storage::metadata_file(project_root).display()
    );
    Ok(())
}

fn cmd_estimate(
    index: &MetadataIndex,
    ids: &[String],
    completed: &[String],
    out: &Output,
) -> Result<()> {
    let estimate = lo_plan::estimate_remaining(index, ids, completed);
    if out.json {
        return out.print_json(&estimate);
    }

    println!("Estimated time: {} {}", estimate.total, out.time_unit);
    println!("LOs counted: {}", estimate.len());
    if !completed.is_empty() {
        println!("Completed (excluded): {}", completed.len());
    }
    if !estimate.unknown.is_empty() {
        println!("Unknown (counted as 0): {}", estimate.unknown.join(", "));
    }
    Ok(())
}

fn cmd_sequence(
    index: &MetadataIndex,
    config: &PlannerConfig,
    ids: &[String],
    out: &Output,
) -> Result<()> {
    let ordered = Sequencer::new(config.sequencing).sequence(index, ids);
    if out.json {
        return out.print_json(&ordered);
    }

    for (i, id) in ordered.iter().enumerate() {
        let marker = if index.contains(id) { "" } else { " (unknown)" };
        println!("{:>3}. {}{}", i + 1, id, marker);
    }
    Ok(())
}

fn cmd_order(index: &MetadataIndex, ids: &[String], out: &Output) -> Result<()> {
    let ordered = lo_plan::prerequisite_order(index, ids);
    if out.json {
        return out.print_json(&ordered);
    }

    for (i, id) in ordered.iter().enumerate() {
        println!(
            "{:>3}. {} ({} {})",
            i + 1,
            id,
            index.estimated_time(id),
            out.time_unit
        );
    }
    Ok(())
}

fn cmd_chains(index: &MetadataIndex, ids: &[String], out: &Output) -> Result<()> {
    let chains = lo_plan::prerequisite_chains(index, ids);
    if out.json {
        return out.print_json(&chains);
    }

    if chains.is_empty() {
        println!("No prerequisite chains (every selected LO is on a cycle).");
    }
    for chain in &chains {
        println!(
            "{} [{} {}]",
            chain.ids.join(" <- "),
            chain.time,
            out.time_unit
        );
    }
    Ok(())
}

fn cmd_progress(index: &MetadataIndex, path_file: &Path, out: &Output) -> Result<()> {
    let json = std::fs::read_to_string(path_file)
        .with_context(|| format!("failed to read learning path {}", path_file.display()))?;
    let path: Vec<PathEntry> = serde_json::from_str(&json)
        .with_context(|| format!("invalid learning path in {}", path_file.display()))?;

    let progress = CourseProgress::from_path(index, &path);
    if out.json {
        return out.print_json(&progress);
    }

    println!(
        "Completed: {}/{} ({:.0}%)",
        progress.completed, progress.total, progress.percent_complete
    );
    println!("Time spent: {} {}", progress.completed_time, out.time_unit);
    println!("Time remaining: {} {}", progress.remaining_time, out.time_unit);
    if let Some(id) = &progress.resume_at {
        println!("Resume at: {}", id);
    }
    Ok(())
}

fn cmd_validate(index: &MetadataIndex, out: &Output) -> Result<()> {
    let report = lo_plan::validate(index);
    if out.json {
        return out.print_json(&report);
    }

    for dangling in &report.dangling {
        println!(
            "WARN: {} lists missing prerequisite {}",
            dangling.lo, dangling.prerequisite
        );
    }
    for id in &report.self_prerequisites {
        println!("WARN: {} lists itself as a prerequisite", id);
    }
    for cycle in &report.cycles {
        println!("WARN: prerequisite cycle: {}", cycle.join(" -> "));
    }

    if report.is_clean() {
        eprintln!("Metadata is valid. No authoring issues found.");
        eprintln!("  {} LOs checked", index.len());
    } else {
        eprintln!("\nFound {} authoring issue(s).", report.issue_count());
    }
    Ok(())
}

fn cmd_info(index: &MetadataIndex, config: &PlannerConfig, out: &Output) -> Result<()> {
    let delimiter = config.sequencing.module_delimiter;
    let stats = index.stats(delimiter);
    if out.json {
        return out.print_json(&stats);
    }

    println!("LOs: {}", stats.total_los);
    println!("Modules: {}", stats.total_modules);
    println!("Total time: {} {}", stats.total_time, out.time_unit);
    println!("Prerequisite edges: {}", stats.prerequisite_edges);
    println!("Dangling prerequisites: {}", stats.dangling_prerequisites);
    println!("Sequencing strategy: {:?}", config.sequencing.strategy);

    let first = index.module_first_positions(delimiter);
    if !first.is_empty() {
        println!("\nModules:");
        for module in index.modules(delimiter) {
            let members = index
                .ids()
                .filter(|id| lo_core::id::module_prefix_with(id, delimiter) == module)
                .count();
            println!("  {} ({} LOs, first at #{})", module, members, first[module] + 1);
        }
    }
    Ok(())
}
