use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use sortd::{
    categories::{suggest_rules, CategoryManager, CategoryRule},
    config,
    discovery::discover_files,
    engine::{Engine, EngineOptions},
    logger,
    models::ActionStatus,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sortd")]
#[command(about = "Sorts downloads into a numbered category tree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Organize files from a source directory
    Run {
        /// Directory to organize
        source: String,

        /// Destination root (default ~/Documents/Organized)
        dest: Option<String>,

        /// Move files without renaming them
        #[arg(long = "move")]
        move_only: bool,

        /// Rename files in place without moving them
        #[arg(long = "rename")]
        rename_only: bool,

        /// Skip files with uncertain detection
        #[arg(long)]
        skip: bool,

        /// Preview without making changes
        #[arg(long)]
        dry_run: bool,

        /// Process at most N files
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Print every action
        #[arg(short, long)]
        verbose: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Manage detector-aware category remapping
    Routing {
        #[command(subcommand)]
        command: RoutingCommands,
    },

    /// Show aggregated statistics from recent runs
    Status {
        /// Days to look back
        #[arg(long, default_value_t = 7)]
        days: i64,
    },

    /// List recent run logs
    Logs {
        /// Maximum number of logs to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List configured categories
    List,

    /// Add a category
    Add {
        name: String,

        /// 1-based position (default: append at end)
        #[arg(long)]
        position: Option<usize>,

        /// Parent category for subcategorization
        #[arg(long)]
        parent: Option<String>,

        /// Comma-separated match keywords
        #[arg(long)]
        keywords: Option<String>,

        /// Comma-separated filename glob patterns
        #[arg(long)]
        patterns: Option<String>,

        /// Comma-separated extensions (without dot)
        #[arg(long)]
        extensions: Option<String>,

        /// Minimum keyword matches required
        #[arg(long, default_value_t = 1)]
        min_matches: usize,

        /// Skip suggestion prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove a category
    Remove { name: String },

    /// Reorder categories (full list of names, new order)
    Reorder { names: Vec<String> },

    /// Rename existing folders to match the current numbering
    Apply {
        /// Destination root to reconcile
        dest: String,

        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum RoutingCommands {
    /// List remap rules
    List,

    /// Add or replace a remap rule
    Set {
        from: String,
        to: String,

        /// Restrict the rule to one detector
        #[arg(long)]
        detector: Option<String>,
    },

    /// Remove a remap rule
    Remove {
        from: String,

        #[arg(long)]
        detector: Option<String>,
    },
}

fn load_manager() -> CategoryManager {
    let mut manager = CategoryManager::new(config::default_config_path());
    manager.load();
    manager
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            source,
            dest,
            move_only,
            rename_only,
            skip,
            dry_run,
            limit,
            verbose,
            yes,
        } => run_command(
            source,
            dest,
            EngineOptions {
                dry_run,
                move_only,
                rename_only,
                skip_uncertain: skip,
                verbose,
                limit,
            },
            yes,
        ),
        Commands::Category { command } => category_command(command),
        Commands::Routing { command } => routing_command(command),
        Commands::Status { days } => {
            let stats = logger::aggregate_logs(&config::log_dir(), days);
            println!("Last {} days:", days);
            println!("  Runs:       {}", stats.total_runs);
            println!("  Processed:  {}", stats.total_processed);
            println!("  Moved:      {}", stats.total_moved);
            println!("  Renamed:    {}", stats.total_renamed);
            println!("  Errors:     {}", stats.total_errors);
            println!("  Duplicates: {}", stats.total_duplicates);
            Ok(())
        }
        Commands::Logs { limit } => {
            let logs = logger::list_logs(&config::log_dir(), Some(limit));
            if logs.is_empty() {
                println!("No run logs found");
                return Ok(());
            }
            for path in logs {
                match logger::load_log(&path) {
                    Ok(run) => println!(
                        "{}  {} -> {}  ({} processed, {} moved, {} errors)",
                        run.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        run.source.display(),
                        run.destination.display(),
                        run.summary.processed,
                        run.summary.moved,
                        run.summary.errors,
                    ),
                    Err(_) => println!("{}  (unreadable)", path.display()),
                }
            }
            Ok(())
        }
    }
}

fn run_command(
    source: String,
    dest: Option<String>,
    options: EngineOptions,
    yes: bool,
) -> Result<()> {
    let source = config::expand_path(&source);
    let dest: Option<PathBuf> = dest.map(|d| config::expand_path(&d));

    let files = discover_files(&source, &[], true, 0, options.limit)
        .context("Failed to scan source directory")?;
    if files.is_empty() {
        println!("Nothing to do: no files found in {}", source.display());
        return Ok(());
    }

    let manager = load_manager();
    let engine = Engine::new(source.clone(), dest, options.clone(), manager);

    println!(
        "Organizing {} files from {} into {}",
        files.len(),
        source.display(),
        engine.destination().display()
    );
    if options.dry_run {
        println!("DRY RUN - no files will be moved");
    }

    if !yes && !options.dry_run {
        let confirmed = Confirm::new()
            .with_prompt("Proceed?")
            .default(true)
            .interact()?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let verbose = options.verbose;
    let result = engine.run_with(|action| {
        if verbose {
            let marker = match action.status {
                ActionStatus::Success => "ok",
                ActionStatus::Error => "error",
                ActionStatus::Skipped => "skipped",
                ActionStatus::Pending => "pending",
            };
            bar.println(format!(
                "[{}] {} -> {} ({}, {:.0}%)",
                marker,
                action.file.name,
                action.dest_path.display(),
                action.detection.category,
                action.detection.confidence * 100.0,
            ));
        }
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    let summary = &result.summary;
    println!("Processed:  {}", summary.processed);
    println!("Moved:      {}", summary.moved);
    println!("Renamed:    {}", summary.renamed);
    println!("Unsorted:   {}", summary.unsorted);
    println!("Skipped:    {}", summary.skipped);
    println!("Duplicates: {}", summary.duplicates);
    println!("Errors:     {}", summary.errors);

    Ok(())
}

fn category_command(command: CategoryCommands) -> Result<()> {
    let mut manager = load_manager();

    match command {
        CategoryCommands::List => {
            for cat in manager.list_categories() {
                let mut line = format!("{:>2}  {}", cat.number, cat.name);
                if let Some(parent) = &cat.parent {
                    line.push_str(&format!("  (parent: {})", parent));
                }
                if cat.rule.is_some() {
                    line.push_str("  [rules]");
                }
                println!("{}", line);
            }
            Ok(())
        }
        CategoryCommands::Add {
            name,
            position,
            parent,
            keywords,
            patterns,
            extensions,
            min_matches,
            yes,
        } => {
            let mut parent = parent;
            let mut keywords = split_list(keywords);
            let patterns = split_list(patterns);
            let extensions = split_list(extensions);

            // Offer dictionary-based suggestions when the user gave no
            // explicit parent or keywords
            if parent.is_none() && keywords.is_empty() && !yes {
                let suggestion = suggest_rules(&name);
                if suggestion.has_suggestions() {
                    if let Some(suggested_parent) = &suggestion.parent {
                        println!("Suggested parent: {}", suggested_parent);
                    }
                    if !suggestion.keywords.is_empty() {
                        println!("Suggested keywords: {}", suggestion.keywords.join(", "));
                    }
                    let accepted = Confirm::new()
                        .with_prompt("Apply suggestions?")
                        .default(true)
                        .interact()?;
                    if accepted {
                        parent = suggestion.parent;
                        keywords = suggestion.keywords;
                    }
                }
            }

            let rule = if keywords.is_empty() && patterns.is_empty() && extensions.is_empty() {
                None
            } else {
                Some(CategoryRule {
                    keywords,
                    patterns,
                    extensions,
                    min_keyword_matches: min_matches,
                })
            };

            let cat = manager.add(&name, position, parent.as_deref(), rule)?;
            manager.save()?;
            println!("Added {} at position {}", cat.name, cat.number);
            Ok(())
        }
        CategoryCommands::Remove { name } => {
            manager.remove(&name)?;
            manager.save()?;
            println!("Removed {}", name);
            Ok(())
        }
        CategoryCommands::Reorder { names } => {
            manager.reorder(&names)?;
            manager.save()?;
            println!("Reordered {} categories", names.len());
            Ok(())
        }
        CategoryCommands::Apply { dest, dry_run } => {
            let dest = config::expand_path(&dest);
            let renames = manager.apply_to_filesystem(&dest, dry_run)?;
            if renames.is_empty() {
                println!("All folders already match");
            }
            for (old, new) in &renames {
                let arrow = if dry_run { "would rename" } else { "renamed" };
                println!(
                    "{} {} -> {}",
                    arrow,
                    old.file_name().unwrap_or_default().to_string_lossy(),
                    new.file_name().unwrap_or_default().to_string_lossy(),
                );
            }
            Ok(())
        }
    }
}

fn routing_command(command: RoutingCommands) -> Result<()> {
    let mut manager = load_manager();

    match command {
        RoutingCommands::List => {
            let rules = manager.routing.list_remaps();
            if rules.is_empty() {
                println!("No remap rules configured");
            }
            for rule in rules {
                println!("{:<20} {} -> {}", rule.detector, rule.from, rule.to);
            }
            Ok(())
        }
        RoutingCommands::Set {
            from,
            to,
            detector,
        } => {
            manager.routing.set_remap(&from, &to, detector.as_deref());
            manager.save()?;
            println!("Remap set: {} -> {}", from, to);
            Ok(())
        }
        RoutingCommands::Remove { from, detector } => {
            if manager.routing.remove_remap(&from, detector.as_deref()) {
                manager.save()?;
                println!("Remap removed: {}", from);
            } else {
                println!("No matching remap rule for {}", from);
            }
            Ok(())
        }
    }
}
