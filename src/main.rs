use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use monorepo_commits::release::scope_context;
use monorepo_commits::{
    Commit, CommitFilter, CommitRange, ConcurrencyLimit, FilterConfig, GitRepository,
    PackageReleaseContext, ReleaseContext,
};

#[derive(Parser)]
#[command(name = "monorepo-commits")]
#[command(about = "List the git commits that touch one package of a monorepo")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory to start the package search from (default: current directory)
    #[arg(short = 'C', long, global = true)]
    cwd: Option<PathBuf>,

    /// Log every retained commit and the file that matched
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter commits down to the ones touching the package
    Filter(FilterArgs),

    /// Show the package, its path and its dependency paths
    Path,

    /// List the files changed by one commit
    Files {
        /// Commit hash or reference
        hash: String,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Only consider commits after this reference (e.g. the last release tag)
    #[arg(long)]
    since: Option<String>,

    /// Consider at most this many commits from HEAD
    #[arg(long)]
    limit: Option<usize>,

    /// Read commits as a JSON array from a file instead of git ("-" for stdin)
    #[arg(long, conflicts_with_all = ["since", "limit"])]
    input: Option<PathBuf>,

    /// Extra dependency path; replaces the ones from the package descriptor
    #[arg(long = "dependency", value_name = "PATH")]
    dependencies: Vec<String>,

    /// Maximum concurrent file lookups (default: $SRM_MAX_THREADS or 500)
    #[arg(long)]
    max_threads: Option<usize>,

    /// Print retained commits as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("monorepo_commits=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monorepo_commits=info"))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let current = std::env::current_dir().context("Could not determine current directory")?;
    let cwd = match cli.cwd {
        Some(cwd) => current.join(cwd),
        None => current,
    };

    match cli.command {
        Commands::Filter(args) => cmd_filter(&cwd, args),
        Commands::Path => cmd_path(&cwd),
        Commands::Files { hash } => cmd_files(&cwd, &hash),
    }
}

#[tokio::main]
async fn cmd_filter(cwd: &Path, args: FilterArgs) -> Result<()> {
    let repo = GitRepository::new(cwd);

    let commits = match &args.input {
        Some(input) => read_commits(input)?,
        None => {
            let range = CommitRange {
                since: args.since.clone(),
                limit: args.limit,
            };
            repo.list_commits(&range).context("Could not list commits")?
        }
    };

    let mut config = FilterConfig::from_env(cwd);
    if let Some(max_threads) = args.max_threads {
        let limit = ConcurrencyLimit::new(max_threads).context("--max-threads must be at least 1")?;
        config = config.with_concurrency(limit);
    }
    if !args.dependencies.is_empty() {
        config = config.with_dependencies(args.dependencies);
    }

    let filter = CommitFilter::new(Arc::new(repo), config);
    let context = ReleaseContext {
        last_release: args.since,
        commits,
    };
    let scoped = scope_context(&filter, context)
        .await
        .context("Could not filter commits")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scoped.commits)?);
    } else {
        print_commits(&scoped);
    }

    Ok(())
}

#[tokio::main]
async fn cmd_path(cwd: &Path) -> Result<()> {
    let filter = CommitFilter::new(Arc::new(GitRepository::new(cwd)), FilterConfig::from_env(cwd));
    let package = filter.resolve().await.context("Could not resolve package")?;
    let matcher = filter.matcher_for(&package);

    println!("\n{} {}\n", "📦".cyan(), package.name().bold());
    println!("  {} {}", "root:".dimmed(), package.root.display());
    println!("  {} {}", "descriptor:".dimmed(), package.descriptor.path.display());
    println!("  {} {}", "path:".dimmed(), display_segments(&package.path.to_string()));

    if matcher.dependencies().is_empty() {
        println!("  {} {}", "dependencies:".dimmed(), "none".dimmed());
    } else {
        println!("  {}", "dependencies:".dimmed());
        for dependency in matcher.dependencies() {
            println!("    {} {}", "•".green(), dependency.to_string().cyan());
        }
    }

    println!();
    Ok(())
}

fn cmd_files(cwd: &Path, hash: &str) -> Result<()> {
    let files = GitRepository::new(cwd)
        .changed_files(hash)
        .with_context(|| format!("Could not read files of commit {}", hash))?;

    for file in files {
        println!("{}", file);
    }

    Ok(())
}

fn read_commits(input: &Path) -> Result<Vec<Commit>> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Could not read commits from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Could not read {}", input.display()))?
    };

    serde_json::from_str(&content).context("Commits must be a JSON array of {hash, subject} objects")
}

fn print_commits(scoped: &PackageReleaseContext) {
    println!(
        "\n{} {} {}\n",
        "📦".cyan(),
        scoped.package_name.bold(),
        format!("({} commits)", scoped.commits.len()).dimmed()
    );

    if scoped.is_empty() {
        println!("  {}", "No commits touch this package".dimmed());
        return;
    }

    for commit in &scoped.commits {
        println!(
            "  {} {}",
            commit.commit.short_hash().yellow(),
            commit.subject()
        );
    }

    println!();
}

fn display_segments(path: &str) -> String {
    if path.is_empty() {
        "(repository root)".to_string()
    } else {
        path.to_string()
    }
}
