use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use satd_commentlens::classify::KeywordClassifier;
use satd_commentlens::extract::JavaCommentExtractor;
use satd_core::{OutputFormat, SatdConfig};
use satd_difflens::filter::SourceFilter;
use satd_gitpulse::history::WalkOptions;
use satd_gitpulse::repo::GitRepository;
use satd_miner::history::HistoryMiner;
use satd_miner::miner::DiffMiner;
use satd_miner::report;

#[derive(Parser)]
#[command(
    name = "satdtrack",
    version,
    about = "Track self-admitted technical debt across git revisions",
    long_about = "satdtrack follows SATD comments (TODO, FIXME, HACK, ...) in Java sources\n\
                   between two revisions and reports each one as ADDED, REMOVED, STAY or CHANGED.\n\n\
                   Examples:\n  \
                     satdtrack diff HEAD~1 HEAD          Compare a commit with its parent\n  \
                     satdtrack diff v1.0 v2.0            Compare two releases\n  \
                     satdtrack history --max-commits 200 Mine every commit pair from HEAD\n  \
                     satdtrack snapshot --rev v2.0       List all SATD in one revision\n  \
                     satdtrack init                      Create a .satdtrack.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .satdtrack.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compare the SATD of two revisions
    #[command(long_about = "Compare the SATD of two revisions.\n\n\
        When one revision is a direct parent of the other only the changed files are\n\
        mined. Otherwise both full trees are mined and comments are also paired by\n\
        their enclosing class and method.\n\n\
        Examples:\n  satdtrack diff HEAD~1 HEAD\n  satdtrack diff v1.0 v2.0 --format json")]
    Diff {
        /// Old revision (tag, branch or commit hash)
        old: String,

        /// New revision (tag, branch or commit hash)
        new: String,

        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Mine SATD changes for every commit pair in a history
    #[command(long_about = "Mine SATD changes for every commit pair in a history.\n\n\
        Walks parents breadth-first from a start revision and compares each commit\n\
        with each of its parents. A pair that fails is reported and skipped.\n\n\
        Examples:\n  satdtrack history\n  satdtrack history --rev main --max-commits 500")]
    History {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Revision to start from (default: HEAD)
        #[arg(long, default_value = "HEAD")]
        rev: String,

        /// Stop after this many commits (overrides mining.max_commits)
        #[arg(long)]
        max_commits: Option<usize>,

        /// Only follow the first parent of merge commits
        #[arg(long)]
        first_parent: bool,
    },
    /// List all SATD present in one revision
    #[command(long_about = "List all SATD present in one revision.\n\n\
        Each entry carries a stable instance id that does not change when the\n\
        comment only moves lines.\n\n\
        Examples:\n  satdtrack snapshot\n  satdtrack snapshot --rev v2.0 --format markdown")]
    Snapshot {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Revision to inspect (default: HEAD)
        #[arg(long, default_value = "HEAD")]
        rev: String,
    },
    /// Create a default .satdtrack.toml configuration file
    #[command(long_about = "Create a default .satdtrack.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .satdtrack.toml already exists.")]
    Init,
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("satdtrack v{version} - self-admitted technical debt across revisions\n");

    println!("Commands:");
    println!("  diff      Compare the SATD of two revisions");
    println!("  history   Mine SATD changes for every commit pair");
    println!("  snapshot  List all SATD in one revision");
    println!("  init      Create default configuration\n");

    println!("Run 'satdtrack <command> --help' for details.");
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SatdConfig> {
    let config = match path {
        Some(path) => SatdConfig::from_file(path)
            .wrap_err_with(|| format!("loading {}", path.display()))?,
        None => {
            let default_path = Path::new(".satdtrack.toml");
            if default_path.exists() {
                SatdConfig::from_file(default_path).wrap_err("loading .satdtrack.toml")?
            } else {
                SatdConfig::default()
            }
        }
    };
    Ok(config)
}

fn open_repository(path: &Path) -> Result<GitRepository> {
    if git2::Repository::discover(path).is_err() {
        miette::bail!(miette::miette!(
            help = "Run satdtrack from inside a git repository, or specify --path to one",
            "Not a git repository: {}",
            path.display()
        ));
    }
    Ok(GitRepository::open(path)?)
}

fn spinner(message: &str) -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

const DEFAULT_CONFIG: &str = r#"# satdtrack configuration

[mining]
# Source file extensions to mine
# extensions = ["java"]
# Paths left out when mining the files a commit changed
# exclude_patterns = ["**/test/**", "**/tests/**"]
# Stop a history walk after this many commits (0 = unlimited)
# max_commits = 0
# Only follow the first parent of merge commits
# first_parent_only = false

[classifier]
# case_sensitive = false
# Keyword rules, checked in order; the first match decides the category.
# Categories: TEST, IMPLEMENTATION, DESIGN, DEFECT, DOCUMENTATION
# keywords = [
#     { keyword = "FIXME", category = "DEFECT" },
#     { keyword = "HACK", category = "DESIGN" },
#     { keyword = "TODO", category = "IMPLEMENTATION" },
# ]
"#;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        print_welcome();
        return Ok(());
    };

    if let Command::Init = command {
        let path = Path::new(".satdtrack.toml");
        if path.exists() {
            miette::bail!(".satdtrack.toml already exists");
        }
        std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
        println!("Created .satdtrack.toml with default configuration");
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    let filter = SourceFilter::from_config(&config.mining)?;
    let classifier = KeywordClassifier::from_config(&config.classifier)?;
    tracing::debug!(format = %cli.format, rules = config.classifier.keywords.len(), "configuration loaded");

    match command {
        Command::Diff {
            ref old,
            ref new,
            ref path,
        } => {
            let repo = open_repository(path)?;
            let extractor =
                JavaCommentExtractor::new(&repo, &classifier).with_filter(filter.clone());
            let miner = DiffMiner::new(&repo, &extractor, &classifier, filter);

            let pb = spinner(&format!("Comparing {old}..{new}"));
            let diff = miner.compare(old, new).inspect_err(|_| {
                if let Some(pb) = &pb {
                    pb.finish_with_message("Failed");
                }
            })?;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            print!("{}", report::render_difference(&diff, cli.format)?);
            if !diff.errored_files.is_empty() {
                eprintln!(
                    "warning: {} file(s) could not be parsed and were skipped",
                    diff.errored_files.len()
                );
            }
        }
        Command::History {
            ref path,
            ref rev,
            max_commits,
            first_parent,
        } => {
            let repo = open_repository(path)?;
            let head = repo.resolve(rev)?;
            let extractor =
                JavaCommentExtractor::new(&repo, &classifier).with_filter(filter.clone());
            let miner = DiffMiner::new(&repo, &extractor, &classifier, filter);

            let mut options = WalkOptions::from(&config.mining);
            if let Some(max) = max_commits {
                options.max_commits = max;
            }
            options.first_parent_only |= first_parent;

            let pb = spinner(&format!("Mining history from {head}"));
            let mut compared = 0usize;
            let outcome = HistoryMiner::new(&miner, options).mine(&head, |diff| {
                compared += 1;
                if let Some(pb) = &pb {
                    pb.set_message(format!("Mined {compared} pairs, at {}", diff.new_commit));
                }
            });
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            print!("{}", report::render_history(&outcome, cli.format)?);
            if !outcome.failed.is_empty() {
                eprintln!("warning: {} commit pair(s) failed", outcome.failed.len());
            }
        }
        Command::Snapshot { ref path, ref rev } => {
            let repo = open_repository(path)?;
            let commit = repo.resolve(rev)?;
            let extractor =
                JavaCommentExtractor::new(&repo, &classifier).with_filter(filter.clone());
            let miner = DiffMiner::new(&repo, &extractor, &classifier, filter);

            let snapshot = miner.snapshot(&commit)?;
            print!("{}", report::render_snapshot(&snapshot, cli.format)?);
        }
        Command::Init => unreachable!(),
    }

    Ok(())
}
