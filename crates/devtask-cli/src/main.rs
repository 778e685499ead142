mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devtask",
    about = "Local development tasks for a Go service: infrastructure, devtools, tests, lint and migrations",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from devtask.yaml or .git/)
    #[arg(long, global = true, env = "DEVTASK_ROOT")]
    root: Option<PathBuf>,

    /// Go workspace where devtools are installed (default: $HOME/go)
    #[arg(long, global = true, env = "GOPATH")]
    gopath: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the service in development mode
    Dev,

    /// Start infrastructure locally
    Start {
        /// Execute in background
        #[arg(long)]
        background: bool,

        /// Start current service container alongside
        #[arg(long)]
        current: bool,

        /// Start loadtesting containers alongside
        #[arg(long)]
        loadtest: bool,
    },

    /// Stop infrastructure locally
    Stop,

    /// Remove infrastructure locally
    Remove,

    /// Prune infrastructure locally
    Prune,

    /// Run tests and report coverage
    Test {
        /// <PACKAGE_PATH>::<TEST_NAME>. If empty, it will run all tests
        #[arg(long, default_value = "")]
        test: String,

        /// Show stdout of tests
        #[arg(long)]
        verbose: bool,

        /// Show coverprofile page
        #[arg(long)]
        show: bool,

        /// Automatically say yes to the following questions
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Check and install devtools
    Devtools {
        /// Automatically say yes to the following questions
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Run linter
    Lint {
        /// Automatically correct fixable errors
        #[arg(long)]
        fix: bool,

        /// Automatically say yes to the following questions
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Create a migration
    Migrate {
        /// Migration name
        name: String,

        /// Automatically say yes to the following questions
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = cmd::Workspace::load(&root, cli.gopath, cli.json)
        .and_then(|ws| dispatch(&ws, cli.command));

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn dispatch(ws: &cmd::Workspace, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Dev => cmd::dev::run(ws),
        Commands::Start {
            background,
            current,
            loadtest,
        } => cmd::infra::start(ws, background, current, loadtest),
        Commands::Stop => cmd::infra::stop(ws),
        Commands::Remove => cmd::infra::remove(ws),
        Commands::Prune => cmd::infra::prune(ws),
        Commands::Test {
            test,
            verbose,
            show,
            yes,
        } => cmd::test::run(ws, &test, verbose, show, yes),
        Commands::Devtools { yes } => cmd::devtools::run(ws, yes),
        Commands::Lint { fix, yes } => cmd::lint::run(ws, fix, yes),
        Commands::Migrate { name, yes } => cmd::migrate::run(ws, &name, yes),
    }
}
