//! # alforge-cli
//!
//! Command-line tool that generates Business Central AL objects coupling
//! tables with Dataverse proxy tables.
//!
//! ## Installation
//!
//! ```bash
//! cargo install alforge-cli
//! ```
//!
//! ## Commands
//!
//! - `alf init` - Write a starter alforge.toml
//! - `alf entities` - List Dataverse entities and their proxy tables
//! - `alf list-page <entity>` - Generate a list page over a proxy table
//! - `alf map <entity> --table <table> --mappings <file>` - Generate the
//!   mapping codeunit and coupling extensions
//!
//! See `alf --help` for the full command reference.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process;

mod commands;
mod config;
mod telemetry;
mod ui;

use commands::generate::OutputOptions;
use commands::Session;

#[derive(Parser)]
#[command(name = "alf")]
#[command(about = "alforge - Generate AL objects that couple Business Central with Dataverse", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to alforge.toml configuration file
    #[arg(short, long, global = true, default_value = "alforge.toml")]
    config: String,

    /// Symbol directory to read instead of the configured ones (repeatable)
    #[arg(long, global = true, value_name = "DIR")]
    symbols: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter alforge.toml
    Init {
        /// Project name (defaults to the current directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List Dataverse entities with their proxy tables
    Entities {
        /// Only show entities whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Output as JSON (machine-readable format)
        #[arg(long)]
        json: bool,
    },

    /// List tables that are not mapped to Dataverse
    Tables {
        /// Only show tables whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Output as JSON (machine-readable format)
        #[arg(long)]
        json: bool,
    },

    /// List the fields of a table, including fields added by extensions
    Fields {
        /// Name of the table
        table: String,

        /// Output as JSON (machine-readable format)
        #[arg(long)]
        json: bool,
    },

    /// Generate a list page over the proxy table of a Dataverse entity
    ListPage {
        /// Dataverse entity logical name
        entity: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate the mapping codeunit, coupling table extension and page extension
    Map {
        /// Dataverse entity logical name
        entity: String,

        /// Business Central table to couple with the entity
        #[arg(short, long)]
        table: String,

        /// TOML file with [[field]] mappings
        #[arg(short, long)]
        mappings: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Object id (overrides config, defaults to the proxy table id)
    #[arg(long)]
    id: Option<u32>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(long)]
    force: bool,

    /// Print the generated source instead of writing files
    #[arg(long, conflicts_with_all = ["output", "force"])]
    stdout: bool,
}

impl OutputArgs {
    fn split(self) -> (Option<u32>, OutputOptions) {
        (
            self.id,
            OutputOptions {
                output: self.output,
                force: self.force,
                stdout: self.stdout,
            },
        )
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Validate the configuration file
    Validate,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "alf", &mut io::stdout());
        return;
    }

    telemetry::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Init { name } => commands::config::init(&cli.config, name),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Validate => commands::config::validate(&cli.config),
        },
        Commands::Entities { filter, json } => {
            let session = Session::open(&cli.config, cli.symbols)?;
            commands::symbols::entities(&session, filter.as_deref(), json)
        }
        Commands::Tables { filter, json } => {
            let session = Session::open(&cli.config, cli.symbols)?;
            commands::symbols::tables(&session, filter.as_deref(), json)
        }
        Commands::Fields { table, json } => {
            let session = Session::open(&cli.config, cli.symbols)?;
            commands::symbols::fields(&session, &table, json)
        }
        Commands::ListPage { entity, output } => {
            let session = Session::open(&cli.config, cli.symbols)?;
            let (id, options) = output.split();
            commands::generate::list_page(&session, &entity, id, &options)
        }
        Commands::Map {
            entity,
            table,
            mappings,
            output,
        } => {
            let session = Session::open(&cli.config, cli.symbols)?;
            let (id, options) = output.split();
            commands::generate::map(&session, &entity, &table, &mappings, id, &options)
        }
    }
}
