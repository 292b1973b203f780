use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use ledgerforge::catalog::Catalog;
use ledgerforge::config::Config;
use std::process;
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Accounting statement drag-and-drop trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value = "data/levels.json")]
    catalog: String,

    /// JSON file with timing / scoring / report settings.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists the levels of the catalog
    Levels,
    /// Checks the catalog for unplayable levels
    Validate,
    /// Plays a level headlessly with a simulated learner
    Play(cmd::play::PlayArgs),
}

fn main() {
    // 1. Parse raw matches (to tell typed flags from defaults)
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    // 2. Load the level catalog
    let catalog = Catalog::load_from_file(&cli.catalog).unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        process::exit(1);
    });

    // 3. Execute
    match cli.command {
        Commands::Levels => cmd::levels::run(&catalog),
        Commands::Validate => {
            if !cmd::validate::run(&catalog) {
                process::exit(1);
            }
        }
        Commands::Play(args) => {
            let sub_matches = matches
                .subcommand_matches("play")
                .unwrap_or_else(|| process::exit(2));
            let config = resolve_config(cli.config.as_deref(), &args.config, sub_matches);
            if let Err(e) = cmd::play::run(args, catalog, config) {
                eprintln!("❌ {}", e);
                process::exit(1);
            }
        }
    }
}

/// File values first, explicit command-line flags on top.
fn resolve_config(path: Option<&str>, cli_config: &Config, matches: &clap::ArgMatches) -> Config {
    let Some(path) = path else {
        return cli_config.clone();
    };
    println!("⚙️  Loading settings from: {}", path);
    let mut config = Config::load_from_file(path).unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        process::exit(1);
    });
    config.merge_from_cli(cli_config, matches);
    config
}
