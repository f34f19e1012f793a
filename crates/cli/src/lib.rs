pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use cadastro_core::config::LoadOptions;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cadastro",
    about = "Cadastro operator CLI",
    long_about = "Apply migrations, load the demo catalog, and inspect effective configuration.",
    after_help = "Examples:\n  cadastro migrate\n  cadastro seed\n  cadastro config"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Read settings from this file instead of searching cadastro.toml (must exist)"
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo customer and product catalog (skips records already present)")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions { require_file: cli.config.is_some(), config_path: cli.config };

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(&options),
        Command::Seed => commands::seed::run(&options),
        Command::Config => match commands::config::run(&options) {
            Ok(output) => commands::CommandResult { exit_code: 0, output },
            Err(output) => commands::CommandResult { exit_code: commands::EXIT_CONFIG, output },
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
