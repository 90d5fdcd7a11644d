//! notevault CLI entry point.

use clap::Parser;
use notevault::cli::args::{Cli, Commands};
use notevault::cli::output::Output;
use notevault::cli::{content, daily, delete, frontmatter, links, list, rename, resolve, search};
use notevault::config::AppConfig;
use notevault::error::VaultError;
use notevault::store::NoteStore;
use notevault::vault::Vault;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("notevault={}", cli.log_level())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), VaultError> {
    // Load config
    let config = AppConfig::load()?;

    // Resolve vault path
    let vault_path = config.resolve_vault_path(cli.vault.as_deref())?;
    let vault = Vault::open(vault_path)?;
    let store = NoteStore::with_config(vault, &config);

    // Create output helper
    let output = Output::new(cli.output_format(), cli.quiet);

    // Dispatch command
    match &cli.command {
        Commands::Info => list::info(&store, &output),
        Commands::List(args) => list::run(&store, args, &output),
        Commands::Resolve(args) => resolve::run(&store, args, &output),
        Commands::Read(args) => content::read(&store, args, &output),
        Commands::Write(args) => content::write(&store, args, &output),
        Commands::Create(args) => content::create(&store, args, &output),
        Commands::Edit(args) => content::edit(&store, args, &output),
        Commands::Append(args) => content::append(&store, args, &output),
        Commands::Delete(args) => delete::run(&store, args, &output),
        Commands::Restore(args) => delete::restore(&store, args, &output),
        Commands::Move(args) => rename::run(&store, args, &output),
        Commands::Backlinks(args) => links::backlinks(&store, args, &output),
        Commands::Links(args) => links::links(&store, args, &output),
        Commands::GetFrontmatter(args) => frontmatter::get_frontmatter(&store, args, &output),
        Commands::SetFrontmatter(args) => frontmatter::set_frontmatter(&store, args, &output),
        Commands::Search(args) => search::run(&store, args, &output),
        Commands::SearchTag(args) => search::by_tag(&store, args, &output),
        Commands::Daily(args) => daily::daily(&store, args, &output),
        Commands::DailyAppend(args) => daily::daily_append(&store, args, &output),
        Commands::Templates => daily::templates(&store, &output),
        Commands::FromTemplate(args) => daily::from_template(&store, args, &output),
    }
}
