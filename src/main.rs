//! minivault CLI entry point.

use anyhow::Result;
use clap::Parser;

use minivault_core::cli::{Cli, Commands};
use minivault_core::commands;
use minivault_core::config::Config;
use minivault_core::output::Output;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let out = Output::new(cli.json);

    // `daemon` is special: it never returns until shutdown, and it builds its
    // own config/runtime rather than going through the client-connecting path.
    if matches!(cli.command, Commands::Daemon) {
        let config = Config::build(cli.data_dir)?;
        return commands::daemon::run(config);
    }

    let config = Config::build(cli.data_dir)?;

    match cli.command {
        Commands::Init => commands::init::run(&config, &out),
        Commands::ChangePassword => commands::change_password::run(&config, &out),
        Commands::Unlock => commands::unlock::run(&config, &out),
        Commands::Lock => commands::lock::run(&config, &out),
        Commands::Health => commands::health::run(&config, &out),
        Commands::Get { key, stdout } => commands::get::run(&config, &out, &key, stdout),
        Commands::List { filter } => commands::list::run(&config, &out, filter.as_deref()),
        Commands::Add { key, value } => commands::add::run(&config, &out, &key, value.as_deref()),
        Commands::Delete { key } => commands::delete::run(&config, &out, &key),
        Commands::Rename { key, new_key } => commands::rename::run(&config, &out, &key, &new_key),
        Commands::Stop => commands::stop::run(&config, &out),
        Commands::Daemon => unreachable!("handled above"),
    }
}
