mod cli;
mod commands;
mod domain;
mod error;
mod presentation;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{Global, Runnable};
use error::FameError;
use std::process;

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    let g = Global {
        language_table: cli.language_table,
    };

    let result = match cli.command {
        Commands::Fame(cmd) => cmd.run(&g),
        Commands::Blame(cmd) => cmd.run(&g),
        Commands::Tree(cmd) => cmd.run(&g),
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<FameError>()
            .map_or(1, FameError::exit_code);
        process::exit(code);
    }
}
