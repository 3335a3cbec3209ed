use anyhow::Result;
use clap::Parser;

mod cli;
mod cmd_dump;
mod cmd_ingest;
mod cmd_status;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Ingest { store, dump, rows } => cmd_ingest::exec(store, dump, rows),

        cli::Cmd::Dump { store, field, limit } => cmd_dump::exec(store, field, limit),

        cli::Cmd::Status { store, json } => cmd_status::exec(store, json),
    }
}
