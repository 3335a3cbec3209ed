use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для tickstore: инжест дампов и инспекция стора.
#[derive(Parser, Debug)]
#[command(name = "tickstore", version, about = "Market dump ingester and column store")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Ingest one dump file into a store (era is chosen by the dump header)
    Ingest {
        /// Store root directory (created if missing)
        #[arg(long)]
        store: PathBuf,
        /// Dump file; stdin when omitted
        #[arg(long)]
        dump: Option<PathBuf>,
        /// Row-store mode: whole flat records, no page compression
        #[arg(long, default_value_t = false)]
        rows: bool,
    },
    /// Decompress one column and print its values
    Dump {
        #[arg(long)]
        store: PathBuf,
        /// Field name, e.g. issued, price, range
        #[arg(long)]
        field: String,
        /// Print at most this many values
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Per-column file sizes and process metrics. --json prints one object.
    Status {
        #[arg(long)]
        store: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
