#![doc = include_str!("../README.md")]

mod cli;
mod commands;
mod flags;
mod ingest;
mod telemetry;

fn main() {
    use clap::Parser;

    if let Err(err) = cli::Cli::parse().run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
