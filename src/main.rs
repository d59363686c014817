//! streamrig — provision a coordination service + message broker stack on one host.

use clap::Parser;

use streamrig::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
