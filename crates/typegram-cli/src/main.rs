//! Typegram CLI - Turn type manifests into PlantUML class diagrams

mod cli;

use clap::Parser;

fn main() {
    // Logging is initialized in `run` once the flags are known
    let cli_args = cli::Cli::parse();
    let app = cli::TypegramApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
