mod install;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "jsetup")]
#[command(about = "Provision a Java runtime on a CI worker")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install a Java runtime and configure the environment
    Install(install::InstallArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Install(install_args) => install::execute(install_args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            // The failure signal carries the originating error's message
            eprintln!("{} {}", console::style("Error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
