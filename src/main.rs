use clap::Parser;

use seclyzer::structs::cli::Cli;
use seclyzer::workers::command_runner::CommandRunner;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(error) = CommandRunner::run_command(cli.command).await {
        log::error!("❌ {}", error.technical_details());
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
