use clap::Parser;

use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "seclyzer")]
#[clap(about = "AI-powered security code analysis API", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
