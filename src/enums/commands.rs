use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the analysis API server
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(long)]
        host: Option<String>,
    },
    /// Check configuration, scanner availability and vendor API reachability
    Check,
}
