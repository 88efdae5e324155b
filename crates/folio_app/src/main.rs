mod cli;
mod platform;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse before logging so --help prints cleanly.
    let args = cli::Args::parse();
    platform::logging::initialize(args.log_level(), args.log_file.as_deref());
    platform::app::run(args).await
}
