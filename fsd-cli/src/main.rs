//! FSD CLI - builds the floating solar dataset from ciel-et-terre.net.

use clap::Parser;
use log::debug;

#[derive(Parser)]
#[command(
    name = "fsd-cli",
    version,
    about = "Floating solar project dataset scraper"
)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    debug: bool,

    #[command(flatten)]
    scrape: fsd_cmd::ScrapeArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("{:?}", cli.scrape);
    fsd_cmd::run(cli.scrape).await
}
