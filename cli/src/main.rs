mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    match commands.command {
        Commands::Scan { range, no_vulns } => scan::run(range, no_vulns).await,
        Commands::Ports => {
            scan::list_ports();
            Ok(())
        }
    }
}
