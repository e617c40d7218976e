use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    daily_checkin_installer::util::logging::init();
    let cli = daily_checkin_installer::cli::Cli::parse();
    cli.run()
}
