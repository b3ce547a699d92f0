use clap::Parser;
use dielinekit::cli::{run, Cli};
use dielinekit::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let status = run(cli)?;
    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}
