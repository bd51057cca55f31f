//! `oshiv-install`: download, verify and install oshiv release binaries.

mod cli;
mod commands;
mod tracing;

use crate::tracing::{TracingConfig, init_tracing};

#[tokio::main(flavor = "current_thread")]
#[allow(clippy::print_stderr)]
async fn main() {
    if let Err(error) = run_main().await {
        eprintln!("{error:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> miette::Result<()> {
    let cli = cli::parse();
    let config = TracingConfig::from_flags(cli.level, cli.log_format, cli.json);
    init_tracing(config)?;

    let output = commands::execute(cli).await?;
    write_output(&output);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn write_output(output: &str) {
    println!("{}", output.trim_end());
}
