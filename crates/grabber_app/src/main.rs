//! `apk-grabber`: resolve, locate and download an Android package.
mod cli;
mod config;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use engine_logging::{engine_debug, level_for_verbosity};
use grabber_engine::PipelineError;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(level_for_verbosity(cli.verbose, cli.quiet), cli.log_file.as_deref());

    match cli::run(&cli).await {
        Ok(output) => {
            engine_debug!("candidate {} -> {}", output.candidate.url, output.download.final_url);
            println!("{}", output.path.display());
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<PipelineError>() {
            Some(pipeline_err) => {
                eprintln!("error: {pipeline_err}");
                ExitCode::from(1)
            }
            None => {
                eprintln!("error: {err:#}");
                ExitCode::from(2)
            }
        },
    }
}
