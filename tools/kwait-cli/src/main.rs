use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use kwait_cli::KwaitCli;

fn main() -> ExitCode {
    kwait_core::init_tracing("KWAIT_LOG", LevelFilter::WARN);
    let cli = KwaitCli::parse();
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::from(2);
        }
    };
    let result = rt.block_on(kwait_cli::run(cli));
    // A stdin read may still be parked on a blocking thread.
    rt.shutdown_background();
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
