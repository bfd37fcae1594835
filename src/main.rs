mod args;
mod survey;

use clap::Parser;
use log::{debug, info};
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    // RUST_LOG, when set, takes precedence over --verbose.
    if args.verbose && std::env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    debug!("args: {:?}", args);

    match survey::run_analysis(&args) {
        Ok(()) => {
            info!("Analysis done");
        }
        Err(e) => {
            eprintln!("An error occured: {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    }
}
