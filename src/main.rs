mod args;
mod meritlist;

use clap::Parser;
use log::{info, warn};

use crate::args::Args;
use crate::meritlist::{run_merit_lists, RunOverrides};

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    info!("args: {:?}", args);

    let overrides = RunOverrides {
        input: args.input.clone(),
        input_type: args.input_type.clone(),
        excel_worksheet_name: args.excel_worksheet_name.clone(),
        program: args.program.clone(),
        seats: args.seats.clone(),
        call_multiplier: args.call_multiplier,
        out: args.out.clone(),
        summary: args.summary.clone(),
    };

    let res = run_merit_lists(args.config.clone(), &overrides, args.reference.clone());
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
