//! Driver: parse CLI flags, validate configuration, replay a trace, print metrics.

use std::process::ExitCode;

use cache_hierarchy_sim::cli::Cli;
use cache_hierarchy_sim::error::SimError;
use cache_hierarchy_sim::hierarchy::Hierarchy;
use cache_hierarchy_sim::trace;
use clap::Parser;

fn run(cli: Cli) -> Result<(), SimError> {
    let config = cli.to_config();
    log::info!(
        "config: bsize=2^{} l1=2^{}/{}-way l2=2^{}/{}-way wr_alloc={}",
        config.block_size_log2,
        config.l1.size_log2,
        1u32 << config.l1.assoc_log2,
        config.l2.size_log2,
        1u32 << config.l2.assoc_log2,
        config.write_allocate,
    );

    let mut hierarchy = Hierarchy::new(&config)?;
    let entries = trace::read_trace(&cli.trace_path)?;

    for entry in entries {
        hierarchy.process(entry.operation, entry.address);
    }

    let metrics = hierarchy.metrics()?;
    println!(
        "L1miss={:.3} L2miss={:.3} AccTimeAvg={:.3}",
        metrics.l1_miss_rate, metrics.l2_miss_rate, metrics.avg_access_time
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(SimError::MalformedTrace { .. } | SimError::UnknownOperation { .. }) => {
            eprintln!("Command Format error");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
