use sge_gold_datahub::cli;
use sge_gold_datahub::services::csv_sink;
use sge_gold_datahub::services::ingest_service::{IngestService, ProcessInvoker};
use sge_gold_datahub::util;

use log::{error, info};
use std::process;

fn main() -> anyhow::Result<()> {
    util::init_logger();

    let args = match cli::parse_ingest_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let lines = match csv_sink::read_lines(&args.csv) {
        Ok(lines) => lines,
        Err(e) => {
            error!("Cannot read {}: {}", args.csv, e);
            process::exit(1);
        }
    };
    info!(
        "Ingesting {} as {} / {} via {}",
        lines.path().display(),
        args.symbol,
        args.market,
        args.config.executable.display()
    );

    let invoker = ProcessInvoker::new(args.config, &args.symbol, &args.market);
    let mut service = IngestService::new(invoker);
    let summary = service.run(lines)?;
    info!("Done: {} of {} lines ingested", summary.accepted, summary.lines_read);

    Ok(())
}
