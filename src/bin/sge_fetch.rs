use sge_gold_datahub::cli;
use sge_gold_datahub::scrapers::base::HttpPageSource;
use sge_gold_datahub::scrapers::sge::SgeScraper;
use sge_gold_datahub::services::fetch_service::FetchService;
use sge_gold_datahub::util;

use log::{error, info};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    util::init_logger();

    let args = match cli::parse_fetch_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    info!("Writing quotes to {} ({:?} client)", args.output, args.config.client_mode);

    let source = HttpPageSource::new(&args.config)?;
    let service = FetchService::new(SgeScraper::new(source, args.config));

    match service.run_to_file(&args.output).await {
        Ok(summary) => {
            info!("Done: {} records written to {}", summary.records_written, args.output);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
