use crate::config::{
    ClientMode, FetchConfig, IngestConfig, DEFAULT_BASE_URL, DEFAULT_INGEST_EXE, DEFAULT_LISTING_URL,
};
use clap::error::ErrorKind;
use clap::{App, Arg};
use std::ffi::OsString;
use std::process;
use thiserror::Error;

pub const FETCH_MISSING_OUTPUT: &str = "请输入要保存的路径";

pub const INGEST_USAGE: &str = "Usage: gold_ingest <SYMBOL(Au/Ag)> <MARKET(USD/CNY)> <CSV file>\n\
                                .csv 文件格式: 日期,价格";

/// 命令行解析失败：Info 为 --help/--version，Usage 为参数错误
#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("{0}")]
    Info(clap::Error),

    #[error("{0}")]
    Usage(String),
}

impl ArgsError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ArgsError::Info(_) => 0,
            ArgsError::Usage(_) => 1,
        }
    }

    /// 打印信息并退出进程
    pub fn exit(self) -> ! {
        match self {
            ArgsError::Info(e) => e.exit(),
            ArgsError::Usage(message) => {
                println!("{}", message);
                process::exit(1);
            }
        }
    }
}

fn is_info(e: &clap::Error) -> bool {
    matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub output: String,
    pub config: FetchConfig,
}

pub fn parse_fetch_args<I, T>(args: I) -> Result<FetchArgs, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let app = App::new("sge_fetch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scrape SGE daily Au99.99 quotations into a CSV file")
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .help("CSV file to append date,price lines to")
                .index(1),
        )
        .arg(
            Arg::new("bare")
                .long("bare")
                .help("Send requests without custom headers")
                .takes_value(false),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Base url detail links are resolved against")
                .takes_value(true)
                .default_value(DEFAULT_BASE_URL),
        )
        .arg(
            Arg::new("listing-url")
                .long("listing-url")
                .value_name("URL")
                .help("Paginated quotation listing url")
                .takes_value(true)
                .default_value(DEFAULT_LISTING_URL),
        );

    let matches = match app.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) if is_info(&e) => return Err(ArgsError::Info(e)),
        Err(e) => return Err(ArgsError::Usage(e.to_string())),
    };

    let output = matches
        .value_of("output")
        .ok_or_else(|| ArgsError::Usage(FETCH_MISSING_OUTPUT.to_string()))?;

    let client_mode = if matches.is_present("bare") {
        ClientMode::Bare
    } else {
        ClientMode::Rich
    };

    let config = FetchConfig::new()
        .with_client_mode(client_mode)
        .with_base_url(matches.value_of("base-url").unwrap_or(DEFAULT_BASE_URL))
        .with_listing_url(matches.value_of("listing-url").unwrap_or(DEFAULT_LISTING_URL));

    Ok(FetchArgs {
        output: output.to_string(),
        config,
    })
}

#[derive(Debug, Clone)]
pub struct IngestArgs {
    pub symbol: String,
    pub market: String,
    pub csv: String,
    pub config: IngestConfig,
}

pub fn parse_ingest_args<I, T>(args: I) -> Result<IngestArgs, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let app = App::new("gold_ingest")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Feed date,price rows from a CSV file into the gold ingestion tool")
        .arg(Arg::new("symbol").value_name("SYMBOL").help("Instrument symbol, e.g. Au or Ag").index(1))
        .arg(Arg::new("market").value_name("MARKET").help("Market or currency tag, e.g. USD or CNY").index(2))
        .arg(Arg::new("csv").value_name("CSV").help("Input file of date,price lines").index(3))
        .arg(
            Arg::new("exe")
                .long("exe")
                .value_name("PATH")
                .help("Ingestion executable to invoke per row")
                .takes_value(true)
                .default_value(DEFAULT_INGEST_EXE),
        );

    let usage = || ArgsError::Usage(INGEST_USAGE.to_string());

    let matches = match app.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) if is_info(&e) => return Err(ArgsError::Info(e)),
        Err(_) => return Err(usage()),
    };

    let (symbol, market, csv) = match (
        matches.value_of("symbol"),
        matches.value_of("market"),
        matches.value_of("csv"),
    ) {
        (Some(symbol), Some(market), Some(csv)) => (symbol, market, csv),
        _ => return Err(usage()),
    };

    let config = IngestConfig::new()
        .with_executable(matches.value_of("exe").unwrap_or(DEFAULT_INGEST_EXE));

    Ok(IngestArgs {
        symbol: symbol.to_string(),
        market: market.to_string(),
        csv: csv.to_string(),
        config,
    })
}
