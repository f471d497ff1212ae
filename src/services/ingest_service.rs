use crate::config::IngestConfig;
use crate::errors::{Result, DataHubError};
use crate::models::quote::QuoteRecord;
use log::{debug, info, warn};
use std::process::Command;
use thiserror::Error;

/// CSV 行校验失败的原因
#[derive(Error, Debug, PartialEq)]
pub enum RowError {
    #[error("expected 2 fields, found {0}")]
    FieldCount(usize),

    #[error("date must be 8 characters, found {0}")]
    DateLength(usize),

    #[error("date must be YYYYMMDD digits: {0}")]
    InvalidDate(String),

    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

/// 校验一行 `date,price`
pub fn validate_line(line: &str) -> std::result::Result<QuoteRecord, RowError> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != 2 {
        return Err(RowError::FieldCount(fields.len()));
    }

    let date = fields[0].trim();
    let price = fields[1].trim();

    let date_len = date.chars().count();
    if date_len != 8 {
        return Err(RowError::DateLength(date_len));
    }
    if !date.chars().all(|c| c.is_ascii_digit()) {
        return Err(RowError::InvalidDate(date.to_string()));
    }

    match price.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(QuoteRecord::new(date, price)),
        _ => Err(RowError::InvalidPrice(price.to_string())),
    }
}

/// 为每条合法记录调用一次外部入库工具
pub trait CommandInvoker {
    fn invoke(&mut self, record: &QuoteRecord);
}

/// 通过子进程调用入库程序：`<exe> u <date> <symbol> <market> <price>`
pub struct ProcessInvoker {
    config: IngestConfig,
    symbol: String,
    market: String,
}

impl ProcessInvoker {
    pub fn new(config: IngestConfig, symbol: &str, market: &str) -> Self {
        Self {
            config,
            symbol: symbol.to_string(),
            market: market.to_string(),
        }
    }

    /// 参数逐个传给子进程，不经过 shell，空白字符原样保留
    pub fn args_for(&self, record: &QuoteRecord) -> Vec<String> {
        vec![
            self.config.operation.clone(),
            record.date.clone(),
            self.symbol.clone(),
            self.market.clone(),
            record.price.clone(),
        ]
    }
}

impl CommandInvoker for ProcessInvoker {
    fn invoke(&mut self, record: &QuoteRecord) {
        let args = self.args_for(record);
        debug!("{} {}", self.config.executable.display(), args.join(" "));

        // 退出码不参与流程控制
        match Command::new(&self.config.executable).args(&args).status() {
            Ok(status) => debug!("{} exited with {}", self.config.executable.display(), status),
            Err(e) => warn!("Failed to run {}: {}", self.config.executable.display(), e),
        }
    }
}

/// 一次入库的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub lines_read: usize,
    pub accepted: usize,
    pub rejected: usize,
}

pub struct IngestService<I: CommandInvoker> {
    invoker: I,
}

impl<I: CommandInvoker> IngestService<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// 逐行校验并调用入库工具，坏行记录后跳过
    pub fn run<L>(&mut self, lines: L) -> Result<IngestSummary>
    where
        L: IntoIterator<Item = Result<String>>,
    {
        let mut summary = IngestSummary::default();

        for line in lines {
            let line = match line {
                Ok(line) => line,
                Err(DataHubError::IoError(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                    summary.lines_read += 1;
                    summary.rejected += 1;
                    warn!("error line: <not utf-8> ({})", e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            summary.lines_read += 1;

            match validate_line(&line) {
                Ok(record) => {
                    self.invoker.invoke(&record);
                    summary.accepted += 1;
                }
                Err(reason) => {
                    warn!("error line: {} ({})", line, reason);
                    summary.rejected += 1;
                }
            }
        }

        info!(
            "Read {} lines: {} ingested, {} rejected",
            summary.lines_read, summary.accepted, summary.rejected
        );
        Ok(summary)
    }
}
