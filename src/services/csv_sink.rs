use crate::errors::Result;
use crate::models::quote::QuoteRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// 行情记录的写入端
pub trait QuoteSink {
    fn write_record(&mut self, record: &QuoteRecord) -> Result<()>;
}

/// 追加写入 CSV 文件，每写一行立即 flush
pub struct CsvQuoteWriter<W: Write> {
    writer: W,
    written: usize,
}

impl CsvQuoteWriter<File> {
    /// 以追加模式打开（不存在则创建），保留已有内容
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(file))
    }
}

impl<W: Write> CsvQuoteWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> QuoteSink for CsvQuoteWriter<W> {
    fn write_record(&mut self, record: &QuoteRecord) -> Result<()> {
        writeln!(self.writer, "{}", record.to_csv_line())?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

/// 逐行读取 CSV 文件，保留原始行文本
pub struct CsvLines {
    path: PathBuf,
    lines: std::io::Lines<BufReader<File>>,
}

pub fn read_lines(path: impl AsRef<Path>) -> Result<CsvLines> {
    let path = path.as_ref().to_path_buf();
    let file = File::open(&path)?;
    Ok(CsvLines {
        path,
        lines: BufReader::new(file).lines(),
    })
}

impl CsvLines {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for CsvLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(|line| line.map_err(Into::into))
    }
}
