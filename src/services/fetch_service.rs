use crate::errors::Result;
use crate::models::quote::PageRange;
use crate::scrapers::base::PageSource;
use crate::scrapers::sge::SgeScraper;
use crate::services::csv_sink::{CsvQuoteWriter, QuoteSink};
use log::{info, warn};
use std::path::Path;

/// 一次抓取的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub pages_requested: u32,
    pub pages_skipped: u32,
    pub details_fetched: u32,
    pub details_skipped: u32,
    pub records_written: usize,
}

/// 抓取服务：分页发现 -> 列表页 -> 详情页 -> 写入
pub struct FetchService<S: PageSource> {
    scraper: SgeScraper<S>,
}

impl<S: PageSource> FetchService<S> {
    pub fn new(scraper: SgeScraper<S>) -> Self {
        Self { scraper }
    }

    pub async fn discover_range(&self) -> Result<PageRange> {
        self.scraper.discover_range().await
    }

    /// 执行完整抓取。只有首页请求失败和写入失败会中止，其余问题跳过
    pub async fn run<K: QuoteSink>(&self, sink: &mut K) -> Result<FetchSummary> {
        let range = self.discover_range().await?;
        self.run_range(range, sink).await
    }

    /// 首页请求成功后才打开（追加）输出文件
    pub async fn run_to_file(&self, path: impl AsRef<Path>) -> Result<FetchSummary> {
        let range = self.discover_range().await?;
        let mut sink = CsvQuoteWriter::open_append(path)?;
        self.run_range(range, &mut sink).await
    }

    /// 抓取给定范围内的所有列表页
    pub async fn run_range<K: QuoteSink>(&self, range: PageRange, sink: &mut K) -> Result<FetchSummary> {
        let mut summary = FetchSummary::default();
        if range.is_empty() {
            info!("No pages to fetch");
        }

        for page in range.pages() {
            summary.pages_requested += 1;

            let entries = match self.scraper.scrape_page(page).await {
                Ok(Some(entries)) => entries,
                Ok(None) => {
                    warn!("Page {} has no article list, skipping", page);
                    summary.pages_skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Failed to fetch page {}: {}", page, e);
                    summary.pages_skipped += 1;
                    continue;
                }
            };

            for entry in &entries {
                let records = match self.scraper.fetch_detail(entry).await {
                    Ok(records) => records,
                    Err(e) => {
                        warn!("Failed to fetch {} ({}): {}", entry.href, entry.date_label, e);
                        summary.details_skipped += 1;
                        continue;
                    }
                };
                summary.details_fetched += 1;

                for record in &records {
                    info!("date: {} price: {}", record.date, record.price);
                    sink.write_record(record)?;
                    summary.records_written += 1;
                }
            }
        }

        info!(
            "Fetched {} pages ({} skipped), {} detail pages ({} skipped), {} records written",
            summary.pages_requested,
            summary.pages_skipped,
            summary.details_fetched,
            summary.details_skipped,
            summary.records_written
        );
        Ok(summary)
    }
}
