/// 单条行情记录：日期(YYYYMMDD) + 价格(保持页面原文)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub date: String,
    pub price: String,
}

impl QuoteRecord {
    pub fn new(date: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            price: price.into(),
        }
    }

    /// 序列化为 CSV 行，不含换行符
    pub fn to_csv_line(&self) -> String {
        format!("{},{}", self.date, self.price)
    }
}

/// 需要抓取的列表页范围 [begin, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRange {
    pub begin: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(end: u32) -> Self {
        Self { begin: 0, end }
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    pub fn pages(&self) -> std::ops::Range<u32> {
        self.begin..self.end
    }
}
