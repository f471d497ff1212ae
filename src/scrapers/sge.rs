use crate::config::FetchConfig;
use crate::errors::{Result, DataHubError};
use crate::models::quote::{PageRange, QuoteRecord};
use crate::scrapers::base::PageSource;
use crate::util::{self, element_text, html_utils};
use log::{debug, info, warn};
use scraper::Html;

const PAGINATION_ITEMS: &str = "div.pagination div.paginationBar.fl li.border_ea.noLeft_border";
const ARTICLE_LIST: &str = "div.articleList.border_ea.mt30.mb30";
const ARTICLE_LINK: &str = "a.title.fs14.color333.clear";
const ARTICLE_DATE: &str = "span.fr";

/// 详情页正文容器，按顺序尝试；class 需整串匹配
const CONTENT_SELECTORS: &[&str] = &[
    r#"div[class="content"]"#,
    r#"div[class="content center1200 bgfff"]"#,
];

/// 只收录这两种黄金合约
const ACCEPTED_CODES: &[&str] = &["Au99.99", "Au9999"];

/// 行情表中价格所在列（第5列）
const PRICE_CELL: usize = 4;

/// 列表页上的一条公告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub date_label: String,
    pub href: String,
}

/// 解析分页按钮文本，形如 `xxx)>12`
pub fn parse_page_index(text: &str) -> Option<u32> {
    let parts: Vec<&str> = text.split(")>").collect();
    if parts.len() != 2 {
        return None;
    }
    parts[1].trim().parse::<u32>().ok()
}

/// 从列表页的分页控件中计算抓取范围
pub fn discover_page_range(html: &str) -> Result<PageRange> {
    let document = Html::parse_document(html);
    let items = util::selector(PAGINATION_ITEMS)?;

    let end = document
        .select(&items)
        .filter_map(|li| parse_page_index(&li.text().collect::<String>()))
        .max()
        .unwrap_or(0);

    Ok(PageRange::new(end))
}

/// 提取列表页中的公告链接；没有列表容器时返回 None
pub fn extract_listing_entries(html: &str) -> Result<Option<Vec<ListingEntry>>> {
    let document = Html::parse_document(html);
    let container = match html_utils::select_first(&document, &[ARTICLE_LIST])? {
        Some(container) => container,
        None => return Ok(None),
    };

    let mut entries = Vec::new();
    for anchor in html_utils::select_all(&container, ARTICLE_LINK)? {
        let date_label = match html_utils::select_child(&anchor, ARTICLE_DATE)? {
            Some(span) => element_text(&span),
            None => continue,
        };
        let href = match anchor.value().attr("href") {
            Some(href) => href.to_string(),
            None => continue,
        };
        entries.push(ListingEntry { date_label, href });
    }

    Ok(Some(entries))
}

pub fn is_accepted_code(code: &str) -> bool {
    ACCEPTED_CODES.contains(&code)
}

/// 从详情页的行情表中提取 Au99.99 / Au9999 的价格
///
/// 找不到正文容器、表格、tbody 或行时返回空列表。
pub fn extract_quotes(html: &str, date_label: &str) -> Result<Vec<QuoteRecord>> {
    let document = Html::parse_document(html);
    let date = util::normalize_date(date_label);

    let content = match html_utils::select_first(&document, CONTENT_SELECTORS)? {
        Some(content) => content,
        None => return Ok(Vec::new()),
    };
    let table = match html_utils::select_child(&content, "table")? {
        Some(table) => table,
        None => return Ok(Vec::new()),
    };
    let tbody = match html_utils::select_child(&table, "tbody")? {
        Some(tbody) => tbody,
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in html_utils::select_all(&tbody, "tr")? {
        let cells = html_utils::select_all(&row, "td")?;
        if cells.len() <= PRICE_CELL {
            continue;
        }
        if !is_accepted_code(&element_text(&cells[0])) {
            continue;
        }
        records.push(QuoteRecord::new(date.clone(), element_text(&cells[PRICE_CELL])));
    }

    Ok(records)
}

/// 上海黄金交易所每日行情抓取器
pub struct SgeScraper<S: PageSource> {
    source: S,
    config: FetchConfig,
}

impl<S: PageSource> SgeScraper<S> {
    pub fn new(source: S, config: FetchConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 请求列表首页并计算抓取范围；首页请求失败视为致命错误
    pub async fn discover_range(&self) -> Result<PageRange> {
        let url = &self.config.listing_url;
        let page = self.source.get(url).await?;
        if !page.is_ok() {
            return Err(DataHubError::ExchangeError(format!(
                "request {} error, {}", url, page.status
            )));
        }

        let range = discover_page_range(&page.body)?;
        info!("获取抓取范围 {} - {}", range.begin, range.end);
        Ok(range)
    }

    /// 抓取第 `page` 页列表；页面缺少列表容器时返回 None
    pub async fn scrape_page(&self, page: u32) -> Result<Option<Vec<ListingEntry>>> {
        let url = self.config.page_url(page);
        info!("开始请求url: {}", url);
        let fetched = self.source.get(&url).await?;
        if !fetched.is_ok() {
            warn!("request {} returned {}", url, fetched.status);
        }
        extract_listing_entries(&fetched.body)
    }

    /// 抓取一条公告的详情页并提取价格
    pub async fn fetch_detail(&self, entry: &ListingEntry) -> Result<Vec<QuoteRecord>> {
        let url = util::resolve_url(&self.config.base_url, &entry.href)?;
        info!("开始请求url: {}", url);
        let fetched = self.source.get(&url).await?;
        if !fetched.is_ok() {
            warn!("request {} returned {}", url, fetched.status);
        }

        let records = extract_quotes(&fetched.body, &entry.date_label)?;
        debug!("{} 条行情来自 {}", records.len(), url);
        Ok(records)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scrapers::base::FetchedPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 内存中的页面来源，记录请求过的地址
    pub(crate) struct StaticPages {
        pages: HashMap<String, FetchedPage>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticPages {
        pub(crate) fn new() -> Self {
            Self {
                pages: HashMap::new(),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_page(mut self, url: &str, status: u16, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage { status, body: body.to_string() },
            );
            self
        }

        pub(crate) fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for StaticPages {
        async fn get(&self, url: &str) -> Result<FetchedPage> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| DataHubError::ExchangeError(format!("no page for {}", url)))
        }
    }

    pub(crate) fn pagination_html(labels: &[&str]) -> String {
        let items: String = labels
            .iter()
            .map(|l| format!(r#"<li class="border_ea noLeft_border">{}</li>"#, l))
            .collect();
        format!(
            r#"<html><body><div class="pagination"><div class="paginationBar fl"><ul>{}</ul></div></div></body></html>"#,
            items
        )
    }

    pub(crate) fn listing_html(entries: &[(&str, &str)]) -> String {
        let anchors: String = entries
            .iter()
            .map(|(date, href)| {
                format!(
                    r#"<li><a class="title fs14  color333 clear" href="{}">上海黄金交易所{}行情<span class="fr">{}</span></a></li>"#,
                    href, date, date
                )
            })
            .collect();
        format!(
            r#"<html><body><div class="articleList border_ea mt30 mb30"><ul>{}</ul></div></body></html>"#,
            anchors
        )
    }

    pub(crate) fn detail_html(rows: &[&[&str]]) -> String {
        let body: String = rows
            .iter()
            .map(|cells| {
                let tds: String = cells.iter().map(|c| format!("<td> {} </td>", c)).collect();
                format!("<tr>{}</tr>", tds)
            })
            .collect();
        format!(
            r#"<html><body><div class="content"><table><tbody>{}</tbody></table></div></body></html>"#,
            body
        )
    }

    #[test]
    fn parse_page_index_accepts_single_marker() {
        assert_eq!(parse_page_index("goPage(12)>12"), Some(12));
        assert_eq!(parse_page_index(")>7"), Some(7));
        assert_eq!(parse_page_index("x)> 3 "), Some(3));
    }

    #[test]
    fn parse_page_index_rejects_malformed() {
        assert_eq!(parse_page_index("12"), None);
        assert_eq!(parse_page_index("a)>1)>2"), None);
        assert_eq!(parse_page_index("next)>»"), None);
        assert_eq!(parse_page_index(""), None);
    }

    #[test]
    fn discover_takes_maximum_well_formed_index() {
        let html = pagination_html(&["p)>1", "p)>9", "p)>4", "broken", "a)>2)>99"]);
        assert_eq!(discover_page_range(&html).unwrap(), PageRange::new(9));
    }

    #[test]
    fn discover_without_pagination_is_empty() {
        let range = discover_page_range("<html><body><p>nothing</p></body></html>").unwrap();
        assert_eq!(range, PageRange::default());
        assert!(range.is_empty());
    }

    #[test]
    fn listing_entries_carry_date_and_link() {
        let html = listing_html(&[("2023-01-03", "/sjzx/mrhqsj/2"), ("2023-01-02", "/sjzx/mrhqsj/1")]);
        let entries = extract_listing_entries(&html).unwrap().unwrap();
        assert_eq!(
            entries,
            vec![
                ListingEntry { date_label: "2023-01-03".into(), href: "/sjzx/mrhqsj/2".into() },
                ListingEntry { date_label: "2023-01-02".into(), href: "/sjzx/mrhqsj/1".into() },
            ]
        );
    }

    #[test]
    fn listing_without_container_is_skipped() {
        assert!(extract_listing_entries("<html><body></body></html>").unwrap().is_none());
    }

    #[test]
    fn listing_anchor_without_date_is_dropped() {
        let html = r#"<div class="articleList border_ea mt30 mb30">
            <a class="title fs14 color333 clear" href="/a">no date</a>
            <a class="title fs14 color333 clear"><span class="fr">2023-01-02</span></a>
        </div>"#;
        assert_eq!(extract_listing_entries(html).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn quotes_only_for_accepted_codes_with_five_cells() {
        let html = detail_html(&[
            &["Au99.99", "a", "b", "c", "412.50"],
            &["Au9999", "a", "b", "c", "413.00", "extra"],
            &["Au99.95", "a", "b", "c", "400.00"],
            &["au99.99", "a", "b", "c", "401.00"],
            &["Au99.99", "a", "b", "c"],
            &["Ag(T+D)", "a", "b", "c", "5.00"],
        ]);
        let records = extract_quotes(&html, "2023-01-02").unwrap();
        assert_eq!(
            records,
            vec![
                QuoteRecord::new("20230102", "412.50"),
                QuoteRecord::new("20230102", "413.00"),
            ]
        );
    }

    #[test]
    fn quotes_fall_back_to_secondary_container() {
        let html = r#"<html><body><div class="content center1200 bgfff"><table><tbody>
            <tr><td>Au9999</td><td>1</td><td>2</td><td>3</td><td>399.10</td></tr>
        </tbody></table></div></body></html>"#;
        let records = extract_quotes(html, "20230105").unwrap();
        assert_eq!(records, vec![QuoteRecord::new("20230105", "399.10")]);
    }

    #[test]
    fn quotes_prefer_exact_content_over_earlier_wrapper() {
        let html = r#"<html><body>
            <div class="content center1200 bgfff"><p>banner</p></div>
            <div class="content"><table><tbody>
                <tr><td>Au99.99</td><td>1</td><td>2</td><td>3</td><td>412.50</td></tr>
            </tbody></table></div>
        </body></html>"#;
        let records = extract_quotes(html, "2023-01-02").unwrap();
        assert_eq!(records, vec![QuoteRecord::new("20230102", "412.50")]);
    }

    #[test]
    fn quotes_ignore_containers_with_other_class_sets() {
        let html = r#"<html><body><div class="content extra"><table><tbody>
            <tr><td>Au99.99</td><td>1</td><td>2</td><td>3</td><td>412.50</td></tr>
        </tbody></table></div></body></html>"#;
        assert!(extract_quotes(html, "2023-01-02").unwrap().is_empty());
    }

    #[test]
    fn quotes_missing_structure_yield_nothing() {
        assert!(extract_quotes("<html><body></body></html>", "2023-01-02").unwrap().is_empty());
        assert!(extract_quotes(r#"<div class="content"><p>no table</p></div>"#, "2023-01-02")
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn discover_range_fails_on_non_200() {
        let config = FetchConfig::new().with_listing_url("http://sge.test/list");
        let source = StaticPages::new().with_page("http://sge.test/list", 503, "");
        let scraper = SgeScraper::new(source, config);
        let err = scraper.discover_range().await.unwrap_err();
        assert!(matches!(err, DataHubError::ExchangeError(_)));
    }

    #[tokio::test]
    async fn fetch_detail_resolves_against_base_url() {
        let config = FetchConfig::new()
            .with_base_url("http://sge.test")
            .with_listing_url("http://sge.test/list");
        let detail = detail_html(&[&["Au99.99", "a", "b", "c", "420.00"]]);
        let source = StaticPages::new().with_page("http://sge.test/detail/1", 200, &detail);
        let scraper = SgeScraper::new(source, config);

        let entry = ListingEntry { date_label: "2023-02-01".into(), href: "/detail/1".into() };
        let records = scraper.fetch_detail(&entry).await.unwrap();
        assert_eq!(records, vec![QuoteRecord::new("20230201", "420.00")]);
    }
}
