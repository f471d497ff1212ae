use crate::errors::{Result, DataHubError};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

/// 初始化日志：默认 info 级别，输出到标准输出，可用 RUST_LOG 覆盖
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();
}

// 日期转换工具：去掉所有 '-'，"2023-01-02" -> "20230102"
pub fn normalize_date(label: &str) -> String {
    label.trim().replace('-', "")
}

/// 把详情页的相对链接解析为绝对地址
pub fn resolve_url(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base)
        .map_err(|e| DataHubError::DataError(format!("Invalid base url {}: {}", base, e)))?;
    let url = base
        .join(href)
        .map_err(|e| DataHubError::DataError(format!("Invalid link {}: {}", href, e)))?;
    Ok(url.to_string())
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| DataHubError::DataError(format!("Invalid selector {}: {:?}", css, e)))
}

/// 元素的全部文本，去掉首尾空白
pub fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

// HTML选择工具
pub mod html_utils {
    use super::*;

    /// 按顺序尝试候选选择器，返回第一个命中的元素
    pub fn select_first<'a>(document: &'a Html, candidates: &[&str]) -> Result<Option<ElementRef<'a>>> {
        for css in candidates {
            let sel = selector(css)?;
            if let Some(element) = document.select(&sel).next() {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    pub fn select_child<'a>(element: &ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>> {
        let sel = selector(css)?;
        Ok(element.select(&sel).next())
    }

    pub fn select_all<'a>(element: &ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>> {
        let sel = selector(css)?;
        Ok(element.select(&sel).collect())
    }
}
