use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.sge.com.cn";
pub const DEFAULT_LISTING_URL: &str = "https://www.sge.com.cn/sjzx/mrhqsj";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:106.0) Gecko/20100101 Firefox/106.0";
pub const DEFAULT_INGEST_EXE: &str = "/usr/local/jarvis/bin/gold-tool";

/// 请求头模式：Rich 携带浏览器风格的请求头，Bare 不附加任何自定义请求头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    Rich,
    Bare,
}

/// 抓取端配置
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub listing_url: String,
    pub client_mode: ClientMode,
    pub user_agent: String,
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            client_mode: ClientMode::Rich,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn with_listing_url(mut self, url: &str) -> Self {
        self.listing_url = url.to_string();
        self
    }

    pub fn with_client_mode(mut self, mode: ClientMode) -> Self {
        self.client_mode = mode;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 第 `page` 页列表的地址
    pub fn page_url(&self, page: u32) -> String {
        format!("{}?p={}", self.listing_url, page)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 入库端配置
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub executable: PathBuf,
    pub operation: String,
}

impl IngestConfig {
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_INGEST_EXE),
            // 入库工具的 "u" 表示更新价格
            operation: "u".to_string(),
        }
    }

    pub fn with_executable(mut self, exe: &str) -> Self {
        self.executable = PathBuf::from(exe);
        self
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::new()
    }
}
