/// 网页搜索客户端
///
/// 通过 DuckDuckGo 的 HTML 接口获取搜索摘要，拼接成一段上下文文本
use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppResult, ConfigError, ExternalCallError};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const RESULT_SELECTOR: &str = "div.result:not(.result--ad)";
const TITLE_SELECTOR: &str = ".result__a";
const SNIPPET_SELECTOR: &str = ".result__snippet";

/// 搜索能力
///
/// 返回非结构化的上下文文本，可能为空字符串。失败直接向上传播，不重试。
pub trait SearchProvider {
    fn search(&self, query: &str, limit: usize) -> impl Future<Output = AppResult<String>> + Send;
}

/// 单条搜索结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
}

impl SearchHit {
    /// 优先使用摘要，没有摘要时用标题
    pub fn text(&self) -> &str {
        if self.snippet.is_empty() {
            &self.title
        } else {
            &self.snippet
        }
    }
}

/// DuckDuckGo 搜索客户端
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
}

impl SearchClient {
    /// 创建新的搜索客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|source| ConfigError::HttpClient { source })?;

        Ok(Self {
            client,
            base_url: config.search_base_url.clone(),
        })
    }
}

impl SearchProvider for SearchClient {
    async fn search(&self, query: &str, limit: usize) -> AppResult<String> {
        debug!("搜索: '{}' (最多 {} 条)", query, limit);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ExternalCallError::search_failed(query, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("搜索返回错误状态: {}", status);
            return Err(ExternalCallError::SearchStatus {
                query: query.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let html = response
            .text()
            .await
            .map_err(|e| ExternalCallError::search_failed(query, e))?;

        let hits = parse_results(&html, limit)?;
        if hits.is_empty() {
            warn!("搜索没有结果: '{}'", query);
        }
        debug!("搜索得到 {} 条结果", hits.len());

        Ok(join_hits(&hits))
    }
}

/// 解析 DuckDuckGo HTML 结果页，最多返回 `limit` 条
pub fn parse_results(html: &str, limit: usize) -> AppResult<Vec<SearchHit>> {
    let result_selector = selector(RESULT_SELECTOR)?;
    let title_selector = selector(TITLE_SELECTOR)?;
    let snippet_selector = selector(SNIPPET_SELECTOR)?;

    let document = Html::parse_document(html);
    let hits = document
        .select(&result_selector)
        .map(|result| SearchHit {
            title: result
                .select(&title_selector)
                .next()
                .map(|e| collapse_whitespace(e.text()))
                .unwrap_or_default(),
            snippet: result
                .select(&snippet_selector)
                .next()
                .map(|e| collapse_whitespace(e.text()))
                .unwrap_or_default(),
        })
        .filter(|hit| !hit.text().is_empty())
        .take(limit)
        .collect();

    Ok(hits)
}

/// 把多条结果拼成一段上下文，空格分隔
pub fn join_hits(hits: &[SearchHit]) -> String {
    hits.iter().map(SearchHit::text).collect::<Vec<_>>().join(" ")
}

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| {
        ConfigError::InvalidSelector {
            selector: css.to_string(),
            message: format!("{e:?}"),
        }
        .into()
    })
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
