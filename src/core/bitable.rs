use crate::config::toml_config::{FeishuConfig, ListRecordsConfig};
use crate::domain::model::{RawRecord, RecordPage, TokenResponse};
use crate::utils::error::{ExportError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// 飛書開放平台的最小客戶端：取得 tenant token、列出多維表格記錄
#[derive(Debug, Clone)]
pub struct BitableClient {
    client: Client,
    base_url: Url,
}

impl BitableClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// 預設不設逾時，與遠端卡住時整個流程一起等待
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ExportError::InvalidConfigValueError {
            field: "feishu.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ExportError::InvalidConfigValueError {
                field: "feishu.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// 以 app_id / app_secret 換取 tenant_access_token。
    ///
    /// 回應中的 `code` 原樣回傳；只有傳輸失敗或回應不是 JSON 才會回傳錯誤。
    pub async fn obtain_token(&self, app_id: &str, app_secret: &str) -> Result<TokenResponse> {
        let url = self.endpoint(&["auth", "v3", "tenant_access_token", "internal"]);
        let payload = serde_json::json!({
            "app_id": app_id,
            "app_secret": app_secret,
        });

        tracing::debug!("Requesting tenant access token from: {}", url);
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(serde_json::to_vec(&payload)?)
            .send()
            .await?;
        tracing::debug!("Token response status: {}", response.status());

        let token: TokenResponse = response.json().await?;
        Ok(token)
    }

    /// 取得一頁記錄；`page_size` 未指定時為 100，`page_token` 未指定時從第一頁開始
    pub async fn list_records(
        &self,
        tenant_access_token: &str,
        app_token: &str,
        table_id: &str,
        page_token: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<RecordPage> {
        let url = self.endpoint(&[
            "bitable", "v1", "apps", app_token, "tables", table_id, "records",
        ]);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        let mut request = self
            .client
            .get(url.clone())
            .bearer_auth(tenant_access_token)
            .header(CONTENT_TYPE, JSON_UTF8)
            .query(&[("page_size", page_size.to_string())]);

        if let Some(page_token) = page_token.filter(|t| !t.is_empty()) {
            request = request.query(&[("page_token", page_token)]);
        }

        tracing::debug!("Listing records from: {} (page_size={})", url, page_size);
        let response = request.send().await?;
        tracing::debug!("List records response status: {}", response.status());

        let body: serde_json::Value = response.json().await?;
        Ok(RecordPage::from_response(body))
    }

    /// 取得 token 後抓取記錄。
    ///
    /// 預設只抓一頁；`follow_pages` 開啟時才會沿著 `page_token` 往下抓，
    /// 直到 `has_more` 為 false 或 token 重複。
    pub async fn collect_records(
        &self,
        feishu: &FeishuConfig,
        paging: &ListRecordsConfig,
    ) -> Result<Vec<RawRecord>> {
        let token = self.obtain_token(&feishu.app_id, &feishu.app_secret).await?;
        tracing::info!("🔑 Token request code: {:?}", token.code);
        if !token.is_success() {
            tracing::warn!(
                "⚠️ Token request returned code {:?} ({}), continuing anyway",
                token.code,
                token.msg.as_deref().unwrap_or("no message")
            );
        }

        let code = token.code;
        let access_token = token
            .tenant_access_token
            .filter(|t| !t.is_empty())
            .ok_or(ExportError::MissingTokenError { code })?;

        let mut records = Vec::new();
        let mut page_token = paging.page_token.clone().filter(|t| !t.is_empty());
        let mut seen: HashSet<String> = page_token.iter().cloned().collect();

        loop {
            let page = self
                .list_records(
                    &access_token,
                    &feishu.app_token,
                    &feishu.table_id,
                    page_token.as_deref(),
                    paging.page_size,
                )
                .await?;

            tracing::info!(
                "📥 List records code: {:?}, records size: {}",
                page.code,
                page.items.len()
            );
            if !page.is_success() {
                tracing::warn!(
                    "⚠️ List records returned code {:?} ({})",
                    page.code,
                    page.msg.as_deref().unwrap_or("no message")
                );
            }

            let has_more = page.has_more;
            let next_token = page.page_token;
            records.extend(page.items);

            if !paging.follows_pages() {
                if has_more {
                    tracing::info!(
                        "📄 More records available after page token {:?}; pagination not enabled",
                        next_token
                    );
                }
                break;
            }

            match next_token {
                Some(next) if has_more && seen.insert(next.clone()) => page_token = Some(next),
                _ => break,
            }
        }

        Ok(records)
    }
}
