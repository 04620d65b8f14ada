use crate::core::normalize::Summaries;
use crate::domain::model::{RawRecord, Summary};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 輸出檔的寫入端，`path` 相對於輸出目錄
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 抓取 → 正規化 → 逐筆渲染
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>>;
    fn transform(&self, records: Vec<RawRecord>) -> Summaries;
    async fn load(&self, summary: &Summary) -> Result<String>;
}
