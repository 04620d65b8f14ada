use crate::config::toml_config::ExportConfig;
use crate::core::bitable::BitableClient;
use crate::core::normalize::Summaries;
use crate::core::render::QrRenderer;
use crate::core::{Pipeline, RawRecord, Storage, Summary};
use crate::utils::error::Result;

/// 多維表格 → QR 卡片
pub struct QrExportPipeline<S: Storage> {
    client: BitableClient,
    config: ExportConfig,
    renderer: QrRenderer<S>,
}

impl<S: Storage> QrExportPipeline<S> {
    /// 字型在建構時載入，找不到字型時在抓取資料前就失敗
    pub fn new(storage: S, config: ExportConfig) -> Result<Self> {
        let client = BitableClient::with_timeout(config.base_url(), config.timeout())?;
        let renderer = QrRenderer::from_font_file(
            storage,
            &config.render.font_path,
            config.render.font_size,
        )?;
        Ok(Self::with_parts(client, config, renderer))
    }

    pub fn with_parts(client: BitableClient, config: ExportConfig, renderer: QrRenderer<S>) -> Self {
        Self {
            client,
            config,
            renderer,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for QrExportPipeline<S> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        tracing::info!(
            "🚀 Fetching records from table {} (app {})",
            self.config.feishu.table_id,
            self.config.feishu.app_token
        );
        self.client
            .collect_records(&self.config.feishu, &self.config.list_records)
            .await
    }

    fn transform(&self, records: Vec<RawRecord>) -> Summaries {
        Summaries::new(records, self.config.fields.clone())
    }

    async fn load(&self, summary: &Summary) -> Result<String> {
        let file_name = self.renderer.render(summary).await?;
        Ok(format!(
            "{}/{}",
            self.config.output_dir().trim_end_matches('/'),
            file_name
        ))
    }
}
