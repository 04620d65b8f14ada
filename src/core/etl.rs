use crate::core::{Pipeline, Summary};
use crate::utils::error::Result;
use serde::Serialize;

/// 一次執行的結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub fetched: usize,
    pub rendered: usize,
    pub skipped: usize,
    pub outputs: Vec<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 逐筆正規化並渲染，前一筆寫完才處理下一筆。渲染失敗即中止。
    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting QR export...");

        let raw_records = self.pipeline.extract().await?;
        let fetched = raw_records.len();
        tracing::info!("Extracted {} records", fetched);

        let mut summaries = self.pipeline.transform(raw_records);
        let mut outputs = Vec::new();
        for summary in summaries.by_ref() {
            tracing::debug!("qr_data: {:?}", summary);
            let output = self.pipeline.load(&summary).await?;
            tracing::info!("🖼️ Rendered {}", output);
            outputs.push(output);
        }

        let report = RunReport {
            fetched,
            rendered: outputs.len(),
            skipped: summaries.skipped(),
            outputs,
        };
        tracing::info!(
            "Rendered {} of {} records ({} skipped)",
            report.rendered,
            report.fetched,
            report.skipped
        );
        Ok(report)
    }

    /// 只抓取與正規化，不寫任何檔案
    pub async fn dry_run(&self) -> Result<Vec<Summary>> {
        let raw_records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", raw_records.len());

        let summaries: Vec<Summary> = self.pipeline.transform(raw_records).collect();
        for summary in &summaries {
            tracing::info!("🔍 Would render qrcode_{}.png: {:?}", summary.uid, summary);
        }
        Ok(summaries)
    }
}
