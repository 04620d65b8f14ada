use bitable_qr::utils::error::{ErrorSeverity, ExportError};
use bitable_qr::utils::{logger, validation::Validate};
use bitable_qr::{CliArgs, EtlEngine, ExportConfig, LocalStorage, QrExportPipeline};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting bitable-qr");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match ExportConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 命令列覆蓋設定
    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if args.verbose {
        tracing::debug!(
            "Table {} / {}, output {}, font {}",
            config.feishu.app_token,
            config.feishu.table_id,
            config.output_dir(),
            config.render.font_path
        );
    }

    let storage = LocalStorage::new(config.output_dir().to_string());
    let pipeline = match QrExportPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };
    let engine = EtlEngine::new(pipeline);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no images will be written");
        match engine.dry_run().await {
            Ok(summaries) => println!("🔍 {} records would be rendered", summaries.len()),
            Err(e) => exit_with(&e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ QR export completed successfully!");
            println!("✅ QR export completed successfully!");
            println!(
                "📊 fetched {}, rendered {}, skipped {}",
                report.fetched, report.rendered, report.skipped
            );
            for output in &report.outputs {
                println!("📁 {}", output);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn exit_with(e: &ExportError) -> ! {
    tracing::error!(
        "❌ QR export failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
