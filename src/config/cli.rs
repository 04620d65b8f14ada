use crate::config::toml_config::ExportConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "bitable-qr")]
#[command(about = "Export Feishu bitable records as QR code cards")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "bitable-qr.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Start listing from this page token
    #[arg(long)]
    pub page_token: Option<String>,

    /// Records per page (1-500)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Directory that receives the qrcode_<Uid>.png files (must exist)
    #[arg(long)]
    pub output_dir: Option<String>,

    /// TrueType font used for the card text
    #[arg(long)]
    pub font: Option<String>,

    /// Keep following page tokens until the table is exhausted
    #[arg(long)]
    pub all_pages: bool,

    /// Fetch and normalize only, without writing any image
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// 命令列參數優先於設定檔
    pub fn apply_overrides(&self, config: &mut ExportConfig) {
        if let Some(page_token) = &self.page_token {
            config.list_records.page_token = Some(page_token.clone());
        }
        if let Some(page_size) = self.page_size {
            config.list_records.page_size = Some(page_size);
        }
        if let Some(output_dir) = &self.output_dir {
            config.render.output_dir = output_dir.clone();
        }
        if let Some(font) = &self.font {
            config.render.font_path = font.clone();
        }
        if self.all_pages {
            config.list_records.follow_pages = Some(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = ExportConfig::from_toml_str(
            r#"
[feishu]
app_id = "cli_test"
app_secret = "secret"
app_token = "app"
table_id = "tbl"

[LIST_RECORDS]
page_token = "from-file"
page_size = 50
"#,
        )
        .unwrap();

        let args = CliArgs::parse_from([
            "bitable-qr",
            "--page-size",
            "10",
            "--output-dir",
            "/tmp/cards",
            "--all-pages",
        ]);
        args.apply_overrides(&mut config);

        assert_eq!(config.list_records.page_token.as_deref(), Some("from-file"));
        assert_eq!(config.list_records.page_size, Some(10));
        assert_eq!(config.render.output_dir, "/tmp/cards");
        assert!(config.list_records.follows_pages());
        assert_eq!(args.config, "bitable-qr.toml");
    }
}
