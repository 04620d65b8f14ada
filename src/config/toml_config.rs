use crate::core::bitable::DEFAULT_BASE_URL;
use crate::domain::model::FieldMapping;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "./qrcodes";
pub const DEFAULT_FONT_PATH: &str = "msyhl.ttc";
pub const DEFAULT_FONT_SIZE: f32 = 34.0;
pub const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub feishu: FeishuConfig,
    #[serde(rename = "LIST_RECORDS", default)]
    pub list_records: ListRecordsConfig,
    #[serde(default)]
    pub fields: FieldMapping,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeishuConfig {
    pub app_id: String,
    pub app_secret: String,
    pub app_token: String,
    pub table_id: String,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// 分頁參數，呼叫端沒有指定時作為預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRecordsConfig {
    pub page_token: Option<String>,
    pub page_size: Option<u32>,
    pub follow_pages: Option<bool>,
}

impl ListRecordsConfig {
    pub fn follows_pages(&self) -> bool {
        self.follow_pages.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output_dir: String,
    pub font_path: String,
    pub font_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            font_path: DEFAULT_FONT_PATH.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl ExportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FEISHU_APP_SECRET})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExportError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("feishu.app_id", &self.feishu.app_id)?;
        validation::validate_non_empty_string("feishu.app_secret", &self.feishu.app_secret)?;
        validation::validate_non_empty_string("feishu.app_token", &self.feishu.app_token)?;
        validation::validate_non_empty_string("feishu.table_id", &self.feishu.table_id)?;
        validation::validate_url("feishu.base_url", self.base_url())?;

        if let Some(timeout) = self.feishu.timeout_seconds {
            validation::validate_positive_number("feishu.timeout_seconds", timeout, 1)?;
        }

        if let Some(page_size) = self.list_records.page_size {
            validation::validate_range("LIST_RECORDS.page_size", page_size, 1, MAX_PAGE_SIZE)?;
        }

        if let Some(hours) = self.fields.utc_offset_hours {
            validation::validate_range("fields.utc_offset_hours", hours, -12, 14)?;
        }

        validation::validate_path("render.output_dir", &self.render.output_dir)?;
        validation::validate_path("render.font_path", &self.render.font_path)?;
        validation::validate_file_extension(
            "render.font_path",
            &self.render.font_path,
            &["ttf", "ttc", "otf"],
        )?;
        validation::validate_range("render.font_size", self.render.font_size, 1.0, 200.0)?;

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.feishu.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.feishu.timeout_seconds.map(Duration::from_secs)
    }

    pub fn output_dir(&self) -> &str {
        &self.render.output_dir
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[feishu]
app_id = "cli_a514aea9fa79900b"
app_secret = "secret"
app_token = "CmHmb4MxPaEW7zsWB07c1hCUnhd"
table_id = "tbl3OBzMMqjX79gN"
"#;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = ExportConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.feishu.app_token, "CmHmb4MxPaEW7zsWB07c1hCUnhd");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.list_records.page_token, None);
        assert_eq!(config.list_records.page_size, None);
        assert!(!config.list_records.follows_pages());
        assert_eq!(config.fields, FieldMapping::default());
        assert_eq!(config.output_dir(), DEFAULT_OUTPUT_DIR);
        assert_eq!(config.render.font_path, DEFAULT_FONT_PATH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[feishu]
app_id = "cli_test"
app_secret = "secret"
app_token = "app"
table_id = "tbl"
base_url = "http://127.0.0.1:9000/open-apis"
timeout_seconds = 30

[LIST_RECORDS]
page_token = "recy9dpWvY"
page_size = 20
follow_pages = true

[fields]
user = "Owner"
date = "Checked on"
utc_offset_hours = 8

[render]
output_dir = "./cards"
font_path = "fonts/NotoSansSC-Regular.otf"
font_size = 28.0
"#;

        let config = ExportConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), "http://127.0.0.1:9000/open-apis");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.list_records.page_token.as_deref(), Some("recy9dpWvY"));
        assert_eq!(config.list_records.page_size, Some(20));
        assert!(config.list_records.follows_pages());
        assert_eq!(config.fields.user, "Owner");
        assert_eq!(config.fields.device_no, "设备编号");
        assert_eq!(config.fields.utc_offset_hours, Some(8));
        assert_eq!(config.render.font_size, 28.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BITABLE_QR_TEST_SECRET", "from-env");

        let toml_content = r#"
[feishu]
app_id = "cli_test"
app_secret = "${BITABLE_QR_TEST_SECRET}"
app_token = "app"
table_id = "${BITABLE_QR_TEST_UNDEFINED}"
"#;

        let config = ExportConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.feishu.app_secret, "from-env");
        assert_eq!(config.feishu.table_id, "${BITABLE_QR_TEST_UNDEFINED}");

        std::env::remove_var("BITABLE_QR_TEST_SECRET");
    }

    #[test]
    fn test_config_validation() {
        let mut config = ExportConfig::from_toml_str(MINIMAL).unwrap();
        config.list_records.page_size = Some(0);
        assert!(config.validate().is_err());

        let mut config = ExportConfig::from_toml_str(MINIMAL).unwrap();
        config.feishu.base_url = Some("invalid-url".to_string());
        assert!(config.validate().is_err());

        let mut config = ExportConfig::from_toml_str(MINIMAL).unwrap();
        config.feishu.app_secret = String::new();
        assert!(matches!(
            config.validate(),
            Err(ExportError::MissingConfigError { .. })
        ));

        let mut config = ExportConfig::from_toml_str(MINIMAL).unwrap();
        config.render.font_path = "font.woff".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_feishu_section_is_rejected() {
        let err = ExportConfig::from_toml_str("[LIST_RECORDS]\npage_size = 10\n").unwrap_err();
        assert!(matches!(err, ExportError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = ExportConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.feishu.table_id, "tbl3OBzMMqjX79gN");

        assert!(ExportConfig::from_file("does-not-exist.toml").is_err());
    }
}
