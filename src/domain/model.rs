use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `tenant_access_token/internal` 的回應。`code` 非 0 時照樣回傳，由呼叫端判斷。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub code: Option<i64>,
    pub msg: Option<String>,
    pub tenant_access_token: Option<String>,
    pub expire: Option<i64>,
}

impl TokenResponse {
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// 多維表格回傳的一筆原始記錄，保持未經檢查的 JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    pub data: Value,
}

impl From<Value> for RawRecord {
    fn from(data: Value) -> Self {
        Self { data }
    }
}

impl RawRecord {
    pub fn record_id(&self) -> Option<&str> {
        self.data.get("record_id").and_then(Value::as_str)
    }
}

/// 一頁 list-records 回應
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    pub code: Option<i64>,
    pub msg: Option<String>,
    pub items: Vec<RawRecord>,
    pub has_more: bool,
    pub page_token: Option<String>,
    pub total: Option<u64>,
}

impl RecordPage {
    /// 缺少 `data.items` 時視為空頁，不當成錯誤
    pub fn from_response(mut body: Value) -> Self {
        let items = match body.pointer_mut("/data/items").map(Value::take) {
            Some(Value::Array(items)) => items.into_iter().map(RawRecord::from).collect(),
            _ => Vec::new(),
        };

        let data = body.get("data");
        Self {
            code: body.get("code").and_then(Value::as_i64),
            msg: body.get("msg").and_then(Value::as_str).map(str::to_string),
            items,
            has_more: data
                .and_then(|d| d.get("has_more"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
            page_token: data
                .and_then(|d| d.get("page_token"))
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            total: data.and_then(|d| d.get("total")).and_then(Value::as_u64),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// 印在 QR 卡片上的五個欄位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "Uid")]
    pub uid: String,
    #[serde(rename = "User")]
    pub user: String,
    pub date: String,
    #[serde(rename = "No.")]
    pub no: String,
    #[serde(rename = "Proj")]
    pub proj: String,
}

impl Summary {
    pub fn lines(&self) -> [String; 5] {
        [
            format!("Uid: {}", self.uid),
            format!("User: {}", self.user),
            format!("Date: {}", self.date),
            format!("No.: {}", self.no),
            format!("Proj: {}", self.proj),
        ]
    }

    /// QR 內容與卡片左側文字相同
    pub fn text_block(&self) -> String {
        self.lines().join("\n")
    }

    pub fn file_name(&self) -> String {
        format!("qrcode_{}.png", self.uid)
    }
}

/// 日期欄位換算用的時區
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DateZone {
    pub fn utc() -> Self {
        DateZone::Fixed(Utc.fix())
    }

    pub fn from_offset_hours(hours: i32) -> Option<Self> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(DateZone::Fixed)
    }

    /// 毫秒時間戳轉為 `YYYY/MM/DD`；超出範圍回傳 `None`
    pub fn format_millis(&self, millis: i64) -> Option<String> {
        let instant = DateTime::<Utc>::from_timestamp_millis(millis)?;
        let formatted = match self {
            DateZone::Local => instant.with_timezone(&Local).format("%Y/%m/%d"),
            DateZone::Fixed(offset) => instant.with_timezone(offset).format("%Y/%m/%d"),
        };
        Some(formatted.to_string())
    }
}

/// 多維表格欄位名稱對應。預設值為表格實際使用的中文欄名；
/// 使用狀態、多選、討論群、附件等欄位不會被讀取。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub user: String,
    pub date: String,
    pub device_no: String,
    pub project: String,
    /// 未設定時使用本機時區
    pub utc_offset_hours: Option<i32>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            user: "人员".to_string(),
            date: "日期".to_string(),
            device_no: "设备编号".to_string(),
            project: "项目".to_string(),
            utc_offset_hours: None,
        }
    }
}

impl FieldMapping {
    pub fn zone(&self) -> DateZone {
        self.utc_offset_hours
            .and_then(DateZone::from_offset_hours)
            .unwrap_or_default()
    }
}
