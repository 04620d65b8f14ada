//! 原始記錄 → [`Summary`] 的正規化。
//!
//! 任一欄位抽取失敗時整筆記錄作廢並回傳 [`SkipReason`]，不會產生部分填入的 Summary。

use crate::domain::model::{DateZone, FieldMapping, RawRecord, Summary};
use crate::utils::error::SkipReason;
use serde_json::{Map, Value};

/// 使用預設欄位名稱與本機時區
pub fn normalize(record: &RawRecord) -> Result<Summary, SkipReason> {
    normalize_with(record, &FieldMapping::default(), DateZone::Local)
}

pub fn normalize_with(
    record: &RawRecord,
    mapping: &FieldMapping,
    zone: DateZone,
) -> Result<Summary, SkipReason> {
    let item = record.data.as_object().ok_or(SkipReason::NotAnObject)?;

    let uid = text_value(item.get("record_id"));

    let columns = match item.get("fields") {
        None => None,
        Some(Value::Object(columns)) => Some(columns),
        Some(other) => return Err(wrong_type("fields", "an object", other)),
    };

    let user = first_person_name(&mapping.user, column(columns, &mapping.user))?;

    let millis = epoch_millis(&mapping.date, column(columns, &mapping.date))?;
    let date = zone
        .format_millis(millis)
        .ok_or_else(|| SkipReason::InvalidTimestamp {
            field: mapping.date.clone(),
            millis,
        })?;

    let no = text_value(column(columns, &mapping.device_no));
    let proj = text_value(column(columns, &mapping.project));

    Ok(Summary {
        uid,
        user,
        date,
        no,
        proj,
    })
}

fn column<'a>(columns: Option<&'a Map<String, Value>>, name: &str) -> Option<&'a Value> {
    columns.and_then(|c| c.get(name))
}

/// 人員欄位：不存在或空清單 → 空字串；`null` 或非清單視為結構錯誤
fn first_person_name(field: &str, value: Option<&Value>) -> Result<String, SkipReason> {
    match value {
        None => Ok(String::new()),
        Some(Value::Array(people)) => match people.first() {
            None => Ok(String::new()),
            Some(Value::Object(person)) => Ok(text_value(person.get("name"))),
            Some(other) => Err(wrong_type(field, "a person object", other)),
        },
        Some(other) => Err(wrong_type(field, "a person list", other)),
    }
}

/// 日期欄位：不存在 → 0；`null` 或字串等非數值一律作廢
fn epoch_millis(field: &str, value: Option<&Value>) -> Result<i64, SkipReason> {
    match value {
        None => Ok(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.floor() as i64)
            })
            .ok_or_else(|| SkipReason::InvalidTimestamp {
                field: field.to_string(),
                millis: i64::MAX,
            }),
        Some(other) => Err(wrong_type(field, "epoch milliseconds", other)),
    }
}

/// 文字欄位：不會作廢記錄。字串原樣保留，數字與布林轉字串，
/// 富文本片段串接其 `text`，超連結等物件取 `text`，其餘以 JSON 呈現
fn text_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(segments)) if segments.iter().all(|seg| seg["text"].is_string()) => segments
            .iter()
            .filter_map(|seg| seg["text"].as_str())
            .collect(),
        Some(Value::Object(cell)) if cell.get("text").is_some_and(Value::is_string) => {
            cell["text"].as_str().unwrap_or_default().to_string()
        }
        Some(other) => other.to_string(),
    }
}

fn wrong_type(field: &str, expected: &'static str, found: &Value) -> SkipReason {
    SkipReason::WrongType {
        field: field.to_string(),
        expected,
        found: json_kind(found),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 一頁記錄的一次性 Summary 序列。
///
/// 只產出成功正規化的記錄；被作廢的記錄記 WARN 並計入 [`Summaries::skipped`]。
/// 序列持有記錄本身，走完即結束，無法重來。
#[derive(Debug)]
pub struct Summaries {
    records: std::vec::IntoIter<RawRecord>,
    mapping: FieldMapping,
    zone: DateZone,
    skipped: usize,
}

impl Summaries {
    pub fn new(records: Vec<RawRecord>, mapping: FieldMapping) -> Self {
        let zone = mapping.zone();
        Self {
            records: records.into_iter(),
            mapping,
            zone,
            skipped: 0,
        }
    }

    pub fn with_zone(mut self, zone: DateZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Summaries {
    type Item = Summary;

    fn next(&mut self) -> Option<Summary> {
        for record in self.records.by_ref() {
            match normalize_with(&record, &self.mapping, self.zone) {
                Ok(summary) => return Some(summary),
                Err(reason) => {
                    self.skipped += 1;
                    tracing::warn!(
                        "⚠️ Skipping record {}: {}",
                        record.record_id().unwrap_or("<unknown>"),
                        reason
                    );
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.records.size_hint().1)
    }
}

/// 以預設欄位名稱產生序列
pub fn summarize(records: Vec<RawRecord>) -> Summaries {
    Summaries::new(records, FieldMapping::default())
}
