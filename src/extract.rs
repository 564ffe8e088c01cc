use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const KEY_PATH: &str = "key";
pub const SELF_PATH: &str = "self";
pub const STATUS_NAME_PATH: &str = "fields.status.name";
pub const ISSUE_TYPE_ICON_PATH: &str = "fields.issuetype.iconUrl";
pub const SUMMARY_PATH: &str = "fields.summary";

/// 検索結果の1件
///
/// 形は検証しない。既知のパスだけを読み、無ければ `None` を返す。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueRecord(Value);

impl IssueRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// ドット区切りのパスで値を取り出す
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.0, path)
    }

    pub fn lookup_str(&self, path: &str) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }

    pub fn key(&self) -> Option<&str> {
        self.lookup_str(KEY_PATH)
    }

    pub fn self_url(&self) -> Option<&str> {
        self.lookup_str(SELF_PATH)
    }

    pub fn status_name(&self) -> Option<&str> {
        self.lookup_str(STATUS_NAME_PATH)
    }

    pub fn issue_type_icon_url(&self) -> Option<&str> {
        self.lookup_str(ISSUE_TYPE_ICON_PATH)
    }

    pub fn summary(&self) -> Option<&str> {
        self.lookup_str(SUMMARY_PATH)
    }
}

impl From<Value> for IssueRecord {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// パスの各セグメントを辿る。オブジェクトはキー、配列は数値インデックス。
/// 途中で見つからない場合と `null` の場合は `None`。
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let found = path
        .split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })?;

    (!found.is_null()).then_some(found)
}

/// レスポンスボディをデコードする。JSONでなければ `Value::Null`。
pub fn decode_response(body: &[u8]) -> Value {
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, len = body.len(), "response body is not valid JSON");
            Value::Null
        }
    }
}

/// トップレベルの `issues` を取り出す。無い場合は空のVec。
pub fn extract_issues(document: &Value) -> Vec<IssueRecord> {
    match document.get("issues") {
        Some(Value::Array(issues)) => issues.iter().cloned().map(IssueRecord::new).collect(),
        _ => Vec::new(),
    }
}

/// 先頭の1件からフィールドを取り出す
pub fn extract_field<'a>(issues: &'a [IssueRecord], path: &str) -> Option<&'a Value> {
    issues.first().and_then(|issue| issue.lookup(path))
}

pub fn extract_str<'a>(issues: &'a [IssueRecord], path: &str) -> Option<&'a str> {
    extract_field(issues, path).and_then(Value::as_str)
}
