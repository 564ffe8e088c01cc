/// 検索APIのパス
pub const SEARCH_PATH: &str = "/rest/api/2/search";

/// JQLの条件結合子
const JQL_CONJUNCTION: &str = " AND ";

/// フィールド名と値の順序付きマップ
///
/// 同じフィールド名は一度しか現れない。既存のフィールドに `insert` すると
/// 位置はそのままで値だけ置き換わる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    entries: Vec<(String, String)>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    /// ビルダー形式の `insert`
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FilterCriteria
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Self::new();
        for (field, value) in iter {
            criteria.insert(field, value);
        }
        criteria
    }
}

/// 並び替えに使うフィールド（空なら並び替えなし）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec(Option<String>);

impl SortSpec {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn by(field: impl Into<String>) -> Self {
        let field = field.into();
        if field.is_empty() {
            Self(None)
        } else {
            Self(Some(field))
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// 検索結果に含めるフィールドの一覧（順序を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProjection(Vec<String>);

impl FieldProjection {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// カンマ区切りのフィールド名（空なら空文字列）
    pub fn joined(&self) -> String {
        self.0.join(",")
    }

    /// `fields=a,b` 形式のクエリ句（空なら空文字列）
    pub fn clause(&self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            format!("fields={}", self.joined())
        }
    }
}

/// フィルター条件と並び順からJQLを組み立てる
///
/// 条件が一つも無い場合は並び順も含めて空文字列を返す。
// NOTE: 条件なしで order by を落とす挙動は既存ページとの互換のため残している。見直し候補。
pub fn build_jql(filters: &FilterCriteria, sort: &SortSpec) -> String {
    let mut jql = filters
        .iter()
        .map(|(field, value)| format!("{}={}", field, value))
        .collect::<Vec<_>>()
        .join(JQL_CONJUNCTION);

    if let Some(field) = sort.field() {
        if !jql.is_empty() {
            jql.push_str(" order by ");
            jql.push_str(field);
        }
    }

    jql
}

/// 検索リクエスト（パスとエンコード済みクエリ文字列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    path: String,
    query: String,
}

impl QueryRequest {
    /// JQL文字列とフィールド一覧から組み立てる
    pub fn from_jql(jql: &str, fields: &FieldProjection) -> Self {
        let mut parts = Vec::with_capacity(2);
        if !jql.is_empty() {
            parts.push(format!("jql={}", urlencoding::encode(jql)));
        }
        if !fields.is_empty() {
            parts.push(fields.clause());
        }

        let request = Self {
            path: SEARCH_PATH.to_string(),
            query: parts.join("&"),
        };
        tracing::debug!(jql, query = %request.query, "built search request");
        request
    }

    /// フィルター条件から組み立てる
    pub fn from_filters(filters: &FilterCriteria, sort: &SortSpec, fields: &FieldProjection) -> Self {
        Self::from_jql(&build_jql(filters, sort), fields)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// `path?query`（クエリが空なら `path` のみ）
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// エンドポイントURLに連結した完全なURL
    pub fn url(&self, endpoint_url: &str) -> String {
        format!("{}{}", endpoint_url.trim_end_matches('/'), self.path_and_query())
    }
}
