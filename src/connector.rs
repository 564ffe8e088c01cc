use async_trait::async_trait;
use std::sync::Arc;

use crate::client::JiraClient;
use crate::extract::STATUS_NAME_PATH;
use crate::params::{convert_function_parameters, parse_tag_arguments};
use crate::query::{FieldProjection, FilterCriteria, QueryRequest, SortSpec};
use crate::render::{RenderOutput, render_issue_table, render_status};

/// パーサー関数の名前（`{{#readjiraissue: jiraissuekey=DEMO-7}}`）
pub const READ_ISSUE_FUNCTION: &str = "readjiraissue";
/// タグの名前（`<jiraissues>project = DEMO</jiraissues>`）
pub const ISSUES_TAG: &str = "jiraissues";

/// パーサー関数で課題キーを指定する引数名
pub const ISSUE_KEY_PARAMETER: &str = "jiraissuekey";
/// タグで返すフィールドを指定する属性名
pub const FIELDS_ARGUMENT: &str = "fields";
/// タグで並び順を指定する属性名
pub const ORDER_BY_ARGUMENT: &str = "orderby";

const ISSUE_KEY_FIELD: &str = "key";
const STATUS_FIELD: &str = "status";
const DEFAULT_TABLE_FIELDS: [&str; 4] = ["key", "status", "issuetype", "summary"];

/// パーサー関数のコールバック
#[async_trait]
pub trait FunctionHook: Send + Sync {
    async fn call(&self, args: &[String]) -> RenderOutput;
}

/// タグのコールバック
#[async_trait]
pub trait TagHook: Send + Sync {
    async fn call(&self, input: &str, args: &[(String, String)]) -> RenderOutput;
}

/// フックを登録する側（ホストのWikiエンジン）
pub trait ParserHost {
    fn set_function_hook(&mut self, name: &str, hook: Arc<dyn FunctionHook>);
    fn set_tag_hook(&mut self, name: &str, hook: Arc<dyn TagHook>);
}

/// ホストとJIRAをつなぐアダプター
#[derive(Debug, Clone)]
pub struct JiraConnector {
    client: JiraClient,
}

impl JiraConnector {
    pub fn new(client: JiraClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &JiraClient {
        &self.client
    }

    /// `readjiraissue` と `jiraissues` をホストに登録する
    pub fn register(self: Arc<Self>, host: &mut dyn ParserHost) {
        host.set_function_hook(READ_ISSUE_FUNCTION, Arc::new(ReadIssueFunction(self.clone())));
        host.set_tag_hook(ISSUES_TAG, Arc::new(IssueTableTag(self)));
        tracing::info!(
            function = READ_ISSUE_FUNCTION,
            tag = ISSUES_TAG,
            "registered JIRA parser hooks"
        );
    }

    /// 課題キーで1件検索し、ステータス名を返す
    pub async fn read_issue<S: AsRef<str>>(&self, tokens: &[S]) -> RenderOutput {
        let params = convert_function_parameters(tokens);
        let Some(issue_key) = params.get(ISSUE_KEY_PARAMETER).filter(|key| !key.is_empty()) else {
            tracing::debug!("readjiraissue called without {}", ISSUE_KEY_PARAMETER);
            return render_status(None);
        };

        let issues = self
            .client
            .get_issues(
                &FilterCriteria::new().with(ISSUE_KEY_FIELD, issue_key),
                &SortSpec::by(ISSUE_KEY_FIELD),
                &FieldProjection::new([ISSUE_KEY_FIELD, STATUS_FIELD]),
            )
            .await;

        render_status(issues.first().and_then(|issue| issue.lookup_str(STATUS_NAME_PATH)))
    }

    /// JQL（またはタグ属性のフィルター）で検索し、テーブルを返す
    pub async fn render_issues<K, V>(&self, input: &str, args: &[(K, V)]) -> RenderOutput
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let request = build_tag_request(input, args);
        let issues = self.client.search(&request).await;
        render_issue_table(&issues)
    }
}

/// タグ呼び出しから検索リクエストを組み立てる
///
/// 本文があればそれをJQLとして使う。本文が空なら `fields` と `orderby` 以外の
/// 属性をフィルター条件として扱う。
pub fn build_tag_request<K, V>(input: &str, args: &[(K, V)]) -> QueryRequest
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut criteria = parse_tag_arguments(args.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));

    let fields = match criteria.remove(FIELDS_ARGUMENT) {
        Some(list) => FieldProjection::new(
            list.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty()),
        ),
        None => FieldProjection::new(DEFAULT_TABLE_FIELDS),
    };
    let sort = criteria
        .remove(ORDER_BY_ARGUMENT)
        .map(SortSpec::by)
        .unwrap_or_default();

    let jql = input.trim();
    if jql.is_empty() {
        QueryRequest::from_filters(&criteria, &sort, &fields)
    } else {
        QueryRequest::from_jql(jql, &fields)
    }
}

struct ReadIssueFunction(Arc<JiraConnector>);

#[async_trait]
impl FunctionHook for ReadIssueFunction {
    async fn call(&self, args: &[String]) -> RenderOutput {
        self.0.read_issue(args).await
    }
}

struct IssueTableTag(Arc<JiraConnector>);

#[async_trait]
impl TagHook for IssueTableTag {
    async fn call(&self, input: &str, args: &[(String, String)]) -> RenderOutput {
        self.0.render_issues(input, args).await
    }
}
