use reqwest::{Client, header};
use serde_json::Value;
use std::sync::Arc;

use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::extract::{IssueRecord, decode_response, extract_issues};
use crate::query::{FieldProjection, FilterCriteria, QueryRequest, SortSpec};

#[derive(Debug, Clone)]
pub struct JiraClient {
    pub(crate) client: Client,
    pub(crate) config: Arc<ConnectorConfig>,
}

impl JiraClient {
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        // 認証情報がある場合のみ認証ヘッダーを追加
        if let Some(credentials) = &config.credentials {
            let mut value = header::HeaderValue::from_str(&credentials.basic_auth_header())
                .map_err(|_| Error::InvalidConfiguration("Invalid auth header".to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// 検索リクエストを送信し、レスポンスをJSONとして返す
    ///
    /// JSONとして読めないボディは `Value::Null` になる。
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, request: &QueryRequest) -> Result<Value> {
        let url = request.url(&self.config.endpoint_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::ApiError { status, message });
        }

        let body = response.bytes().await?;
        Ok(decode_response(&body))
    }

    /// 検索してissue一覧を返す（通信エラーはそのまま返す）
    pub async fn try_search(&self, request: &QueryRequest) -> Result<Vec<IssueRecord>> {
        let document = self.fetch(request).await?;
        let issues = extract_issues(&document);
        tracing::debug!(count = issues.len(), "search returned issues");
        Ok(issues)
    }

    /// 検索してissue一覧を返す。失敗は空の一覧として扱う。
    pub async fn search(&self, request: &QueryRequest) -> Vec<IssueRecord> {
        match self.try_search(request).await {
            Ok(issues) => issues,
            Err(e) => {
                tracing::warn!(error = %e, "JIRA search failed, rendering empty result");
                Vec::new()
            }
        }
    }

    /// フィルター条件でissueを検索
    pub async fn get_issues(
        &self,
        filters: &FilterCriteria,
        sort: &SortSpec,
        fields: &FieldProjection,
    ) -> Vec<IssueRecord> {
        let request = QueryRequest::from_filters(filters, sort, fields);
        self.search(&request).await
    }
}
