/// エラーシナリオテスト
///
/// どの失敗でもページの描画は止まらず、空の値か空のテーブルになることを確認します：
/// 1. ネットワークエラー
/// 2. 認証エラー・サーバーエラー
/// 3. JSONではないレスポンス
/// 4. 結果なし・フィールド欠落
use jira_connector::{
    ConnectorConfig, Error, FieldProjection, JiraClient, JiraConnector, QueryRequest,
    render_issue_table, render_status,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 一度bindしてすぐ閉じたポートのURL（接続は拒否される）
fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

fn no_args() -> Vec<(String, String)> {
    Vec::new()
}

async fn connector_responding(response: ResponseTemplate) -> (MockServer, JiraConnector) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(response)
        .mount(&mock_server)
        .await;

    let config = ConnectorConfig::new(mock_server.uri(), None).unwrap();
    let connector = JiraConnector::new(JiraClient::new(config).unwrap());
    (mock_server, connector)
}

#[tokio::test]
async fn test_network_error() {
    // Given: 誰も待ち受けていないポート
    let config = ConnectorConfig::new(closed_endpoint(), None).unwrap();
    let connector = JiraConnector::new(JiraClient::new(config).unwrap());

    // When: 両方の入口を呼ぶ
    let status = connector.read_issue(&["jiraissuekey=DEMO-7"]).await;
    let table = connector.render_issues("project = DEMO", &no_args()).await;

    // Then: プレースホルダーと空のテーブル
    assert_eq!(status, render_status(None));
    assert_eq!(table, render_issue_table(&[]));

    // 厳密なAPIでは通信エラーとして区別できる
    let request = QueryRequest::from_jql("project = DEMO", &FieldProjection::default());
    assert!(matches!(
        connector.client().try_search(&request).await,
        Err(Error::RequestFailed(_))
    ));
}

#[tokio::test]
async fn test_authentication_error() {
    let (_server, connector) =
        connector_responding(ResponseTemplate::new(401).set_body_string("Unauthorized")).await;

    let status = connector.read_issue(&["jiraissuekey=DEMO-7"]).await;
    assert_eq!(status, render_status(None));

    let request = QueryRequest::from_jql("key = DEMO-7", &FieldProjection::default());
    match connector.client().try_search(&request).await {
        Err(Error::ApiError { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error() {
    let (_server, connector) = connector_responding(ResponseTemplate::new(503)).await;

    let table = connector.render_issues("project = DEMO", &no_args()).await;

    assert_eq!(table, render_issue_table(&[]));
}

#[tokio::test]
async fn test_non_json_response() {
    let (_server, connector) = connector_responding(
        ResponseTemplate::new(200).set_body_string("<html><body>Maintenance</body></html>"),
    )
    .await;

    let status = connector.read_issue(&["jiraissuekey=DEMO-7"]).await;
    assert_eq!(status, render_status(None));

    // デコード失敗は空の結果として扱われる
    let request = QueryRequest::from_jql("key = DEMO-7", &FieldProjection::default());
    assert!(connector.client().try_search(&request).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_response_without_issues_key() {
    let (_server, connector) = connector_responding(
        ResponseTemplate::new(200).set_body_json(json!({"errorMessages": ["Field 'foo' does not exist"]})),
    )
    .await;

    let table = connector.render_issues("foo = bar", &no_args()).await;

    assert_eq!(table, render_issue_table(&[]));
}

#[tokio::test]
async fn test_issue_without_status_field() {
    let (_server, connector) = connector_responding(
        ResponseTemplate::new(200).set_body_json(json!({"issues": [{"key": "DEMO-7", "fields": {}}]})),
    )
    .await;

    let status = connector.read_issue(&["jiraissuekey=DEMO-7"]).await;

    assert_eq!(status, render_status(None));
}
