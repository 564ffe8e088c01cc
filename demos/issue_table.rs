/// JQLで検索してテーブルを描画する例（タグ `<jiraissues>` 相当）
///
/// 実行方法：
/// cargo run --example issue_table -- "project = DEMO AND resolution is EMPTY"
use dotenv::dotenv;
use jira_connector::{ConnectorConfig, JiraClient, JiraConnector};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ConnectorConfig::from_env()?;
    let connector = JiraConnector::new(JiraClient::new(config)?);

    let jql = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "order by created DESC".to_string());
    let args = [("fields", "key,status,issuetype,summary")];

    let output = connector.render_issues(&jql, &args).await;
    println!("{}", output.text);

    Ok(())
}
