/// 課題のステータスを取得する例（パーサー関数 `readjiraissue` 相当）
///
/// 実行前に環境変数を設定してください：
/// export JIRA_URL=https://jira.example.com
/// export JIRA_USER=wiki-bot        # 省略すると認証なし
/// export JIRA_PASSWORD=secret
///
/// 実行方法：
/// cargo run --example read_issue -- jiraissuekey=DEMO-7
use dotenv::dotenv;
use jira_connector::{ConnectorConfig, JiraClient, JiraConnector};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 環境変数が無ければ設定ファイルを使う
    let config = match ConnectorConfig::from_env() {
        Ok(config) => config,
        Err(_) => ConnectorConfig::load(ConnectorConfig::default_path()?)
            .await?
            .ok_or("JIRA_URL も設定ファイルも見つかりません")?,
    };
    println!("🔗 JIRA: {}", config.endpoint_url);

    let connector = JiraConnector::new(JiraClient::new(config)?);

    let tokens: Vec<String> = std::env::args().skip(1).collect();
    let output = connector.read_issue(&tokens).await;

    if output.text.is_empty() {
        println!("❓ ステータス不明");
    } else {
        println!("✅ {}", output.text);
    }

    Ok(())
}
