use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use url::Url;

use crate::error::{Error, Result};

/// JIRAへの接続に使う認証情報
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Authorization` ヘッダーの値（`Basic base64(user:password)`）を生成
    pub fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }
}

// パスワードはログに出さない
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// コネクタの設定
///
/// プロセス起動時に一度だけ構築し、以降は変更しない。
/// `credentials` が `None` の場合は認証ヘッダーを送らない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectorConfig {
    pub endpoint_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl ConnectorConfig {
    pub fn new(endpoint_url: impl Into<String>, credentials: Option<Credentials>) -> Result<Self> {
        let endpoint_url = endpoint_url.into();

        // Validate URL
        let _ = Url::parse(&endpoint_url)
            .map_err(|_| Error::InvalidConfiguration("Invalid endpoint URL".to_string()))?;

        // 末尾のスラッシュは検索パスと二重にならないよう取り除く
        let endpoint_url = endpoint_url
            .strip_suffix('/')
            .map(str::to_string)
            .unwrap_or(endpoint_url);

        Ok(Self {
            endpoint_url,
            credentials,
        })
    }

    /// 環境変数 `JIRA_URL` / `JIRA_USER` / `JIRA_PASSWORD` から設定を作成
    ///
    /// `JIRA_USER` が無ければ認証なし、`JIRA_PASSWORD` が無ければ空パスワード。
    pub fn from_env() -> Result<Self> {
        use std::env;

        let endpoint_url = env::var("JIRA_URL").map_err(|_| {
            Error::ConfigurationMissing("JIRA_URL not found in environment".to_string())
        })?;

        let credentials = env::var("JIRA_USER").ok().map(|username| {
            let password = env::var("JIRA_PASSWORD").unwrap_or_default();
            Credentials::new(username, password)
        });

        Self::new(endpoint_url, credentials)
    }

    /// デフォルトの設定ファイルパス
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::ConfigurationMissing("設定ディレクトリが見つかりません".to_string()))?;

        Ok(config_dir.join("jira-connector").join("config.json"))
    }

    /// JSONファイルから読み込み（ファイルが無い、または空なら `None`）
    pub async fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let mut file = fs::File::open(path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let config: ConnectorConfig = serde_json::from_str(&contents)?;

        // 読み込んだURLも検証する
        Self::new(config.endpoint_url, config.credentials).map(Some)
    }

    /// JSONファイルに書き込み
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json_data = serde_json::to_string_pretty(self)?;

        let mut file = fs::File::create(path).await?;
        file.write_all(json_data.as_bytes()).await?;
        file.sync_all().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new_with_valid_url() {
        // Given: 有効なURLと認証情報
        let credentials = Credentials::new("wiki-bot", "secret");

        // When: 設定を作成
        let result = ConnectorConfig::new("https://jira.example.com", Some(credentials.clone()));

        // Then: 成功し、正しい値が設定される
        let config = result.unwrap();
        assert_eq!(config.endpoint_url, "https://jira.example.com");
        assert_eq!(config.credentials, Some(credentials));
    }

    #[test]
    fn test_config_new_strips_trailing_slash() {
        let config = ConnectorConfig::new("https://jira.example.com/jira/", None).unwrap();
        assert_eq!(config.endpoint_url, "https://jira.example.com/jira");
    }

    #[test]
    fn test_config_new_with_invalid_url() {
        // Given: 無効なURL
        let base_url = "not a valid url";

        // When: 設定を作成
        let result = ConnectorConfig::new(base_url, None);

        // Then: エラーが返される
        match result.unwrap_err() {
            Error::InvalidConfiguration(msg) => assert_eq!(msg, "Invalid endpoint URL"),
            other => panic!("Expected InvalidConfiguration error, got {:?}", other),
        }
    }

    #[test]
    fn test_basic_auth_header() {
        let credentials = Credentials::new("test@example.com", "test_token");
        assert_eq!(
            credentials.basic_auth_header(),
            "Basic dGVzdEBleGFtcGxlLmNvbTp0ZXN0X3Rva2Vu"
        );
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("wiki-bot", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("wiki-bot"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_config_save_and_load() {
        // Given: 一時ディレクトリと設定
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let config = ConnectorConfig::new(
            "https://jira.example.com",
            Some(Credentials::new("wiki-bot", "secret")),
        )
        .unwrap();

        // When: 保存して読み込む
        config.save(&path).await.unwrap();
        let loaded = ConnectorConfig::load(&path).await.unwrap();

        // Then: 同じ設定が返る
        assert_eq!(loaded, Some(config));
    }

    #[tokio::test]
    async fn test_config_load_missing_or_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        assert_eq!(ConnectorConfig::load(&path).await.unwrap(), None);

        tokio::fs::write(&path, "   \n").await.unwrap();
        assert_eq!(ConnectorConfig::load(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_config_load_without_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"endpoint_url": "https://jira.example.com/"}"#)
            .await
            .unwrap();

        let loaded = ConnectorConfig::load(&path).await.unwrap().unwrap();

        assert_eq!(loaded.endpoint_url, "https://jira.example.com");
        assert!(loaded.credentials.is_none());
    }

    #[tokio::test]
    async fn test_config_load_invalid_json() {
        // Given: JSONとして壊れた設定ファイル
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let result = ConnectorConfig::load(&path).await;

        // Then: serde_jsonのエラーがそのまま返る
        match result {
            Err(Error::JsonParsing(e)) => assert!(e.is_syntax()),
            other => panic!("Expected JsonParsing error, got {:?}", other),
        }
    }
}
