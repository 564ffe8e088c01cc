use std::fmt::Write;

use crate::extract::IssueRecord;

/// このステータスのissueは取り消し線で表示する
pub const RESOLVED_STATUS: &str = "Resolved";

/// 値が取れなかったときに表示する文字列
pub const PLACEHOLDER: &str = "";

/// ホストに返す描画結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub text: String,
    /// ホスト側でマークアップ処理をしない
    pub noparse: bool,
    /// 生のHTMLとして扱う
    pub is_html: bool,
}

impl RenderOutput {
    /// ホストのマークアップ処理に回すテキスト
    pub fn wikitext(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            noparse: false,
            is_html: false,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            noparse: true,
            is_html: true,
        }
    }
}

/// 単一issueのステータス名
pub fn render_status(status: Option<&str>) -> RenderOutput {
    RenderOutput::wikitext(status.unwrap_or(PLACEHOLDER))
}

/// issue一覧をテーブルとして描画する
///
/// 列はタイプアイコン、キー（selfへのリンク）、概要の順。
/// ステータスが `Resolved` のキーは `<del>` で囲む。
pub fn render_issue_table(issues: &[IssueRecord]) -> RenderOutput {
    let mut html = String::from("<table class=\"jira-issues\">\n");
    for issue in issues {
        render_row(&mut html, issue);
    }
    html.push_str("</table>");

    RenderOutput::html(html)
}

fn render_row(out: &mut String, issue: &IssueRecord) {
    let icon = issue
        .issue_type_icon_url()
        .map(|url| format!("<img src=\"{}\" />", escape_html(url)))
        .unwrap_or_default();

    let key = escape_html(issue.key().unwrap_or(PLACEHOLDER));
    let mut link = match issue.self_url() {
        Some(url) => format!("<a href=\"{}\">{}</a>", escape_html(url), key),
        None => key,
    };
    if issue.status_name() == Some(RESOLVED_STATUS) {
        link = format!("<del>{}</del>", link);
    }

    let summary = escape_html(issue.summary().unwrap_or(PLACEHOLDER));

    // String への書き込みは失敗しない
    let _ = writeln!(
        out,
        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
        icon, link, summary
    );
}

/// テキストと属性値用のHTMLエスケープ
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
