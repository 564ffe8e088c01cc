use crate::query::FilterCriteria;

/// `["name=value", ...]` 形式の引数を `FilterCriteria` に変換する
///
/// `=` がちょうど1つのトークンだけを採用し、名前と値はトリムする。
/// それ以外のトークンは黙って捨てる。同じ名前は後勝ち。
pub fn convert_function_parameters<I, S>(tokens: I) -> FilterCriteria
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut results = FilterCriteria::new();
    for token in tokens {
        let token = token.as_ref();
        let mut pair = token.split('=');
        match (pair.next(), pair.next(), pair.next()) {
            (Some(name), Some(value), None) => results.insert(name.trim(), value.trim()),
            _ => tracing::debug!(token, "discarding parser argument without name=value"),
        }
    }
    results
}

/// タグ属性の `(name, value)` を順序付きで `FilterCriteria` に変換する
pub fn parse_tag_arguments<I, K, V>(args: I) -> FilterCriteria
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    args.into_iter()
        .map(|(name, value)| (name.as_ref().trim().to_string(), value.as_ref().trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}
