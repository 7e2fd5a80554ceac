//! 呼び出し側が渡す任意のコンテキスト

use serde_json::Value;
use std::collections::BTreeMap;

/// 1 回の `process` に付随するキー・値（例: `user_name`）
pub type Context = BTreeMap<String, Value>;

/// 文字列値を取り出す（空文字は無いものとして扱う）
pub fn context_str<'a>(ctx: &'a Context, key: &str) -> Option<&'a str> {
    ctx.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `key=value` 形式の文字列を Context に変換する（CLI の --context 用）
pub fn parse_context_pairs(pairs: &[String]) -> Result<Context, String> {
    let mut ctx = Context::new();
    for pair in pairs {
        let (k, v) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid context entry '{}': expected key=value", pair))?;
        let k = k.trim();
        if k.is_empty() {
            return Err(format!("invalid context entry '{}': empty key", pair));
        }
        ctx.insert(k.to_string(), Value::String(v.trim().to_string()));
    }
    Ok(ctx)
}
