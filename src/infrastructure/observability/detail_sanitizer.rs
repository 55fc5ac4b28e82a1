const MAX_DETAIL_CHARS: usize = 300;

/// Shortens upstream error text and strips credentials before it reaches a log
/// line or an error response.
pub fn sanitize_detail(detail: &str) -> String {
    let collapsed = detail.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = collapsed.chars().count();
    let shortened = if total > MAX_DETAIL_CHARS {
        let head: String = collapsed.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{}... ({} chars total)", head, total)
    } else {
        collapsed
    };

    redact_credentials(&shortened)
}

fn redact_credentials(text: &str) -> String {
    let patterns = [
        ("Bearer ", "Bearer [REDACTED]"),
        ("hf_token=", "hf_token=[REDACTED]"),
        ("token=", "token=[REDACTED]"),
        ("api_key=", "api_key=[REDACTED]"),
    ];

    let mut result = text.to_string();
    for (pattern, replacement) in patterns {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(pattern) {
            let idx = search_from + found;
            let value_start = idx + pattern.len();
            if result[value_start..].starts_with("[REDACTED]") {
                search_from = value_start;
                continue;
            }
            let end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result = format!("{}{}{}", &result[..idx], replacement, &result[end..]);
            search_from = idx + replacement.len();
        }
    }

    result
}
