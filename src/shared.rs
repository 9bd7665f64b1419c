//! Shared reply-text helpers used by the router's fallback parsing.

/// Extract the first well-formed JSON object embedded in free text.
///
/// Scans for `{`, walks to the matching close brace (string literals and
/// escapes are honored), and validates the slice with serde. Balanced but
/// invalid candidates are skipped and the scan resumes at the next `{`.
pub fn extract_first_json_block(text: &str) -> Option<serde_json::Value> {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(end) = find_balanced_end(bytes, open) {
            if let Ok(value @ serde_json::Value::Object(_)) =
                serde_json::from_str(&text[open..=end])
            {
                return Some(value);
            }
        }
        start = open + 1;
    }
    None
}

fn find_balanced_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, &byte) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}
