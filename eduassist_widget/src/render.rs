/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Converts newlines to `<br>` line breaks.
pub fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}

/// Markup for an answer. Unless `trust_markup` is set, the text is escaped
/// first so only the inserted line breaks are interpreted.
pub fn answer_markup(text: &str, trust_markup: bool) -> String {
    if trust_markup {
        line_breaks(text)
    } else {
        line_breaks(&escape_html(text))
    }
}
