/// The entity replacing `c` in HTML output, if it needs one
fn html_entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        // hex entities, `&apos;` isn't HTML 4
        '\'' => Some("&#x27;"),
        // ends an entity early
        '/' => Some("&#x2F;"),
        _ => None,
    }
}

/// Escapes the characters that can switch an HTML document into another
/// context, following the
/// [OWASP](https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html)
/// rules: `& < > " ' /`.
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len() + input.len() / 4);
    let mut copied = 0;

    for (i, c) in input.char_indices() {
        if let Some(entity) = html_entity(c) {
            output.push_str(&input[copied..i]);
            output.push_str(entity);
            copied = i + c.len_utf8();
        }
    }
    output.push_str(&input[copied..]);

    output
}
