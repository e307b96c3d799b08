//! Helpers for embedding the page object in an HTML attribute and reading it back.

/// Attribute that carries the serialized page object on first load
pub const DATA_PAGE_ATTR: &str = "data-page";

/// Escape a string for use inside a quoted HTML attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_attr`]; also accepts the common numeric and named variants
pub fn unescape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let Some(end) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "lt" => Some('<'),
            "gt" => Some('>'),
            _ => decode_numeric(entity),
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_numeric(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

/// Find the `data-page` attribute in an HTML document and return its decoded value
pub fn extract_data_page(html: &str) -> Option<String> {
    let mut search = html;

    loop {
        let start = search.find(DATA_PAGE_ATTR)?;
        let after = search[start + DATA_PAGE_ATTR.len()..].trim_start();

        let Some(after_eq) = after.strip_prefix('=') else {
            search = &search[start + DATA_PAGE_ATTR.len()..];
            continue;
        };
        let after_eq = after_eq.trim_start();

        let quote = after_eq.chars().next()?;
        if quote != '\'' && quote != '"' {
            return None;
        }

        let body = &after_eq[1..];
        let end = body.find(quote)?;
        return Some(unescape_attr(&body[..end]));
    }
}
