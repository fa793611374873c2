//! Entity escaping helpers shared by both conversion directions.

pub(crate) fn escape_text(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(ch),
        }
    }
    output
}

pub(crate) fn escape_attr(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(ch),
        }
    }
    output
}

/// Decode the character references [`escape_text`] and [`escape_attr`] can
/// produce, plus the apostrophe form editors commonly emit. Unknown
/// references pass through verbatim.
pub(crate) fn decode_entities(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(idx) = rest.find('&') {
        output.push_str(&rest[..idx]);
        rest = &rest[idx..];

        // Longest recognized reference is 6 bytes; scan a small window so a
        // stray ampersand never swallows the rest of the chunk.
        let entity_end = rest.bytes().take(8).position(|byte| byte == b';');
        match entity_end {
            Some(end) => {
                let entity = &rest[..=end];
                match entity {
                    "&amp;" => output.push('&'),
                    "&lt;" => output.push('<'),
                    "&gt;" => output.push('>'),
                    "&quot;" => output.push('"'),
                    "&#39;" | "&apos;" => output.push('\''),
                    other => output.push_str(other),
                }
                rest = &rest[end + 1..];
            }
            None => {
                output.push('&');
                rest = &rest[1..];
            }
        }
    }

    output.push_str(rest);
    output
}
