//! Plain-text rendering of the HTML-encoded rich text the API delivers for
//! course descriptions.

/// Decodes character entities, then strips markup. Matches how the portal
/// renders descriptions: entities first, so encoded tags are stripped too.
pub fn html_to_plain_text(input: &str) -> String {
    collapse_whitespace(&strip_tags(&decode_entities(input)))
}

/// Decodes the named entities the platform emits plus numeric references.
/// Unknown entities are kept literally.
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        // An entity ends at the next ';' and contains no whitespace.
        let Some(end) = tail.find(';').filter(|&end| end <= 32 && !tail[1..end].contains(char::is_whitespace)) else {
            out.push('&');
            rest = &tail[1..];
            continue;
        };

        let entity = &tail[1..end];
        match decode_entity(entity) {
            Some(decoded) => out.push_str(&decoded),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<String> {
    let decoded = match entity {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            return char::from_u32(code).map(String::from);
        }
    };
    Some(decoded.to_string())
}

/// Removes markup, replacing each element with a space so adjacent text
/// nodes do not run together.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_entities() {
        assert_eq!(decode_entities("Tips &amp; Tricks"), "Tips & Tricks");
        assert_eq!(decode_entities("&lt;p&gt;"), "<p>");
        assert_eq!(decode_entities("it&apos;s &quot;fine&quot;"), "it's \"fine\"");
    }

    #[test]
    fn decodes_numeric_entities() {
        assert_eq!(decode_entities("&#8377;999"), "\u{20b9}999");
        assert_eq!(decode_entities("&#x20B9;999"), "\u{20b9}999");
    }

    #[test]
    fn keeps_unknown_entities_and_bare_ampersands() {
        assert_eq!(decode_entities("&unknown; stays"), "&unknown; stays");
        assert_eq!(decode_entities("Q & A"), "Q & A");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn strips_markup() {
        assert_eq!(
            html_to_plain_text("&lt;p&gt;Mains &amp; Prelims&lt;/p&gt;&lt;p&gt;strategy&lt;/p&gt;"),
            "Mains & Prelims strategy"
        );
        assert_eq!(html_to_plain_text("<b>bold</b> move"), "bold move");
    }

    #[test]
    fn plain_text_input_passes_through() {
        assert_eq!(html_to_plain_text("already plain"), "already plain");
    }
}
