use regex::Regex;
use std::sync::LazyLock;

struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

fn rewrite(pattern: &str, replacement: &'static str) -> Rewrite {
    Rewrite {
        pattern: Regex::new(pattern).expect("static pattern"),
        replacement,
    }
}

// 順序很重要：先把結構標籤換成換行，最後才移除剩下的標籤
static REWRITES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    vec![
        rewrite(r"(?i)<li(\s[^>]*)?>", "\n  • "),
        rewrite(r"(?i)</li\s*>", ""),
        rewrite(r"(?i)<br\s*/?>", "\n"),
        rewrite(r"(?i)</p\s*>", "\n\n"),
        rewrite(r"(?i)</div\s*>", "\n"),
        rewrite(r"(?i)</(ul|ol)\s*>", "\n"),
        rewrite(r"(?i)</h[1-6]\s*>", "\n\n"),
        rewrite(r"<[^>]+>", ""),
    ]
});

const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Turns a description container's inner HTML into plain text, keeping list
/// items as `  • ` bullets and paragraph breaks as single blank lines.
pub fn format_description(html: &str) -> String {
    let mut text = html.to_string();
    for step in REWRITES.iter() {
        text = step
            .pattern
            .replace_all(&text, step.replacement)
            .into_owned();
    }

    for (entity, plain) in ENTITIES {
        text = text.replace(entity, plain);
    }

    collapse_blank_lines(&text)
}

fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in text.split('\n') {
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line);
            previous_blank = false;
        } else if !previous_blank {
            lines.push("");
            previous_blank = true;
        }
    }

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_and_paragraphs() {
        let html = "<p><strong>About the role</strong></p><ul><li>Design RTL</li><li class=\"x\">Verify &amp; test</li></ul><p>Apply now</p>";
        let text = format_description(html);
        assert_eq!(
            text,
            "About the role\n\n• Design RTL\n• Verify & test\nApply now"
        );
    }

    #[test]
    fn test_line_breaks_and_entities() {
        let html = "Line one<br>Line&nbsp;two<br/>&lt;tag&gt; &quot;quoted&quot; it&#39;s";
        assert_eq!(
            format_description(html),
            "Line one\nLine two\n<tag> \"quoted\" it's"
        );
    }

    #[test]
    fn test_blank_lines_collapse() {
        let html = "<div>One</div><div></div><div></div><h2>Two</h2>\n\n\n<p>Three</p>";
        assert_eq!(format_description(html), "One\n\nTwo\n\nThree");
    }

    #[test]
    fn test_list_end_breaks_the_line() {
        assert_eq!(
            format_description("<ul><li>Spice</li></ul>Apply today"),
            "• Spice\nApply today"
        );
    }

    #[test]
    fn test_link_tag_is_not_a_bullet() {
        assert_eq!(format_description("<link rel=\"x\">Text"), "Text");
    }

    #[test]
    fn test_escaped_ampersand_decodes_once() {
        assert_eq!(format_description("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_empty_html() {
        assert_eq!(format_description(""), "");
        assert_eq!(format_description("<div>   </div>"), "");
    }
}
