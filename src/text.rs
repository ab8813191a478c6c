use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Upper bound on extracted text per page, so the rendered prompt stays
/// within what the downstream model accepts.
pub const MAX_TEXT_CHARS: usize = 16_000;

/// Elements whose subtrees carry no prose.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Turns raw page markup into bounded plain text: `script`/`style` subtrees
/// are dropped, block boundaries become newlines, each line is trimmed, and
/// the result is cut at [`MAX_TEXT_CHARS`]. Markup-free input yields an
/// empty string.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    for child in document.tree.root().children() {
        collect_text(child, &mut raw);
    }

    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line);
        }
    }

    truncate_chars(&lines.join("\n"), MAX_TEXT_CHARS)
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&text),
        Node::Element(element) => {
            let name = element.name();
            if SKIPPED_ELEMENTS.contains(&name) {
                return;
            }

            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push('\n');
            }
            for child in node.children() {
                collect_text(child, out);
            }
            if block {
                out.push('\n');
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style_subtrees() {
        let html = r#"<html><head>
            <style>body { color: red; }</style>
            <script>console.log("hidden");</script>
        </head><body>
            <p>Visible paragraph.</p>
            <script>var alsoHidden = 1;</script>
        </body></html>"#;

        let text = extract_text(html);
        assert_eq!(text, "Visible paragraph.");
    }

    #[test]
    fn block_boundaries_become_newlines() {
        let html = "<body><h1>Title</h1><p>First.</p><div>Second.</div></body>";
        assert_eq!(extract_text(html), "Title\nFirst.\nSecond.");
    }

    #[test]
    fn inline_elements_do_not_break_lines() {
        let html = "<p>Hello <strong>bold</strong> world</p>";
        assert_eq!(extract_text(html), "Hello bold world");
    }

    #[test]
    fn lines_are_trimmed() {
        let html = "<p>   padded   </p><p>\t tabbed \t</p>";
        assert_eq!(extract_text(html), "padded\ntabbed");
    }

    #[test]
    fn empty_and_markup_free_input_yield_empty_string() {
        assert_eq!(extract_text(""), "");
        assert_eq!(extract_text("<html><head></head><body></body></html>"), "");
    }

    #[test]
    fn output_is_truncated_to_max_chars() {
        let body = "x".repeat(20_000);
        let html = format!("<p>{body}</p>");
        let text = extract_text(&html);
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "あ".repeat(MAX_TEXT_CHARS + 100);
        let html = format!("<p>{body}</p>");
        let text = extract_text(&html);
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = "<body><p>One</p><ul><li>Two</li><li>Three</li></ul></body>";
        assert_eq!(extract_text(html), extract_text(html));
    }
}
