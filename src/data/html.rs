//! HTML flattening built on `scraper`.

use scraper::{ElementRef, Html, Node};

/// Elements whose text never renders.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new paragraph when block breaks are enabled.
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
    "footer",
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
    "title",
    "tr",
    "ul",
];

/// How text nodes are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextLayout {
    /// Text nodes back to back, nothing inserted.
    #[default]
    Concatenate,
    /// A blank line at each block element boundary, so segmenters see
    /// paragraph breaks.
    Blocks,
}

impl TextLayout {
    pub fn from_block_breaks(enabled: bool) -> Self {
        if enabled {
            Self::Blocks
        } else {
            Self::Concatenate
        }
    }
}

/// Concatenate the visible text nodes of `html` in document order.
///
/// Parsing is best effort: malformed markup is repaired the way browsers
/// repair it, so this never fails.
pub fn html_to_text(html: &str, layout: TextLayout) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len() / 2);
    collect_text(document.root_element(), layout, &mut out);
    out
}

enum Step<'a> {
    Enter(ElementRef<'a>),
    Leave { block: bool },
    Text(&'a str),
}

/// Walks the tree with an explicit stack so nesting depth is bounded only by
/// the heap.
fn collect_text(root: ElementRef<'_>, layout: TextLayout, out: &mut String) {
    let mut stack = vec![Step::Enter(root)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => out.push_str(text),
            Step::Leave { block } => {
                if block {
                    break_line(out);
                }
            }
            Step::Enter(element) => {
                let name = element.value().name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                let block = layout == TextLayout::Blocks && BLOCK_ELEMENTS.contains(&name);
                if block {
                    break_line(out);
                }
                stack.push(Step::Leave { block });
                for child in element.children().rev() {
                    match child.value() {
                        Node::Text(text) => stack.push(Step::Text(&**text)),
                        Node::Element(_) => {
                            if let Some(child) = ElementRef::wrap(child) {
                                stack.push(Step::Enter(child));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

fn break_line(out: &mut String) {
    if out.is_empty() || out.ends_with("\n\n") {
        return;
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_without_separators() {
        let html = "<html><body><p>One.</p><p>Two.</p></body></html>";
        assert_eq!(html_to_text(html, TextLayout::Concatenate), "One.Two.");
    }

    #[test]
    fn block_layout_separates_paragraphs() {
        let html = "<html><body><p>One.</p><p>Two <b>bold</b>.</p></body></html>";
        assert_eq!(html_to_text(html, TextLayout::Blocks), "One.\n\nTwo bold.\n\n");
    }

    #[test]
    fn hidden_elements_are_skipped() {
        let html = "<html><head><style>p{}</style><script>var x = 1;</script></head>\
                    <body>Visible<noscript>hidden</noscript></body></html>";
        assert_eq!(html_to_text(html, TextLayout::Concatenate), "Visible");
    }

    #[test]
    fn nested_blocks_break_once() {
        let html = "<div><div><p>Inner.</p></div>Tail.</div>";
        assert_eq!(html_to_text(html, TextLayout::Blocks), "Inner.\n\nTail.\n\n");
    }

    #[test]
    fn entities_are_decoded() {
        let html = "<p>Smith &amp; Sons &lt;Ltd&gt;</p>";
        assert_eq!(
            html_to_text(html, TextLayout::Concatenate),
            "Smith & Sons <Ltd>"
        );
    }
}
