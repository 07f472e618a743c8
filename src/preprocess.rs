use scraper::{ElementRef, Html, Node, Selector};

/// Non-content elements whose text never reaches downstream parsers.
const STRIP_TAGS: [&str; 6] = ["script", "style", "header", "footer", "nav", "aside"];

/// Containers likely to hold the recipe, tried in order before falling back
/// to the whole body.
const CONTENT_SELECTORS: [&str; 6] = [
    "main",
    "article",
    ".recipe",
    "#recipe",
    ".recipe-content",
    ".wprm-recipe",
];

/// Reduce a fetched page to compact annotated text for downstream pattern
/// matchers: headings become `#`/`##`/`###` lines, list items become `-`
/// lines, everything else is plain text. Malformed markup is tolerated;
/// the HTML parser recovers on a best-effort basis and never fails.
pub fn preprocess_html(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = find_main_content(&document);
    let blocks = Selector::parse("h1, h2, h3, p, li, div").unwrap();

    let mut lines = Vec::new();
    for element in root.select(&blocks) {
        if has_stripped_ancestor(&element) {
            continue;
        }
        let text = element_text(&element);
        if text.is_empty() {
            continue;
        }
        let line = match element.value().name() {
            "h1" => format!("# {text}"),
            "h2" => format!("## {text}"),
            "h3" => format!("### {text}"),
            "li" => format!("- {text}"),
            _ => text,
        };
        lines.push(line);
    }

    lines.join("\n")
}

fn find_main_content(document: &Html) -> ElementRef<'_> {
    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                return element;
            }
        }
    }

    let body = Selector::parse("body").unwrap();
    document
        .select(&body)
        .next()
        .unwrap_or_else(|| document.root_element())
}

fn has_stripped_ancestor(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .map(|e| STRIP_TAGS.contains(&e.name()))
            .unwrap_or(false)
    })
}

/// Descendant text with stripped subtrees (e.g. an inline `<script>`)
/// left out.
fn element_text(element: &ElementRef) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts.join(" ")
}

fn collect_text(element: &ElementRef, parts: &mut Vec<String>) {
    if STRIP_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !collapsed.is_empty() {
                    parts.push(collapsed);
                }
            }
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, parts);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style_content() {
        let html = r#"
            <html><body>
                <p>Visible content</p>
                <script>console.log('skip');</script>
                <style>body { color: red; }</style>
            </body></html>
        "#;
        let text = preprocess_html(html);
        assert!(text.contains("Visible content"));
        assert!(!text.contains("console.log"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn strips_script_nested_in_content() {
        let html = r#"
            <html><body>
                <div>Before <script>var tracking = 1;</script> after</div>
            </body></html>
        "#;
        let text = preprocess_html(html);
        assert!(text.contains("Before after"));
        assert!(!text.contains("tracking"));
    }

    #[test]
    fn strips_chrome_elements() {
        let html = r#"
            <html><body>
                <nav><li>Home</li></nav>
                <header><p>Site header</p></header>
                <p>The actual recipe text</p>
                <footer><p>Copyright</p></footer>
                <aside><p>Ads</p></aside>
            </body></html>
        "#;
        let text = preprocess_html(html);
        assert!(text.contains("The actual recipe text"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Site header"));
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("Ads"));
    }

    #[test]
    fn annotates_headings_and_list_items() {
        let html = r#"
            <html><body><main>
                <h1>Pancakes</h1>
                <h2>Ingredients</h2>
                <li>1 cup flour</li>
                <h3>Notes</h3>
            </main></body></html>
        "#;
        let text = preprocess_html(html);
        assert!(text.contains("# Pancakes"));
        assert!(text.contains("## Ingredients"));
        assert!(text.contains("- 1 cup flour"));
        assert!(text.contains("### Notes"));
    }

    #[test]
    fn prefers_main_content_container() {
        let html = r#"
            <html><body>
                <div><p>Sidebar cruft</p></div>
                <article><p>Recipe body</p></article>
            </body></html>
        "#;
        let text = preprocess_html(html);
        assert!(text.contains("Recipe body"));
        assert!(!text.contains("Sidebar cruft"));
    }

    #[test]
    fn tolerates_malformed_markup() {
        let html = "<p>Unclosed paragraph <li>item <h1>heading";
        let text = preprocess_html(html);
        assert!(text.contains("Unclosed paragraph"));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(preprocess_html(""), "");
    }
}
