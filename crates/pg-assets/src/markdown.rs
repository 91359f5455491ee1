//! Markdown text assets
//!
//! Uses pulldown-cmark to render CommonMark to HTML. Named placeholders of
//! the form `{name}` can be filled in before rendering; `{{` and `}}` stand
//! for literal braces.

use crate::error::{AssetError, AssetResult};
use pulldown_cmark::{html, Options, Parser as MdParser};
use std::collections::HashMap;
use std::path::Path;

/// Read a Markdown file as text
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn read_markdown(path: &Path) -> AssetResult<String> {
    std::fs::read_to_string(path).map_err(|e| AssetError::io_error(path, e))
}

/// Render Markdown to an HTML fragment
#[must_use]
pub fn render_html(markdown: &str) -> String {
    let parser = MdParser::new_ext(markdown, Options::empty());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Replace `{name}` placeholders using `replacements`
///
/// `{{` and `}}` produce literal braces.
///
/// # Errors
/// [`AssetError::MissingPlaceholder`] if a placeholder has no replacement,
/// [`AssetError::UnbalancedBrace`] for a stray single brace.
pub fn substitute_placeholders(
    text: &str,
    replacements: &HashMap<String, String>,
) -> AssetResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed || name.contains('{') {
                    return Err(AssetError::UnbalancedBrace { position: pos });
                }
                let value = replacements
                    .get(&name)
                    .ok_or_else(|| AssetError::MissingPlaceholder(name.clone()))?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(AssetError::UnbalancedBrace { position: pos });
                }
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn repl(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn renders_headings_and_emphasis() {
        let html = render_html("# Title\n\nSome *text*.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn substitutes_named_placeholders() {
        let out = substitute_placeholders("Hello {who}, {n} left", &repl(&[("who", "Ann"), ("n", "3")]))
            .unwrap();
        assert_eq!(out, "Hello Ann, 3 left");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let out = substitute_placeholders("{{x}} = {x}", &repl(&[("x", "1")])).unwrap();
        assert_eq!(out, "{x} = 1");
    }

    #[test]
    fn missing_placeholder_is_error() {
        let err = substitute_placeholders("{absent}", &HashMap::new()).unwrap_err();
        assert!(matches!(err, AssetError::MissingPlaceholder(name) if name == "absent"));
    }

    #[test]
    fn stray_brace_is_error() {
        assert!(matches!(
            substitute_placeholders("a } b", &HashMap::new()),
            Err(AssetError::UnbalancedBrace { position: 2 })
        ));
        assert!(matches!(
            substitute_placeholders("open {never", &HashMap::new()),
            Err(AssetError::UnbalancedBrace { .. })
        ));
    }

    proptest! {
        #[test]
        fn brace_free_text_is_unchanged(text in "[^{}]{0,64}") {
            let out = substitute_placeholders(&text, &HashMap::new()).unwrap();
            prop_assert_eq!(out, text);
        }
    }
}
