//! Navigation menus
//!
//! A plaything declares its menu as an ordered map of view name to
//! language-string code. [`resolve_menu`] filters that against a
//! specification's `menu_items` and produces the [`MenuEntry`] list that both
//! renderers consume: [`render_menu_html`] for server-rendered pages and
//! [`render_menu_tree`] for the reactive UI.

use crate::langstrings::LangStrings;
use crate::specification::MenuItems;
use indexmap::IndexMap;
use pg_ui::{escape_html, Component};

/// View name to language-string code, in display order
pub type MenuDefinition = IndexMap<String, String>;

const BRAND: &str = "DLP |";
const LIST_CLASS: &str = "nav col-md-auto justify-content-start mb-md-0";
const HEADER_CLASS_TREE: &str =
    "d-flex flex-row flex-wrap align-items-center justify-content-start py-2 mb-4 border-bottom";
const HEADER_CLASS_HTML: &str =
    "d-flex flex-row flex-wrap align-items-center justify-content-start py-2 mb-3 border-bottom";

/// One resolved menu link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// View name
    pub view: String,
    /// Display text
    pub label: String,
    /// Link target
    pub path: String,
    /// Whether this is the view being shown
    pub active: bool,
}

impl MenuEntry {
    /// Link CSS classes
    #[must_use]
    pub fn link_class(&self) -> String {
        let tone = if self.active { "link-secondary" } else { "link-dark" };
        format!("nav-link px-2 {tone}")
    }
}

/// Inputs shared by both menu renderers
#[derive(Debug, Clone, Copy)]
pub struct MenuRequest<'a> {
    /// Plaything menu
    pub menu: &'a MenuDefinition,
    /// Strings for link labels
    pub langstrings: &'a LangStrings,
    /// URL prefix placed before `/{view}`
    pub base_path: &'a str,
    /// View currently displayed
    pub current_view: &'a str,
    /// Request query string, with or without leading `?`
    pub query_string: &'a str,
}

/// Whether the query string carries `menu=1`
#[must_use]
pub fn menu_requested(query_string: &str) -> bool {
    query_string
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(k, v)| k == "menu" && v == "1")
}

fn normalise_query(query_string: &str) -> String {
    if query_string.is_empty() || query_string.starts_with('?') {
        query_string.to_string()
    } else {
        format!("?{query_string}")
    }
}

/// Menu entries for one specification
///
/// Empty unless `menu=1` is in the query string. A `menu_items` list keeps
/// the specification's order, drops views the menu does not know and shows a
/// repeated view once.
#[must_use]
pub fn resolve_menu(request: &MenuRequest<'_>, specification_id: &str, menu_items: &MenuItems) -> Vec<MenuEntry> {
    if !menu_requested(request.query_string) {
        return Vec::new();
    }

    let views: Vec<(&String, &String)> = match menu_items {
        MenuItems::All => request.menu.iter().collect(),
        MenuItems::Views(list) => {
            let mut views: Vec<(&String, &String)> = Vec::with_capacity(list.len());
            for (view, code) in list.iter().filter_map(|v| request.menu.get_key_value(v)) {
                if !views.iter().any(|(seen, _)| *seen == view) {
                    views.push((view, code));
                }
            }
            views
        }
    };

    let query = normalise_query(request.query_string);
    views
        .into_iter()
        .map(|(view, code)| MenuEntry {
            view: view.clone(),
            label: request.langstrings.get(code),
            path: format!("{}/{}/{}{}", request.base_path, view, specification_id, query),
            active: view == request.current_view,
        })
        .collect()
}

/// Header markup, or an empty string when there are no entries
#[must_use]
pub fn render_menu_html(entries: &[MenuEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let items: Vec<String> = entries
        .iter()
        .map(|e| {
            format!(
                r#"<li><a href="{}" class="{}">{}</a></li>"#,
                escape_html(&e.path),
                e.link_class(),
                escape_html(&e.label)
            )
        })
        .collect();

    format!(
        "<header class=\"{HEADER_CLASS_HTML}\">\n<span class=\"ms-2\">{BRAND}</span>\n\
         <ul class=\"{LIST_CLASS}\">{}</ul>\n</header>",
        items.join("\n")
    )
}

/// Header component tree, or `None` when there are no entries
#[must_use]
pub fn render_menu_tree(entries: &[MenuEntry]) -> Option<Component> {
    if entries.is_empty() {
        return None;
    }

    let items = entries.iter().map(|e| {
        Component::new("Li").child(
            Component::new("A")
                .child(e.label.as_str())
                .href(e.path.as_str())
                .class_name(e.link_class()),
        )
    });

    Some(
        Component::new("Header")
            .child(Component::new("Span").child(format!("{BRAND} ")).class_name("ms-2"))
            .child(Component::new("Ul").children(items).class_name(LIST_CLASS))
            .class_name(HEADER_CLASS_TREE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn menu() -> MenuDefinition {
        [("x", "ls_x"), ("y", "ls_y"), ("z", "ls_z")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn strings() -> LangStrings {
        LangStrings::new("en").with("ls_x", "en", "Ex").with("ls_y", "en", "Why")
    }

    #[test]
    fn flag_parsing() {
        assert!(menu_requested("menu=1"));
        assert!(menu_requested("?tag=a&menu=1"));
        assert!(!menu_requested("menu=10"));
        assert!(!menu_requested("?submenu=1"));
        assert!(!menu_requested(""));
    }

    #[test]
    fn no_flag_no_entries() {
        let (m, ls) = (menu(), strings());
        let req = MenuRequest {
            menu: &m,
            langstrings: &ls,
            base_path: "/quiz",
            current_view: "x",
            query_string: "tag=a",
        };
        assert!(resolve_menu(&req, "s1", &MenuItems::All).is_empty());
    }

    #[test]
    fn listed_views_keep_spec_order() {
        let (m, ls) = (menu(), strings());
        let req = MenuRequest {
            menu: &m,
            langstrings: &ls,
            base_path: "/quiz",
            current_view: "x",
            query_string: "menu=1",
        };
        let items = MenuItems::Views(vec!["y".into(), "unknown".into(), "x".into()]);
        let entries = resolve_menu(&req, "s1", &items);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].view, "y");
        assert_eq!(entries[0].path, "/quiz/y/s1?menu=1");
        assert_eq!(entries[0].label, "Why");
        assert!(!entries[0].active);
        assert!(entries[1].active);
        assert_eq!(entries[1].link_class(), "nav-link px-2 link-secondary");
    }

    #[test]
    fn repeated_view_listed_once() {
        let (m, ls) = (menu(), strings());
        let req = MenuRequest {
            menu: &m,
            langstrings: &ls,
            base_path: "/quiz",
            current_view: "y",
            query_string: "menu=1",
        };
        let items = MenuItems::Views(vec!["x".into(), "y".into(), "x".into()]);
        let entries = resolve_menu(&req, "s1", &items);

        let views: Vec<&str> = entries.iter().map(|e| e.view.as_str()).collect();
        assert_eq!(views, vec!["x", "y"]);
        assert_eq!(render_menu_html(&entries).matches("/quiz/x/s1").count(), 1);
    }

    #[test]
    fn wildcard_takes_whole_menu() {
        let (m, ls) = (menu(), strings());
        let req = MenuRequest {
            menu: &m,
            langstrings: &ls,
            base_path: "",
            current_view: "z",
            query_string: "?menu=1",
        };
        let entries = resolve_menu(&req, "s1", &MenuItems::All);
        let views: Vec<&str> = entries.iter().map(|e| e.view.as_str()).collect();
        assert_eq!(views, vec!["x", "y", "z"]);
        assert_eq!(entries[2].label, "!!ls_z!!");
    }

    #[test]
    fn both_renderers_share_links() {
        let entries = vec![
            MenuEntry {
                view: "x".into(),
                label: "Ex".into(),
                path: "/x/s1?menu=1".into(),
                active: true,
            },
            MenuEntry {
                view: "y".into(),
                label: "Why".into(),
                path: "/y/s1?menu=1".into(),
                active: false,
            },
        ];

        let html = render_menu_html(&entries);
        assert!(html.contains(r#"<li><a href="/x/s1?menu=1" class="nav-link px-2 link-secondary">Ex</a></li>"#));
        assert!(html.contains(r#"class="nav-link px-2 link-dark">Why</a>"#));
        assert!(html.contains("<span class=\"ms-2\">DLP |</span>"));

        let tree = render_menu_tree(&entries).unwrap();
        assert_eq!(tree.kind(), "Header");
        let links: Vec<&str> = tree
            .descendants()
            .into_iter()
            .filter(|c| c.kind() == "A")
            .filter_map(|c| c.get_prop("href"))
            .collect();
        assert_eq!(links, vec!["/x/s1?menu=1", "/y/s1?menu=1"]);
    }

    #[test]
    fn empty_entries_render_nothing() {
        assert_eq!(render_menu_html(&[]), "");
        assert!(render_menu_tree(&[]).is_none());
    }
}
