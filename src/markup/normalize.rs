use std::sync::OnceLock;

use regex::Regex;

use crate::{
    markup::scan::{self, br_to_newlines, has_class, next_tag, page_contents},
    types::ScreenplayKind,
};

fn re_empty_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<li\b[^>]*>\s*</li>").expect("valid item pattern"))
}

fn re_empty_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<ul\b[^>]*>\s*</ul>|<ol\b[^>]*>\s*</ol>").expect("valid list pattern")
    })
}

fn re_adjacent_ul() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</ul>\s*<ul\b[^>]*>").expect("valid merge pattern"))
}

fn re_adjacent_ol() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</ol>\s*<ol\b[^>]*>").expect("valid merge pattern"))
}

fn re_block_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(</(?:div|p)>)\s*(<(?:div|p)\b)").expect("valid boundary pattern")
    })
}

/// Cleans stored rich markup before segmentation.
///
/// Unwraps `page-content` containers, turns legacy `<div class="ul">` /
/// `<p class="ol">` blocks into real lists, closes lists left open, then
/// drops empty items and lists and merges adjacent lists of the same kind
/// until nothing changes. A list never changes kind. Line breaks are kept
/// as `<br>`: the lexer turns them into break runs.
///
/// `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let mut html = unwrap_pages(&raw.replace('\r', ""));
    html = repair_legacy_lists(&html);
    html = close_open_lists(&html);

    loop {
        let next = tidy_lists(&html);
        if next == html {
            break;
        }
        html = next;
    }

    html.trim().to_string()
}

/// Screenplay markup keeps its block containers but needs plain-text line
/// breaks: wrappers are removed and `<br>` becomes `\n`.
pub fn normalize_screenplay(raw: &str) -> String {
    br_to_newlines(&unwrap_pages(&raw.replace('\r', ""))).into_owned()
}

/// Inserts an empty `scene-gap` block between every pair of adjacent block
/// containers, reproducing the blank line the editor shows between them.
///
/// Applied once per render; it is not idempotent.
pub fn insert_scene_gaps(html: &str) -> String {
    let gap = format!(
        r#"${{1}}<div class="{}"></div>${{2}}"#,
        ScreenplayKind::SceneGap.class_name()
    );
    re_block_boundary().replace_all(html, gap.as_str()).into_owned()
}

/// The page segments of multi-page rich content, or the whole input as a
/// single segment.
pub fn split_pages(raw: &str) -> Vec<&str> {
    let pages = page_contents(raw);
    if pages.is_empty() {
        vec![raw]
    } else {
        pages
    }
}

fn unwrap_pages(raw: &str) -> String {
    let mut html = raw.to_string();
    loop {
        let inner = match page_contents(&html).first() {
            Some(inner) => inner.to_string(),
            None => return html,
        };
        html = inner;
    }
}

/// `<div class="ul">` and `<p class="ol">` predate real list markup.
fn repair_legacy_lists(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut from = 0;

    while let Some(tag) = next_tag(html, from) {
        let legacy = !tag.closing && (tag.is("div") || tag.is("p"));
        let kind = if !legacy {
            None
        } else if has_class(tag.attrs, "ul") {
            Some("ul")
        } else if has_class(tag.attrs, "ol") {
            Some("ol")
        } else {
            None
        };

        let Some(kind) = kind else {
            out.push_str(&html[from..tag.end]);
            from = tag.end;
            continue;
        };

        out.push_str(&html[from..tag.start]);
        let element = scan::element(html, tag);
        let inner = repair_legacy_lists(&html[element.inner.clone()]);

        out.push_str(&format!("<{kind}>"));
        if scan::contains_open_tag(&inner, "li") {
            out.push_str(&inner);
        } else {
            out.push_str(&format!("<li>{inner}</li>"));
        }
        out.push_str(&format!("</{kind}>"));

        from = element.end;
    }

    out.push_str(&html[from..]);
    out
}

/// Appends closing tags for lists still open at the end of the input.
fn close_open_lists(html: &str) -> String {
    let mut open: Vec<String> = Vec::new();

    for tag in scan::tags(html) {
        if !(tag.is("ul") || tag.is("ol")) || tag.self_closing() {
            continue;
        }
        if tag.closing {
            if let Some(index) = open.iter().rposition(|name| *name == tag.name) {
                open.remove(index);
            }
        } else {
            open.push(tag.name);
        }
    }

    let mut out = html.to_string();
    for name in open.iter().rev() {
        out.push_str(&format!("</{name}>"));
    }
    out
}

fn tidy_lists(html: &str) -> String {
    let html = re_empty_item().replace_all(html, "");
    let html = re_empty_list().replace_all(&html, "");
    let html = re_adjacent_ul().replace_all(&html, "");
    let html = re_adjacent_ol().replace_all(&html, "");
    html.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unwraps_page_content() {
        let raw = r#"<div class="page-content"><p>uno</p></div>"#;
        assert_eq!(normalize(raw), "<p>uno</p>");
    }

    #[test]
    fn legacy_list_containers_become_lists() {
        assert_eq!(normalize(r#"<div class="ul">voce</div>"#), "<ul><li>voce</li></ul>");
        assert_eq!(
            normalize(r#"<p class="ol"><li>a</li><li>b</li></p>"#),
            "<ol><li>a</li><li>b</li></ol>"
        );
    }

    #[test]
    fn merges_adjacent_lists_of_the_same_kind_only() {
        let raw = "<ul><li>a</li></ul>\n<ul><li>b</li></ul><ol><li>c</li></ol>";
        assert_eq!(normalize(raw), "<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol>");
    }

    #[test]
    fn drops_empty_items_and_lists() {
        let raw = "<ol><li> </li><li>x</li></ol><ul><li></li></ul><p>after</p>";
        assert_eq!(normalize(raw), "<ol><li>x</li></ol><p>after</p>");
    }

    #[test]
    fn closes_lists_left_open() {
        assert_eq!(normalize("<ul><li>a</li>"), "<ul><li>a</li></ul>");
        assert_eq!(normalize("<ol><li>a<ul><li>b</li>"), "<ol><li>a<ul><li>b</li></ul></ol>");
    }

    #[test]
    fn screenplay_breaks_become_newlines() {
        let raw = "<div class=\"page-content\"><div class=\"action\">a<br>b\r</div></div>";
        assert_eq!(normalize_screenplay(raw), "<div class=\"action\">a\nb</div>");
    }

    #[test]
    fn gaps_between_adjacent_blocks() {
        let html = "<div class=\"character\">ANNA</div>\n<div class=\"dialogue\">Ciao</div>";
        assert_eq!(
            insert_scene_gaps(html),
            "<div class=\"character\">ANNA</div><div class=\"scene-gap\"></div><div class=\"dialogue\">Ciao</div>"
        );
    }

    #[test]
    fn page_segments() {
        let raw = r#"<div class="page-content">a</div><div class="page-content">b</div>"#;
        assert_eq!(split_pages(raw), vec!["a", "b"]);
        assert_eq!(split_pages("<p>x</p>"), vec!["<p>x</p>"]);
    }

    fn markup() -> impl Strategy<Value = String> {
        let pieces = prop::sample::select(vec![
            "<ul>", "</ul>", "<ol>", "</ol>", "<li>", "</li>", "<p>", "</p>",
            "<div class=\"ul\">", "<div class=\"ol\">", "<p class=\"ul\">", "</div>",
            "<div class=\"page-content\">", "<b>", "</b>", "<br>", " ", "\n", "\r",
            "testo", "&amp;", "<h2>", "</h2>",
        ]);
        prop::collection::vec(pieces, 0..24).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in markup()) {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn screenplay_normalization_is_idempotent(raw in markup()) {
            let once = normalize_screenplay(&raw);
            prop_assert_eq!(normalize_screenplay(&once), once);
        }
    }
}
