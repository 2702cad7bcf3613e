//! String-level tag scanning shared by the normalizer, the lexer and the
//! segmenter. There is no document tree: elements are found by matching an
//! opening tag with its closing tag while counting nested tags of the same
//! name.

use std::{borrow::Cow, ops::Range, sync::OnceLock};

use regex::{Captures, Regex};

fn re_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<(/?)([a-z][a-z0-9]*)\b([^>]*)>").expect("valid tag pattern"))
}

fn re_class() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
            .expect("valid class pattern")
    })
}

fn re_br() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\b[^>]*>").expect("valid br pattern"))
}

fn re_entity() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(nbsp|amp|lt|gt|quot|apos|#39);").expect("valid entity pattern"))
}

/// One opening or closing tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag<'a> {
    pub start: usize,
    pub end: usize,
    pub closing: bool,
    /// lower-cased element name
    pub name: String,
    pub attrs: &'a str,
}

impl Tag<'_> {
    pub fn self_closing(&self) -> bool {
        self.attrs.trim_end().ends_with('/')
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn classes(&self) -> Vec<&str> {
        class_list(self.attrs)
    }
}

/// An element located in a source string: its open tag, the byte range of
/// its inner content and the offset just past its closing tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<'a> {
    pub tag: Tag<'a>,
    pub inner: Range<usize>,
    pub end: usize,
}

/// all tags in `input`, in source order
pub fn tags(input: &str) -> impl Iterator<Item = Tag<'_>> {
    re_tag().captures_iter(input).filter_map(|caps| to_tag(&caps))
}

/// first tag starting at or after `from`
pub fn next_tag(input: &str, from: usize) -> Option<Tag<'_>> {
    re_tag().captures_at(input, from).and_then(|caps| to_tag(&caps))
}

fn to_tag<'a>(caps: &Captures<'a>) -> Option<Tag<'a>> {
    let whole = caps.get(0)?;
    Some(Tag {
        start: whole.start(),
        end: whole.end(),
        closing: caps.get(1).is_some_and(|slash| !slash.as_str().is_empty()),
        name: caps.get(2)?.as_str().to_ascii_lowercase(),
        attrs: caps.get(3).map(|attrs| attrs.as_str()).unwrap_or(""),
    })
}

/// Completes the element opened by `open`.
///
/// Nested elements with the same name are counted so the matching close is
/// found; a missing close tag extends the element to the end of `input`.
pub fn element<'a>(input: &'a str, open: Tag<'a>) -> Element<'a> {
    if open.self_closing() {
        let end = open.end;
        return Element {
            tag: open,
            inner: end..end,
            end,
        };
    }

    let mut depth = 0usize;
    for tag in tags(&input[open.end..]) {
        if tag.name != open.name {
            continue;
        }
        if tag.closing {
            if depth == 0 {
                let inner = open.end..open.end + tag.start;
                let end = open.end + tag.end;
                return Element { tag: open, inner, end };
            }
            depth -= 1;
        } else if !tag.self_closing() {
            depth += 1;
        }
    }

    let inner = open.end..input.len();
    Element {
        tag: open,
        inner,
        end: input.len(),
    }
}

pub fn class_list(attrs: &str) -> Vec<&str> {
    re_class()
        .captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|value| value.as_str().split_whitespace().collect())
        .unwrap_or_default()
}

pub fn has_class(attrs: &str, word: &str) -> bool {
    class_list(attrs).iter().any(|class| class.eq_ignore_ascii_case(word))
}

/// true when any class contains `fragment`, e.g. `page-content` in `page-content a4`
pub fn class_contains(attrs: &str, fragment: &str) -> bool {
    re_class()
        .captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .is_some_and(|value| value.as_str().contains(fragment))
}

/// true when `input` contains an opening tag named `name`
pub fn contains_open_tag(input: &str, name: &str) -> bool {
    tags(input).any(|tag| !tag.closing && tag.is(name))
}

pub fn strip_tags(input: &str) -> Cow<'_, str> {
    re_tag().replace_all(input, "")
}

pub fn br_to_newlines(input: &str) -> Cow<'_, str> {
    re_br().replace_all(input, "\n")
}

/// byte ranges of the recognised entities in `input`
pub fn entity_spans(input: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    re_entity().find_iter(input).map(|found| found.range())
}

/// Decodes the fixed entity set in a single pass, so `&amp;lt;` becomes
/// `&lt;` and not `<`. `&nbsp;` decodes to U+00A0.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    re_entity().replace_all(input, |caps: &Captures<'_>| {
        match caps.get(1).map(|name| name.as_str()) {
            Some("nbsp") => "\u{A0}",
            Some("amp") => "&",
            Some("lt") => "<",
            Some("gt") => ">",
            Some("quot") => "\"",
            _ => "'",
        }
    })
}

/// Inner markup of every top-level `page-content` wrapper, in order.
pub fn page_contents(input: &str) -> Vec<&str> {
    let mut pages = Vec::new();
    let mut from = 0;

    while let Some(tag) = next_tag(input, from) {
        if !tag.closing && tag.is("div") && class_contains(tag.attrs, "page-content") {
            let element = element(input, tag);
            pages.push(&input[element.inner.clone()]);
            from = element.end.max(from + 1);
        } else {
            from = tag.end;
        }
    }

    pages
}

/// Inner markup of the first `page-content` wrapper, or the whole input.
pub fn extract_page_content(input: &str) -> &str {
    page_contents(input).into_iter().next().unwrap_or(input)
}

/// Visible text of stored markup: wrapper removed, line breaks kept as
/// `\n`, tags stripped, entities decoded, non-breaking spaces made plain,
/// surrounding whitespace trimmed.
pub fn plain_text(input: &str) -> String {
    let inner = extract_page_content(input);
    let text = decode_entities(&strip_tags(&br_to_newlines(inner))).replace('\u{A0}', " ");
    text.trim().to_string()
}
