use crate::{
    markup::{
        inline::lex,
        scan::{self, contains_open_tag, decode_entities, next_tag, strip_tags, Element},
    },
    types::{runs_are_blank, Block, ListBlock, ListItem, ScreenplayKind, ScreenplayLine, StyledRun},
};

/// How a section's markup is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rich,
    Screenplay,
}

/// Splits normalized markup into blocks in source order.
pub fn segment(normalized: &str, mode: Mode) -> Vec<Block> {
    match mode {
        Mode::Rich => segment_rich(normalized),
        Mode::Screenplay => segment_screenplay(normalized),
    }
}

fn is_rich_container(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "p" | "div" | "ul" | "ol")
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        _ => None,
    }
}

/// Orderedness a container is forced to when its content holds a list.
/// An inner `<ol>` wins over an inner `<ul>`, and both win over the
/// container's own tag name.
fn forced_list_kind(inner: &str) -> Option<bool> {
    if contains_open_tag(inner, "ol") {
        Some(true)
    } else if contains_open_tag(inner, "ul") {
        Some(false)
    } else {
        None
    }
}

fn segment_rich(html: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut loose_from = 0;
    let mut from = 0;

    while let Some(tag) = next_tag(html, from) {
        if tag.closing || !is_rich_container(&tag.name) {
            from = tag.end;
            continue;
        }

        push_paragraph(&mut blocks, &html[loose_from..tag.start]);

        let element = scan::element(html, tag);
        rich_container(&mut blocks, html, &element);

        from = element.end.max(from + 1);
        loose_from = element.end;
    }

    push_paragraph(&mut blocks, &html[loose_from.min(html.len())..]);
    blocks
}

fn rich_container(blocks: &mut Vec<Block>, html: &str, element: &Element<'_>) {
    let name = element.tag.name.as_str();
    let inner = &html[element.inner.clone()];

    if let Some(ordered) = forced_list_kind(inner) {
        if name == "ul" || name == "ol" {
            let items = parse_items(inner, 0);
            if !items.is_empty() {
                blocks.push(Block::List(ListBlock { ordered, items }));
            }
        } else {
            mixed_container(blocks, inner, ordered, heading_level(name));
        }
        return;
    }

    match name {
        "ul" | "ol" => {
            let items = parse_items(inner, 0);
            if !items.is_empty() {
                blocks.push(Block::List(ListBlock {
                    ordered: name == "ol",
                    items,
                }));
            }
        }
        "h1" | "h2" | "h3" => {
            let runs = lex(inner);
            if !runs_are_blank(&runs) {
                let level = heading_level(name).unwrap_or(3);
                blocks.push(Block::Heading { level, runs });
            }
        }
        _ => {
            // a div wrapping further blocks is transparent
            let nested = scan::tags(inner).any(|tag| !tag.closing && is_rich_container(&tag.name));
            if nested {
                blocks.extend(segment_rich(inner));
            } else {
                push_paragraph(blocks, inner);
            }
        }
    }
}

/// A paragraph, div or heading whose content holds lists: text around the
/// lists stays text, and the lists between text take the forced kind.
fn mixed_container(blocks: &mut Vec<Block>, inner: &str, ordered: bool, heading: Option<u8>) {
    let mut text_from = 0;
    let mut from = 0;
    let mut list: Option<ListBlock> = None;

    let flush_text = |blocks: &mut Vec<Block>, text: &str, list: &mut Option<ListBlock>| {
        let runs = lex(text);
        if runs_are_blank(&runs) {
            return;
        }
        if let Some(done) = list.take().filter(|list| !list.items.is_empty()) {
            blocks.push(Block::List(done));
        }
        match heading {
            Some(level) => blocks.push(Block::Heading { level, runs }),
            None => blocks.push(Block::Paragraph(runs)),
        }
    };

    while let Some(tag) = next_tag(inner, from) {
        if tag.closing || !(tag.is("ul") || tag.is("ol")) {
            from = tag.end;
            continue;
        }

        flush_text(blocks, &inner[text_from..tag.start], &mut list);

        let element = scan::element(inner, tag);
        let items = parse_items(&inner[element.inner.clone()], 0);
        list.get_or_insert_with(|| ListBlock {
            ordered,
            items: Vec::new(),
        })
        .items
        .extend(items);

        from = element.end.max(from + 1);
        text_from = element.end;
    }

    flush_text(blocks, &inner[text_from.min(inner.len())..], &mut list);
    if let Some(done) = list.filter(|list| !list.items.is_empty()) {
        blocks.push(Block::List(done));
    }
}

/// Items of a list body. At depth 0 nested lists become sublists of the
/// item they follow; deeper lists are flattened into their parent.
fn parse_items(body: &str, depth: usize) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = Vec::new();
    let mut loose_from = 0;
    let mut from = 0;

    while let Some(tag) = next_tag(body, from) {
        let is_list = tag.is("ul") || tag.is("ol");
        if tag.closing || !(tag.is("li") || is_list) {
            from = tag.end;
            continue;
        }

        push_loose_item(&mut items, &body[loose_from..tag.start]);
        let element = scan::element(body, tag);
        let inner = &body[element.inner.clone()];

        if is_list {
            let sublist = ListBlock {
                ordered: element.tag.is("ol"),
                items: parse_items(inner, depth + 1),
            };
            attach_sublist(&mut items, sublist, depth);
        } else {
            let (text, sublists) = split_item(inner, depth);
            let item = ListItem {
                runs: lex(&text),
                sublists: Vec::new(),
            };
            let keep = !runs_are_blank(&item.runs);
            if keep {
                items.push(item);
            }
            for sublist in sublists {
                if keep || depth > 0 {
                    attach_sublist(&mut items, sublist, depth);
                } else {
                    items.extend(sublist.items);
                }
            }
        }

        from = element.end.max(from + 1);
        loose_from = element.end;
    }

    push_loose_item(&mut items, &body[loose_from.min(body.len())..]);
    items
}

/// Text of an item with its nested lists cut out, plus those lists.
fn split_item(inner: &str, depth: usize) -> (String, Vec<ListBlock>) {
    let mut text = String::new();
    let mut sublists = Vec::new();
    let mut text_from = 0;
    let mut from = 0;

    while let Some(tag) = next_tag(inner, from) {
        if tag.closing || !(tag.is("ul") || tag.is("ol")) {
            from = tag.end;
            continue;
        }

        text.push_str(&inner[text_from..tag.start]);
        let element = scan::element(inner, tag);
        sublists.push(ListBlock {
            ordered: element.tag.is("ol"),
            items: parse_items(&inner[element.inner.clone()], depth + 1),
        });

        from = element.end.max(from + 1);
        text_from = element.end;
    }

    text.push_str(&inner[text_from.min(inner.len())..]);
    (text.trim().to_string(), sublists)
}

fn attach_sublist(items: &mut Vec<ListItem>, sublist: ListBlock, depth: usize) {
    if sublist.items.is_empty() {
        return;
    }
    match items.last_mut() {
        Some(parent) if depth == 0 => parent.sublists.push(sublist),
        _ => items.extend(sublist.items),
    }
}

fn push_loose_item(items: &mut Vec<ListItem>, text: &str) {
    let runs = lex(text.trim());
    if !runs_are_blank(&runs) {
        items.push(ListItem {
            runs,
            sublists: Vec::new(),
        });
    }
}

fn push_paragraph(blocks: &mut Vec<Block>, html: &str) {
    let runs = trim_runs(lex(html));
    if !runs_are_blank(&runs) {
        blocks.push(Block::Paragraph(runs));
    }
}

/// Drops leading and trailing line breaks left by markup formatting.
fn trim_runs(mut runs: Vec<StyledRun>) -> Vec<StyledRun> {
    while runs.first().is_some_and(|run| run.text.trim().is_empty()) {
        runs.remove(0);
    }
    while runs.last().is_some_and(|run| run.text.trim().is_empty()) {
        runs.pop();
    }
    runs
}

fn segment_screenplay(html: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut loose_from = 0;
    let mut from = 0;

    while let Some(tag) = next_tag(html, from) {
        if tag.closing || !(tag.is("div") || tag.is("p")) {
            from = tag.end;
            continue;
        }

        push_action_lines(&mut blocks, &html[loose_from..tag.start]);

        let kind = tag
            .classes()
            .into_iter()
            .find_map(ScreenplayKind::from_class)
            .unwrap_or(ScreenplayKind::Action);
        let element = scan::element(html, tag);

        if kind == ScreenplayKind::SceneGap {
            blocks.push(Block::Screenplay(ScreenplayLine {
                kind,
                text: String::new(),
            }));
        } else {
            let text = screenplay_text(&html[element.inner.clone()]);
            if !text.is_empty() {
                blocks.push(Block::Screenplay(ScreenplayLine { kind, text }));
            }
        }

        from = element.end.max(from + 1);
        loose_from = element.end;
    }

    push_action_lines(&mut blocks, &html[loose_from.min(html.len())..]);
    blocks
}

fn screenplay_text(inner: &str) -> String {
    decode_entities(&strip_tags(inner)).trim().to_string()
}

/// Text typed outside any block container is kept as action.
fn push_action_lines(blocks: &mut Vec<Block>, html: &str) {
    let text = screenplay_text(html);
    if !text.is_empty() {
        blocks.push(Block::Screenplay(ScreenplayLine {
            kind: ScreenplayKind::Action,
            text,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::runs_text;

    fn texts(items: &[ListItem]) -> Vec<String> {
        items.iter().map(|item| runs_text(&item.runs)).collect()
    }

    #[test]
    fn ordered_list_keeps_every_item_in_order() {
        let blocks = segment("<ol><li>uno</li><li>due</li><li>tre</li></ol>", Mode::Rich);
        assert_eq!(blocks.len(), 1);
        let Block::List(list) = &blocks[0] else {
            panic!("expected a list, got {:?}", blocks[0]);
        };
        assert!(list.ordered);
        assert_eq!(texts(&list.items), vec!["uno", "due", "tre"]);
    }

    #[test]
    fn loose_text_between_containers_becomes_paragraphs() {
        let blocks = segment("intro<h2>Titolo</h2>middle<p>para</p>tail", Mode::Rich);
        let kinds: Vec<String> = blocks
            .iter()
            .map(|block| match block {
                Block::Heading { level, runs } => format!("h{level}:{}", runs_text(runs)),
                Block::Paragraph(runs) => format!("p:{}", runs_text(runs)),
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec!["p:intro", "h2:Titolo", "p:middle", "p:para", "p:tail"]);
    }

    #[test]
    fn inner_ordered_list_forces_the_container_kind() {
        let blocks = segment("<ul><li>a<ol><li>b</li></ol></li></ul>", Mode::Rich);
        let Block::List(list) = &blocks[0] else {
            panic!("expected a list");
        };
        assert!(list.ordered);
        assert_eq!(texts(&list.items), vec!["a"]);
        assert_eq!(list.items[0].sublists.len(), 1);
        assert!(list.items[0].sublists[0].ordered);
        assert_eq!(texts(&list.items[0].sublists[0].items), vec!["b"]);
    }

    #[test]
    fn paragraph_wrapping_a_list_keeps_surrounding_text() {
        let blocks = segment("<p>prima<ul><li>x</li></ul>dopo</p>", Mode::Rich);
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Block::Paragraph(runs) if runs_text(runs) == "prima"));
        assert!(matches!(&blocks[1], Block::List(list) if !list.ordered && list.items.len() == 1));
        assert!(matches!(&blocks[2], Block::Paragraph(runs) if runs_text(runs) == "dopo"));
    }

    #[test]
    fn deeper_nesting_is_flattened() {
        let html = "<ul><li>a<ul><li>b<ul><li>c</li></ul></li></ul></li></ul>";
        let blocks = segment(html, Mode::Rich);
        let Block::List(list) = &blocks[0] else {
            panic!("expected a list");
        };
        assert_eq!(texts(&list.items[0].sublists[0].items), vec!["b", "c"]);
        assert!(list.items[0].sublists[0].items.iter().all(|item| item.sublists.is_empty()));
    }

    #[test]
    fn sibling_sublist_attaches_to_previous_item() {
        let blocks = segment("<ul><li>a</li><ul><li>b</li></ul><li>c</li></ul>", Mode::Rich);
        let Block::List(list) = &blocks[0] else {
            panic!("expected a list");
        };
        assert_eq!(texts(&list.items), vec!["a", "c"]);
        assert_eq!(texts(&list.items[0].sublists[0].items), vec!["b"]);
    }

    #[test]
    fn blank_paragraphs_are_dropped() {
        let blocks = segment("<p> </p><p>&nbsp;</p><div><br></div>", Mode::Rich);
        assert!(blocks.is_empty());
    }

    #[test]
    fn screenplay_classes_and_defaults() {
        let html = concat!(
            "<div class=\"scene-heading\">int. casa - notte</div>",
            "<div class=\"scene-gap\"></div>",
            "<div class=\"character\">Anna</div>",
            "<div class=\"unknown\">cammina</div>",
            "<div class=\"dialogue\">  </div>",
            "<p>senza classe</p>",
        );
        let lines: Vec<(ScreenplayKind, String)> = segment(html, Mode::Screenplay)
            .into_iter()
            .map(|block| match block {
                Block::Screenplay(line) => (line.kind, line.text),
                other => panic!("unexpected block {other:?}"),
            })
            .collect();

        assert_eq!(
            lines,
            vec![
                (ScreenplayKind::SceneHeading, "int. casa - notte".to_string()),
                (ScreenplayKind::SceneGap, String::new()),
                (ScreenplayKind::Character, "Anna".to_string()),
                (ScreenplayKind::Action, "cammina".to_string()),
                (ScreenplayKind::Action, "senza classe".to_string()),
            ]
        );
    }

    #[test]
    fn segmentation_is_deterministic() {
        let html = "<h1>T</h1><ul><li>a</li></ul><p>b <b>c</b></p>";
        assert_eq!(segment(html, Mode::Rich), segment(html, Mode::Rich));
    }
}
