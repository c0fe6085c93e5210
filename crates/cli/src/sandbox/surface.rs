// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! What a loaded document presents: styles, body markup, element ids and
//! the script blocks an execution context evaluates.
//!
//! The document goes through a full HTML parse, so `<script` text inside
//! comments, style sheets and other raw-text elements is never mistaken
//! for a script. A script element still ends at the first `</script>`,
//! even one written inside a string literal.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SCRIPT_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("script").ok());

static STYLE_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("style").ok());

static BODY_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("body").ok());

static ID_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("[id]").ok());

/// One inline script block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptBlock {
    pub source: String,
    /// 1-based document line on which the block's source begins.
    pub line: u32,
}

impl ScriptBlock {
    /// Source padded with leading newlines so evaluation reports
    /// document-relative line numbers.
    pub fn positioned_source(&self) -> String {
        let pad = self.line.saturating_sub(1) as usize;
        let mut text = String::with_capacity(pad + self.source.len());
        text.extend(std::iter::repeat_n('\n', pad));
        text.push_str(&self.source);
        text
    }
}

/// Parsed, renderable view of a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    pub styles: Vec<String>,
    /// Body markup with script elements removed.
    pub body: String,
    pub element_ids: Vec<String>,
    pub scripts: Vec<ScriptBlock>,
}

impl Surface {
    pub fn parse(doc: &str) -> Self {
        // The parser normalizes line endings; positions are searched in the same text.
        let source = doc.replace("\r\n", "\n").replace('\r', "\n");
        let mut html = Html::parse_document(&source);

        let styles = select_all(&html, &STYLE_SELECTOR)
            .map(|style| style.text().collect::<String>())
            .collect();

        let mut cursor = 0;
        let mut scripts = Vec::new();
        let mut script_nodes = Vec::new();
        for script in select_all(&html, &SCRIPT_SELECTOR) {
            script_nodes.push(script.id());
            let text: String = script.text().collect();
            if text.is_empty() {
                continue;
            }
            let line = match source[cursor..].find(&text) {
                Some(at) => {
                    let offset = cursor + at;
                    cursor = offset + text.len();
                    line_at(&source, offset)
                }
                None => line_at(&source, cursor),
            };
            if is_inline_script(script) {
                scripts.push(ScriptBlock { source: text, line });
            }
        }

        for node in script_nodes {
            if let Some(mut node) = html.tree.get_mut(node) {
                node.detach();
            }
        }

        let body_element = BODY_SELECTOR
            .as_ref()
            .and_then(|selector| html.select(selector).next());
        let (body, element_ids) = match body_element {
            Some(body) => (body.inner_html().trim().to_string(), collect_ids(body)),
            None => (String::new(), Vec::new()),
        };

        Self {
            styles,
            body,
            element_ids,
            scripts,
        }
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.element_ids.iter().any(|known| known == id)
    }
}

fn select_all<'a>(
    html: &'a Html,
    selector: &'a LazyLock<Option<Selector>>,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    selector
        .as_ref()
        .into_iter()
        .flat_map(move |selector| html.select(selector))
}

/// Scripts with a `src` or a non-JavaScript `type` are not evaluated.
fn is_inline_script(script: ElementRef<'_>) -> bool {
    let element = script.value();
    if element.attr("src").is_some() {
        return false;
    }
    match element.attr("type").map(str::trim) {
        None | Some("") => true,
        Some(kind) => matches!(
            kind.to_ascii_lowercase().as_str(),
            "text/javascript" | "application/javascript" | "module"
        ),
    }
}

fn line_at(doc: &str, offset: usize) -> u32 {
    let newlines = doc.as_bytes()[..offset]
        .iter()
        .filter(|b| **b == b'\n')
        .count();
    u32::try_from(newlines).map_or(u32::MAX, |n| n.saturating_add(1))
}

fn collect_ids(body: ElementRef<'_>) -> Vec<String> {
    let Some(selector) = ID_SELECTOR.as_ref() else {
        return Vec::new();
    };
    let mut ids: Vec<String> = Vec::new();
    for element in body.select(selector) {
        let Some(id) = element.value().attr("id").map(str::trim) else {
            continue;
        };
        if !id.is_empty() && !ids.iter().any(|known| known == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;
