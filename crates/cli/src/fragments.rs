// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The three authored source fragments and their editor metadata.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

mod defaults;

pub use defaults::{DEFAULT_MARKUP, DEFAULT_SCRIPT, DEFAULT_STYLE};

/// Which buffer a fragment belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    #[value(alias = "html")]
    Markup,
    #[value(alias = "css")]
    Style,
    #[value(alias = "js", alias = "javascript")]
    Script,
}

impl FragmentKind {
    pub const ALL: [FragmentKind; 3] = [
        FragmentKind::Markup,
        FragmentKind::Style,
        FragmentKind::Script,
    ];

    /// Fixed persistence key.
    pub fn storage_key(self) -> &'static str {
        match self {
            FragmentKind::Markup => "playground-html",
            FragmentKind::Style => "playground-css",
            FragmentKind::Script => "playground-js",
        }
    }

    /// Tab label shown by editors.
    pub fn label(self) -> &'static str {
        match self {
            FragmentKind::Markup => "HTML",
            FragmentKind::Style => "CSS",
            FragmentKind::Script => "JavaScript",
        }
    }

    /// File name used when the fragments are exported as a bundle.
    pub fn file_name(self) -> &'static str {
        match self {
            FragmentKind::Markup => "index.html",
            FragmentKind::Style => "styles.css",
            FragmentKind::Script => "script.js",
        }
    }

    pub fn language(self) -> Language {
        match self {
            FragmentKind::Markup => Language::Markup,
            FragmentKind::Style => Language::Style,
            FragmentKind::Script => Language::Script,
        }
    }

    pub fn default_text(self) -> &'static str {
        match self {
            FragmentKind::Markup => DEFAULT_MARKUP,
            FragmentKind::Style => DEFAULT_STYLE,
            FragmentKind::Script => DEFAULT_SCRIPT,
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Editor language mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Markup,
    Style,
    Script,
    Plain,
}

impl Language {
    /// Map a loose language hint (`"html"`, `"CSS"`, `"js"`, …) to a mode.
    ///
    /// Unknown hints fall back to [`Language::Plain`].
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "html" | "markup" => Language::Markup,
            "css" | "style" => Language::Style,
            "javascript" | "js" | "script" => Language::Script,
            _ => Language::Plain,
        }
    }
}

/// One fragment value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub kind: FragmentKind,
    pub text: &'a str,
}

/// The markup/style/script triple a run is built from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragments {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl Fragments {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    /// The stock welcome page, stylesheet and demo script.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_MARKUP, DEFAULT_STYLE, DEFAULT_SCRIPT)
    }

    pub fn get(&self, kind: FragmentKind) -> &str {
        match kind {
            FragmentKind::Markup => &self.markup,
            FragmentKind::Style => &self.style,
            FragmentKind::Script => &self.script,
        }
    }

    pub fn set(&mut self, kind: FragmentKind, text: impl Into<String>) {
        let slot = match kind {
            FragmentKind::Markup => &mut self.markup,
            FragmentKind::Style => &mut self.style,
            FragmentKind::Script => &mut self.script,
        };
        *slot = text.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = Fragment<'_>> {
        FragmentKind::ALL.into_iter().map(move |kind| Fragment {
            kind,
            text: self.get(kind),
        })
    }
}

#[cfg(test)]
#[path = "fragments_tests.rs"]
mod tests;
