// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Share links: the three fragments as one reversible text token.
//!
//! A token is the base64url (unpadded) encoding of the UTF-8 JSON object
//! `{"html": …, "css": …, "js": …}`. Decoding is lenient about the alphabet,
//! padding, and a `+` that query decoding turned into a space.

use crate::fragments::{FragmentKind, Fragments};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static CODE_PARAM_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[?&#])code=([^&#]*)").ok());

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share token is empty")]
    Empty,

    #[error("share token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("share token is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("share token does not hold fragments: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct SharedRef<'a> {
    html: &'a str,
    css: &'a str,
    js: &'a str,
}

/// Fragments carried by a decoded token. Absent fields stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SharedFragments {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub css: Option<String>,
    #[serde(default)]
    pub js: Option<String>,
}

impl SharedFragments {
    pub fn get(&self, kind: FragmentKind) -> Option<&str> {
        match kind {
            FragmentKind::Markup => self.html.as_deref(),
            FragmentKind::Style => self.css.as_deref(),
            FragmentKind::Script => self.js.as_deref(),
        }
    }

    /// Overwrite the fragments this token carries; leave the rest alone.
    pub fn apply_to(&self, fragments: &mut Fragments) -> Vec<FragmentKind> {
        let mut applied = Vec::new();
        for kind in FragmentKind::ALL {
            if let Some(text) = self.get(kind) {
                fragments.set(kind, text);
                applied.push(kind);
            }
        }
        applied
    }
}

/// Bare token: unpadded URL-safe base64.
pub fn encode(fragments: &Fragments) -> String {
    URL_SAFE_NO_PAD.encode(to_json(fragments))
}

fn to_json(fragments: &Fragments) -> String {
    let shared = SharedRef {
        html: &fragments.markup,
        css: &fragments.style,
        js: &fragments.script,
    };
    // Serializing three string fields cannot fail.
    serde_json::to_string(&shared).unwrap_or_default()
}

pub fn decode(token: &str) -> Result<SharedFragments, ShareError> {
    let normalized = normalize(token);
    if normalized.is_empty() {
        return Err(ShareError::Empty);
    }
    let bytes = URL_SAFE_NO_PAD.decode(normalized)?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// `<base>?code=<token>`, with the token in the standard padded alphabet
/// and percent-encoded, so browser `atob` can read it back.
pub fn share_url(base: &str, fragments: &Fragments) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    let token = STANDARD
        .encode(to_json(fragments))
        .replace('+', "%2B")
        .replace('/', "%2F")
        .replace('=', "%3D");
    format!("{base}{separator}code={token}")
}

/// Pull the token out of a share link, or return a bare token unchanged.
pub fn token_from_locator(locator: &str) -> &str {
    let locator = locator.trim();
    CODE_PARAM_REGEX
        .as_ref()
        .and_then(|re| re.captures(locator))
        .and_then(|caps| caps.get(1))
        .map_or(locator, |m| m.as_str())
}

/// Decode a bare token or any link carrying a `code=` parameter.
pub fn decode_locator(locator: &str) -> Result<SharedFragments, ShareError> {
    decode(token_from_locator(locator))
}

/// Map any base64 flavour onto the unpadded URL-safe alphabet.
fn normalize(token: &str) -> String {
    let token = token
        .trim()
        .replace("%2B", "+")
        .replace("%2b", "+")
        .replace("%2F", "/")
        .replace("%2f", "/")
        .replace("%3D", "")
        .replace("%3d", "");
    token
        .chars()
        .filter_map(|c| match c {
            ' ' | '+' => Some('-'),
            '/' => Some('_'),
            '=' | '\n' | '\r' | '\t' => None,
            c => Some(c),
        })
        .collect()
}

#[cfg(test)]
#[path = "share_tests.rs"]
mod tests;
