// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sandbox document synthesis.
//!
//! Builds the single self-contained HTML document a run loads into its
//! isolated context. Styles and markup are embedded verbatim; isolation,
//! not escaping, is what keeps authored markup harmless. The document
//! carries its own instrumentation:
//!
//! - a preamble in `<head>` that wraps `console.log/info/warn/error` so each
//!   call keeps its native behavior and also posts a telemetry event to
//!   `window.parent`
//! - a `window.onerror` handler that turns uncaught failures into one
//!   `error` event with line and column, suppressing the default report
//! - a `try`/`catch` around the user script so an evaluation failure becomes
//!   one `error` event while markup and styles stay rendered
//!
//! Synthesis is pure: the same fragments always yield the same document.

use crate::fragments::Fragments;
use std::fmt;

/// Instrumentation installed before any authored content runs.
pub const INSTRUMENTATION_PREAMBLE: &str = include_str!("synth/preamble.js");

/// Opaque document text ready to be loaded into an execution context.
#[derive(Clone, PartialEq, Eq)]
pub struct SynthesizedDocument(String);

impl SynthesizedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SynthesizedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizedDocument")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

/// Combine the three fragments into one instrumented document.
pub fn synthesize(markup: &str, style: &str, script: &str) -> SynthesizedDocument {
    let mut doc = String::with_capacity(
        DOCUMENT_OVERHEAD + INSTRUMENTATION_PREAMBLE.len() + markup.len() + style.len() + script.len(),
    );

    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    doc.push_str("<meta charset=\"UTF-8\" />\n");
    doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
    );
    doc.push_str("<style>");
    doc.push_str(style);
    doc.push_str("</style>\n<script>\n");
    doc.push_str(INSTRUMENTATION_PREAMBLE);
    doc.push_str("</script>\n</head>\n<body>\n");
    doc.push_str(markup);
    doc.push_str("\n<script>\ntry {\n");
    doc.push_str(script);
    doc.push_str("\n} catch (error) {\n  window.__livepad_report(error);\n}\n</script>\n");
    doc.push_str("</body>\n</html>\n");

    SynthesizedDocument(doc)
}

/// [`synthesize`] over a [`Fragments`] triple.
pub fn synthesize_fragments(fragments: &Fragments) -> SynthesizedDocument {
    synthesize(&fragments.markup, &fragments.style, &fragments.script)
}

const DOCUMENT_OVERHEAD: usize = 320;

#[cfg(test)]
#[path = "synth_tests.rs"]
mod tests;
