//! Template expansion and precompilation.
//!
//! Page templates go through two passes at reload time:
//!
//! 1. `expand` interpolates `{{var}}` placeholders against the layered
//!    configuration context. This happens once per reload.
//! 2. `parse` splits the expanded text on `$NAME` runtime markers
//!    (uppercase ASCII) into a typed segment sequence. Serving code fills
//!    the slots per request without re-parsing the template.

use std::collections::HashMap;

/// One token of a precompiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// Runtime slot, named by its marker without the `$` sigil.
    Slot(String),
}

/// An expanded template, precompiled into an ordered token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Reassemble the template, resolving each slot through `fill`.
    pub fn render(&self, mut fill: impl FnMut(&str) -> String) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name) => out.push_str(&fill(name)),
            }
        }
        out
    }
}

/// Interpolate `{{var}}` placeholders against the context. Unknown
/// variables expand to nothing; unterminated placeholders are kept
/// verbatim.
pub fn expand(source: &str, ctx: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match ctx.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        tracing::warn!(var = name, "template variable missing from context");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse expanded text into a precompiled segment sequence. A marker is
/// `$` followed by one or more uppercase ASCII letters; everything else
/// is literal.
pub fn parse(expanded: &str) -> CompiledTemplate {
    let bytes = expanded.as_bytes();
    let mut segments = Vec::new();
    let mut lit_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_uppercase() {
                j += 1;
            }
            if j > i + 1 {
                if lit_start < i {
                    segments.push(Segment::Literal(expanded[lit_start..i].to_string()));
                }
                segments.push(Segment::Slot(expanded[i + 1..j].to_string()));
                lit_start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    if lit_start < expanded.len() {
        segments.push(Segment::Literal(expanded[lit_start..].to_string()));
    }
    CompiledTemplate { segments }
}
