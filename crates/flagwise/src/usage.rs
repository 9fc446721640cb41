//! Usage text: preamble, flag descriptions and epilogue.

use crate::registry::{FlagSpec, Registry};

pub const DEFAULT_DESC_START: usize = 30;
pub const DEFAULT_DESC_WIDTH: usize = 50;

const ROW_INDENT: &str = "    ";
const VALUE_SUFFIX: &str = "=value";

/// Column layout of the flag description block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Column where descriptions (and their continuation lines) start.
    pub desc_start: usize,
    /// Maximum description characters per line.
    pub desc_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            desc_start: DEFAULT_DESC_START,
            desc_width: DEFAULT_DESC_WIDTH,
        }
    }
}

/// The three usage blocks.
///
/// Generated text and caller overrides are kept apart: an override always
/// wins, whether it was set before or after generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageText {
    generated_preamble: String,
    generated_flag_description: String,
    preamble_override: Option<String>,
    flag_description_override: Option<String>,
    epilogue: String,
}

impl UsageText {
    pub fn preamble(&self) -> &str {
        self.preamble_override
            .as_deref()
            .unwrap_or(&self.generated_preamble)
    }

    pub fn flag_description(&self) -> &str {
        self.flag_description_override
            .as_deref()
            .unwrap_or(&self.generated_flag_description)
    }

    pub fn epilogue(&self) -> &str {
        &self.epilogue
    }

    pub fn set_preamble(&mut self, preamble: impl Into<String>) {
        self.preamble_override = Some(preamble.into());
    }

    pub fn set_flag_description(&mut self, flag_description: impl Into<String>) {
        self.flag_description_override = Some(flag_description.into());
    }

    pub fn set_epilogue(&mut self, epilogue: impl Into<String>) {
        self.epilogue = epilogue.into();
    }

    /// Rebuild the generated blocks. Overrides are left untouched.
    pub fn generate(&mut self, registry: &Registry, binary: &str, non_flags: usize, layout: Layout) {
        self.generated_preamble = render_preamble(registry, binary, non_flags);
        self.generated_flag_description = render_flag_description(registry, non_flags, layout);
    }

    /// Preamble, flag descriptions and epilogue, concatenated.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.preamble().len() + self.flag_description().len() + self.epilogue.len(),
        );
        out.push_str(self.preamble());
        out.push_str(self.flag_description());
        out.push_str(&self.epilogue);
        out
    }
}

fn spelling_with_value(spelling: &str, spec: &FlagSpec) -> String {
    if spec.takes_value {
        format!("{spelling}{VALUE_SUFFIX}")
    } else {
        spelling.to_string()
    }
}

fn joined_spellings(spec: &FlagSpec, separator: &str) -> String {
    spec.spellings()
        .map(|s| spelling_with_value(s, spec))
        .collect::<Vec<_>>()
        .join(separator)
}

/// One-line invocation summary:
/// `Usage: prog [--opt|-o] --req=value|-r=value <--> nonflag1 \n`.
pub fn render_preamble(registry: &Registry, binary: &str, non_flags: usize) -> String {
    let mut out = format!("Usage: {binary} ");
    for spec in registry.optional() {
        out.push('[');
        out.push_str(&joined_spellings(spec, "|"));
        out.push_str("] ");
    }
    for spec in registry.required() {
        out.push_str(&joined_spellings(spec, "|"));
        out.push(' ');
    }
    if non_flags > 0 {
        out.push_str("<--> ");
        for i in 1..=non_flags {
            out.push_str(&format!("nonflag{i} "));
        }
    }
    out.push('\n');
    out
}

/// Per-flag rows, required flags first, each group in declaration order.
pub fn render_flag_description(registry: &Registry, non_flags: usize, layout: Layout) -> String {
    let mut out = String::new();
    if !registry.required().is_empty() {
        out.push_str("\n  Required flags:\n");
        render_rows(&mut out, registry.required(), layout);
    }
    if !registry.optional().is_empty() {
        out.push_str("\n  Optional flags:\n");
        render_rows(&mut out, registry.optional(), layout);
    }
    if non_flags > 0 {
        out.push_str(&format!("\n  {non_flags} non-flags are required\n"));
    }
    out
}

fn render_rows(out: &mut String, specs: &[FlagSpec], layout: Layout) {
    for spec in specs {
        let left = format!("{ROW_INDENT}{}", joined_spellings(spec, "/"));
        out.push_str(&format!("{left:<width$}", width = layout.desc_start));
        out.push_str(&wrap_description(&spec.description, layout));
        out.push('\n');
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Where to cut a full-width window: right after its last non-alphabetic
/// character, or at the window end when it is one unbroken word.
fn cut_point(window: &[char]) -> usize {
    match window.iter().rposition(|c| !c.is_alphabetic()) {
        Some(pos) => pos + 1,
        None => window.len(),
    }
}

/// Wrap `description` to `layout.desc_width` characters per line.
///
/// Continuation lines are indented to `layout.desc_start` and have their
/// leading blanks removed. No trailing newline is added.
pub fn wrap_description(description: &str, layout: Layout) -> String {
    let width = layout.desc_width.max(1);
    let chars: Vec<char> = description.chars().collect();
    if chars.len() <= width {
        return description.to_string();
    }

    let indent = " ".repeat(layout.desc_start);
    let mut out = String::with_capacity(description.len() * 2);
    let mut rest = chars.as_slice();
    loop {
        let skip = rest.iter().take_while(|c| is_blank(**c)).count();
        rest = &rest[skip..];
        if rest.len() <= width {
            out.extend(rest);
            break;
        }
        let cut = cut_point(&rest[..width]);
        out.extend(&rest[..cut]);
        out.push('\n');
        out.push_str(&indent);
        rest = &rest[cut..];
    }
    out
}
