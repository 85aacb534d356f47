//! Target-language rendering of pseudocode lines
//!
//! Only `steps[].code` depends on the language; the contract (inputs,
//! outputs, fixtures) is the same for every target.

use crate::pseudocode::{Line, LineKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used when rendering step code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Python,
    TypeScript,
    Rust,
    /// Normalized pseudocode, no translation
    Pseudocode,
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetLanguage::Python => "python",
            TargetLanguage::TypeScript => "typescript",
            TargetLanguage::Rust => "rust",
            TargetLanguage::Pseudocode => "pseudocode",
        };
        f.write_str(s)
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(TargetLanguage::Python),
            "typescript" | "ts" | "javascript" | "js" => Ok(TargetLanguage::TypeScript),
            "rust" | "rs" => Ok(TargetLanguage::Rust),
            "pseudocode" | "none" | "" => Ok(TargetLanguage::Pseudocode),
            other => Err(format!("unknown target language: {other}")),
        }
    }
}

impl TargetLanguage {
    /// Parse a free-form hint, falling back to pseudocode
    #[must_use]
    pub fn from_hint(hint: &str) -> Self {
        hint.parse().unwrap_or(TargetLanguage::Pseudocode)
    }

    /// Render one line
    #[must_use]
    pub fn render(self, line: &Line) -> String {
        match self {
            TargetLanguage::Pseudocode => line.text.clone(),
            TargetLanguage::Python => python(line),
            TargetLanguage::TypeScript => typescript(line),
            TargetLanguage::Rust => rust(line),
        }
    }
}

/// Rewrite comparison operators; `logical` also rewrites `and`/`or`
fn expr(text: &str, logical: bool) -> String {
    let mut out = text
        .replace('≠', "!=")
        .replace('≤', "<=")
        .replace('≥', ">=")
        .replace('←', "=")
        .replace(" = ", " == ");
    if logical {
        out = out
            .replace(" and ", " && ")
            .replace(" or ", " || ");
    }
    out
}

fn python(line: &Line) -> String {
    match &line.kind {
        LineKind::Procedure { name, params } => format!("def {name}({params}):"),
        LineKind::Assign { target, value } => format!("{target} = {}", expr(value, false)),
        LineKind::ForEach { var, iter } => format!("for {var} in {iter}:"),
        LineKind::ForRange { var, from, to } => format!("for {var} in range({from}, {to} + 1):"),
        LineKind::While { cond } => format!("while {}:", expr(cond, false)),
        LineKind::Repeat => "while True:".to_string(),
        LineKind::If { cond } => format!("if {}:", expr(cond, false)),
        LineKind::ElseIf { cond } => format!("elif {}:", expr(cond, false)),
        LineKind::Else => "else:".to_string(),
        LineKind::Return { value } if value.is_empty() => "return".to_string(),
        LineKind::Return { value } => format!("return {}", expr(value, false)),
        LineKind::Close { marker } => format!("# {marker}"),
        LineKind::Statement => format!("# {}", line.text),
    }
}

fn typescript(line: &Line) -> String {
    match &line.kind {
        LineKind::Procedure { name, params } => format!("function {name}({params}) {{"),
        LineKind::Assign { target, value } => format!("{target} = {};", expr(value, true)),
        LineKind::ForEach { var, iter } => format!("for (const {var} of {iter}) {{"),
        LineKind::ForRange { var, from, to } => {
            format!("for (let {var} = {from}; {var} <= {to}; {var}++) {{")
        }
        LineKind::While { cond } => format!("while ({}) {{", expr(cond, true)),
        LineKind::Repeat => "while (true) {".to_string(),
        LineKind::If { cond } => format!("if ({}) {{", expr(cond, true)),
        LineKind::ElseIf { cond } => format!("}} else if ({}) {{", expr(cond, true)),
        LineKind::Else => "} else {".to_string(),
        LineKind::Return { value } if value.is_empty() => "return;".to_string(),
        LineKind::Return { value } => format!("return {};", expr(value, true)),
        LineKind::Close { .. } => "}".to_string(),
        LineKind::Statement => format!("// {}", line.text),
    }
}

fn rust(line: &Line) -> String {
    match &line.kind {
        LineKind::Procedure { name, params } => format!("fn {}({params}) {{", name.to_lowercase()),
        LineKind::Assign { target, value } if target.contains(['[', '.']) => {
            format!("{target} = {};", expr(value, true))
        }
        LineKind::Assign { target, value } => format!("let {target} = {};", expr(value, true)),
        LineKind::ForEach { var, iter } => format!("for {var} in {iter} {{"),
        LineKind::ForRange { var, from, to } => format!("for {var} in {from}..={to} {{"),
        LineKind::While { cond } => format!("while {} {{", expr(cond, true)),
        LineKind::Repeat => "loop {".to_string(),
        LineKind::If { cond } => format!("if {} {{", expr(cond, true)),
        LineKind::ElseIf { cond } => format!("}} else if {} {{", expr(cond, true)),
        LineKind::Else => "} else {".to_string(),
        LineKind::Return { value } if value.is_empty() => "return;".to_string(),
        LineKind::Return { value } => format!("return {};", expr(value, true)),
        LineKind::Close { .. } => "}".to_string(),
        LineKind::Statement => format!("// {}", line.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pseudocode::classify_line;

    fn line(text: &str) -> Line {
        Line {
            text: text.to_string(),
            depth: 0,
            kind: classify_line(text),
        }
    }

    #[test]
    fn parses_hints() {
        assert_eq!(TargetLanguage::from_hint("TS"), TargetLanguage::TypeScript);
        assert_eq!(TargetLanguage::from_hint("cobol"), TargetLanguage::Pseudocode);
        assert!("cobol".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn renders_each_language() {
        let header = line("for i = 1 to n do");
        assert_eq!(TargetLanguage::Python.render(&header), "for i in range(1, n + 1):");
        assert_eq!(TargetLanguage::TypeScript.render(&header), "for (let i = 1; i <= n; i++) {");
        assert_eq!(TargetLanguage::Rust.render(&header), "for i in 1..=n {");
        assert_eq!(TargetLanguage::Pseudocode.render(&header), "for i = 1 to n do");
    }

    #[test]
    fn conditions_and_closers() {
        let cond = line("if a ≠ b and c = d then");
        assert_eq!(TargetLanguage::Python.render(&cond), "if a != b and c == d:");
        assert_eq!(TargetLanguage::Rust.render(&cond), "if a != b && c == d {");
        let close = line("end if");
        assert_eq!(TargetLanguage::Python.render(&close), "# end if");
        assert_eq!(TargetLanguage::TypeScript.render(&close), "}");
    }

    #[test]
    fn procedure_headers() {
        let header = line("procedure Sum(xs)");
        assert_eq!(TargetLanguage::Python.render(&header), "def Sum(xs):");
        assert_eq!(TargetLanguage::TypeScript.render(&header), "function Sum(xs) {");
        assert_eq!(TargetLanguage::Rust.render(&header), "fn sum(xs) {");
        assert_eq!(TargetLanguage::Rust.render(&line("end procedure")), "}");
    }

    #[test]
    fn rust_assignment_binds_plain_names() {
        assert_eq!(TargetLanguage::Rust.render(&line("score ← 0")), "let score = 0;");
        assert_eq!(TargetLanguage::Rust.render(&line("dist[v] ← 0")), "dist[v] = 0;");
    }
}
