//! Pseudocode transcription
//!
//! Turns algorithm pseudocode into a flat list of [`Line`]s with nesting
//! depth. Line numbers (`1:`, `1.`, `1)`), blank lines and header lines
//! (`Algorithm 3 ...`, `Input:`, `Output:`, `Require:`, `Ensure:`) are
//! dropped.
//!
//! Depth comes from explicit block markers when the pseudocode has any
//! (`procedure`/`function`/`do`/`then`/`repeat` open, `end ...`/`until`
//! close), otherwise from indentation. A variable named `end` or `until`
//! on the left of an assignment is not a closer.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\s*[:.)]").expect("valid line number regex"));

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(algorithm\b|inputs?\s*:|outputs?\s*:|require\s*:|ensure\s*:)")
        .expect("valid header regex")
});

static CLOSER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(end(\s|for|if|while|loop|function|procedure|$)|until\b)").expect("valid closer regex"));

static PROCEDURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:procedure|function|def)\s+([A-Za-z_][\w.]*)\s*(?:\((.*)\))?")
        .expect("valid procedure regex")
});

static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_]\w*\s*(←|<-|:=|=[^=])").expect("valid assignment regex"));

/// Errors that make pseudocode untranscribable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PseudocodeError {
    /// No pseudocode at all
    #[error("pseudocode is empty")]
    Empty,

    /// Only header lines, no steps
    #[error("pseudocode contains only header lines")]
    HeaderOnly,

    /// Block closed without a matching opener
    #[error("unbalanced block marker '{marker}' on line {line}")]
    UnexpectedCloser { marker: String, line: usize },

    /// Blocks still open at the end
    #[error("{open} block(s) never closed")]
    UnclosedBlocks { open: usize },
}

/// Syntactic role of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `procedure Name(params)`, `function ...`, `def ...`
    Procedure { name: String, params: String },
    /// `x ← expr`, `x <- expr`, `x := expr`
    Assign { target: String, value: String },
    /// `for each x in xs do`
    ForEach { var: String, iter: String },
    /// `for i = a to b do`
    ForRange { var: String, from: String, to: String },
    /// `while cond do`
    While { cond: String },
    /// `repeat`
    Repeat,
    /// `if cond then`
    If { cond: String },
    /// `else if cond then`
    ElseIf { cond: String },
    /// `else`
    Else,
    /// `return expr`
    Return { value: String },
    /// `end ...` / `until cond`
    Close { marker: String },
    /// Anything else
    Statement,
}

impl LineKind {
    fn opens_block(&self) -> bool {
        matches!(
            self,
            LineKind::Procedure { .. }
                | LineKind::ForEach { .. }
                | LineKind::ForRange { .. }
                | LineKind::While { .. }
                | LineKind::Repeat
                | LineKind::If { .. }
        )
    }
}

/// One transcribed pseudocode line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Normalized text (number prefix and surrounding whitespace removed)
    pub text: String,
    /// Block nesting depth
    pub depth: usize,
    pub kind: LineKind,
}

/// Classify one normalized line
#[must_use]
pub fn classify_line(text: &str) -> LineKind {
    let lower = text.to_ascii_lowercase();
    let body = |prefix: usize, suffix: &str| -> String {
        let end = if lower.ends_with(suffix) { text.len() - suffix.len() } else { text.len() };
        text.get(prefix..end)
            .unwrap_or_default()
            .trim()
            .trim_end_matches(':')
            .trim_end()
            .to_string()
    };

    if CLOSER.is_match(text) && !ASSIGNMENT.is_match(text) {
        return LineKind::Close { marker: text.to_string() };
    }
    if let Some(caps) = PROCEDURE.captures(text) {
        let capture = |i: usize| caps.get(i).map_or("", |m| m.as_str()).trim().to_string();
        return LineKind::Procedure { name: capture(1), params: capture(2) };
    }
    if lower == "else" {
        return LineKind::Else;
    }
    if lower.starts_with("else if ") {
        return LineKind::ElseIf { cond: body("else if ".len(), " then") };
    }
    if lower.starts_with("if ") {
        return LineKind::If { cond: body("if ".len(), " then") };
    }
    if lower.starts_with("while ") {
        return LineKind::While { cond: body("while ".len(), " do") };
    }
    if lower == "repeat" || lower == "loop" {
        return LineKind::Repeat;
    }
    if lower.starts_with("for ") {
        let header = body("for ".len(), " do");
        let header = header
            .strip_prefix("each ")
            .or_else(|| header.strip_prefix("all "))
            .unwrap_or(&header)
            .to_string();
        if let Some((var, iter)) = split_keyword(&header, " in ") {
            return LineKind::ForEach { var, iter };
        }
        if let Some((var, range)) = header.split_once(['=', '←']) {
            if let Some((from, to)) = split_keyword(range, " to ") {
                return LineKind::ForRange { var: var.trim().to_string(), from, to };
            }
        }
        return LineKind::ForEach { var: "item".to_string(), iter: header };
    }
    if lower == "return" || lower.starts_with("return ") {
        return LineKind::Return { value: body("return".len(), "") };
    }
    for arrow in ["←", "<-", ":="] {
        if let Some((target, value)) = text.split_once(arrow) {
            return LineKind::Assign {
                target: target.trim().to_string(),
                value: value.trim().to_string(),
            };
        }
    }
    LineKind::Statement
}

fn split_keyword(text: &str, keyword: &str) -> Option<(String, String)> {
    let (left, right) = text.split_once(keyword)?;
    Some((left.trim().to_string(), right.trim().to_string()))
}

/// Strip line number prefix; returns the rest and its indentation width
fn strip_number(raw: &str) -> (&str, usize) {
    let rest = match LINE_NUMBER.find(raw) {
        Some(m) => &raw[m.end()..],
        None => raw,
    };
    let width = rest
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum();
    (rest.trim(), width)
}

/// Transcribe pseudocode into lines with depth
///
/// # Errors
///
/// Fails when the pseudocode is empty, has only headers, or has
/// unbalanced `end` markers.
pub fn parse(pseudocode: &str) -> Result<Vec<Line>, PseudocodeError> {
    if pseudocode.trim().is_empty() {
        return Err(PseudocodeError::Empty);
    }

    let mut lines: Vec<(String, usize, LineKind)> = Vec::new();
    for raw in pseudocode.lines() {
        let (text, width) = strip_number(raw);
        if text.is_empty() || HEADER.is_match(text) {
            continue;
        }
        lines.push((text.to_string(), width, classify_line(text)));
    }
    if lines.is_empty() {
        return Err(PseudocodeError::HeaderOnly);
    }

    if lines.iter().any(|(_, _, kind)| matches!(kind, LineKind::Close { .. })) {
        by_markers(lines)
    } else {
        Ok(by_indentation(lines))
    }
}

fn by_markers(lines: Vec<(String, usize, LineKind)>) -> Result<Vec<Line>, PseudocodeError> {
    let mut depth = 0usize;
    let mut out = Vec::with_capacity(lines.len());
    for (number, (text, _, kind)) in lines.into_iter().enumerate() {
        let line_depth = match &kind {
            LineKind::Close { marker } => {
                depth = depth.checked_sub(1).ok_or_else(|| PseudocodeError::UnexpectedCloser {
                    marker: marker.clone(),
                    line: number + 1,
                })?;
                depth
            }
            LineKind::Else | LineKind::ElseIf { .. } => depth.saturating_sub(1),
            _ => depth,
        };
        if kind.opens_block() {
            depth += 1;
        }
        out.push(Line { text, depth: line_depth, kind });
    }
    if depth > 0 {
        return Err(PseudocodeError::UnclosedBlocks { open: depth });
    }
    Ok(out)
}

fn by_indentation(lines: Vec<(String, usize, LineKind)>) -> Vec<Line> {
    let mut widths: Vec<usize> = Vec::new();
    lines
        .into_iter()
        .map(|(text, width, kind)| {
            while widths.last().is_some_and(|&w| w > width) {
                widths.pop();
            }
            if widths.last().map_or(true, |&w| w < width) {
                widths.push(width);
            }
            Line { text, depth: widths.len() - 1, kind }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numbers_and_headers() {
        let lines = parse("Algorithm 1 Demo\nInput: xs\n\n1: y ← 0\n2. return y").unwrap();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["y ← 0", "return y"]);
    }

    #[test]
    fn depth_from_markers() {
        let lines = parse("for each x in xs do\nif x > 0 then\ns ← s + x\nelse\nskip x\nend if\nend for\nreturn s").unwrap();
        let depths: Vec<usize> = lines.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 2, 1, 0, 0]);
    }

    #[test]
    fn depth_from_indentation() {
        let lines = parse("for x in xs:\n    total <- total + x\n    if x:\n        hit\nreturn total").unwrap();
        let depths: Vec<usize> = lines.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 0]);
    }

    #[test]
    fn unbalanced_markers_are_errors() {
        assert!(matches!(
            parse("x ← 1\nend for\nreturn x"),
            Err(PseudocodeError::UnexpectedCloser { line: 2, .. })
        ));
        assert_eq!(
            parse("while true do\nend while\nif x then\nreturn 1\nend for\nend if"),
            Err(PseudocodeError::UnexpectedCloser { marker: "end if".to_string(), line: 6 })
        );
    }

    #[test]
    fn wrapped_procedure_listing() {
        let lines = parse(
            "procedure Sum(xs)\n  s ← 0\n  for each x in xs do\n    s ← s + x\n  end for\n  return s\nend procedure",
        )
        .unwrap();
        let depths: Vec<usize> = lines.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 1, 1, 0]);
        assert_eq!(
            lines[0].kind,
            LineKind::Procedure { name: "Sum".into(), params: "xs".into() }
        );
        assert_eq!(lines[6].kind, LineKind::Close { marker: "end procedure".into() });
    }

    #[test]
    fn unclosed_procedure_is_an_error() {
        assert_eq!(
            parse("function Max(a, b)\nif a > b then\nreturn a\nend if\nreturn b"),
            Err(PseudocodeError::UnclosedBlocks { open: 1 })
        );
    }

    #[test]
    fn variable_named_end_is_not_a_closer() {
        let lines = parse("start ← 0\nend ← len(xs)\nreturn end - start").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1].kind,
            LineKind::Assign { target: "end".into(), value: "len(xs)".into() }
        );
        assert!(lines.iter().all(|l| l.depth == 0));

        let lines = parse("for i = 1 to n do\nend := i\nend for").unwrap();
        let depths: Vec<usize> = lines.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 1, 0]);
    }

    #[test]
    fn empty_and_header_only() {
        assert_eq!(parse("  \n"), Err(PseudocodeError::Empty));
        assert_eq!(parse("Algorithm 2 Nothing\nRequire: x"), Err(PseudocodeError::HeaderOnly));
    }

    #[test]
    fn classifies_lines() {
        assert_eq!(
            classify_line("for i = 1 to n do"),
            LineKind::ForRange { var: "i".into(), from: "1".into(), to: "n".into() }
        );
        assert_eq!(
            classify_line("for each edge in edges do"),
            LineKind::ForEach { var: "edge".into(), iter: "edges".into() }
        );
        assert_eq!(classify_line("while queue is not empty do"), LineKind::While { cond: "queue is not empty".into() });
        assert_eq!(classify_line("Else If a = b then"), LineKind::ElseIf { cond: "a = b".into() });
        assert_eq!(classify_line("return 42"), LineKind::Return { value: "42".into() });
        assert_eq!(classify_line("x := y"), LineKind::Assign { target: "x".into(), value: "y".into() });
        assert_eq!(classify_line("end while"), LineKind::Close { marker: "end while".into() });
        assert_eq!(classify_line("until done"), LineKind::Close { marker: "until done".into() });
        assert_eq!(
            classify_line("def solve(graph, k):"),
            LineKind::Procedure { name: "solve".into(), params: "graph, k".into() }
        );
        assert_eq!(
            classify_line("Function Init"),
            LineKind::Procedure { name: "Init".into(), params: String::new() }
        );
        assert_eq!(classify_line("push neighbor onto queue"), LineKind::Statement);
    }
}
