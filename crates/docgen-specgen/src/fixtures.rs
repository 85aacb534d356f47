//! Verification fixture synthesis
//!
//! Fixtures substitute example values for every input. The expected output
//! is filled in only when the pseudocode is trivially evaluable: its last
//! top-level line is its only `return`, returning a literal or an input
//! that is never reassigned. A `procedure ... end procedure` wrapper is
//! looked through, so its body counts as top level.

use crate::pseudocode::{Line, LineKind};
use crate::types::{IoSpec, VerificationFixture};
use serde_json::{Map, Value};

/// Statically known result of an algorithm
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Evaluation {
    /// Returns a constant
    Literal(Value),
    /// Returns one of its inputs unchanged
    Input(String),
}

impl Evaluation {
    /// Resolve against concrete fixture inputs
    fn resolve(&self, input: &Map<String, Value>) -> Option<Value> {
        match self {
            Evaluation::Literal(value) => Some(value.clone()),
            Evaluation::Input(name) => input.get(name).cloned(),
        }
    }
}

/// Parse a pseudocode literal (`42`, `0.5`, `true`, `"text"`, `'text'`, `[]`, `none`)
#[must_use]
pub fn parse_literal(text: &str) -> Option<Value> {
    let text = text.trim();
    match text.to_ascii_lowercase().as_str() {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "none" | "nil" | "null" | "∅" => return Some(Value::Null),
        _ => {}
    }
    if let Some(inner) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        return Some(Value::from(inner));
    }
    serde_json::from_str(text).ok()
}

/// Lines inside a leading procedure header, with the body's depth
fn procedure_body(lines: &[Line]) -> (&[Line], usize) {
    match lines {
        [head, body @ .., tail]
            if matches!(head.kind, LineKind::Procedure { .. })
                && matches!(tail.kind, LineKind::Close { .. })
                && tail.depth == head.depth =>
        {
            (body, head.depth + 1)
        }
        [head, body @ ..] if matches!(head.kind, LineKind::Procedure { .. }) => (body, head.depth + 1),
        _ => (lines, 0),
    }
}

/// Try to evaluate transcribed pseudocode without running it
#[must_use]
pub(crate) fn evaluate(lines: &[Line], inputs: &[IoSpec]) -> Option<Evaluation> {
    let (lines, top) = procedure_body(lines);
    let mut returns = lines.iter().filter(|l| matches!(l.kind, LineKind::Return { .. }));
    let only = returns.next()?;
    if returns.next().is_some() || only.depth != top || lines.last() != Some(only) {
        return None;
    }
    let LineKind::Return { value } = &only.kind else {
        return None;
    };

    if let Some(literal) = parse_literal(value) {
        return Some(Evaluation::Literal(literal));
    }
    let reassigned = lines
        .iter()
        .any(|l| matches!(&l.kind, LineKind::Assign { target, .. } if target == value));
    inputs
        .iter()
        .find(|io| io.name == *value && !reassigned)
        .map(|io| Evaluation::Input(io.name.clone()))
}

/// Build one fixture from per-input values
#[must_use]
pub(crate) fn fixture(
    id: impl Into<String>,
    description: impl Into<String>,
    inputs: &[IoSpec],
    value_of: impl Fn(&IoSpec) -> Value,
    evaluation: Option<&Evaluation>,
) -> VerificationFixture {
    let input: Map<String, Value> = inputs
        .iter()
        .map(|io| (io.name.clone(), value_of(io)))
        .collect();
    let expected_output = evaluation.and_then(|e| e.resolve(&input));
    VerificationFixture {
        id: id.into(),
        requires_expected_output: expected_output.is_none(),
        expected_output,
        input,
        description: description.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pseudocode::parse;
    use crate::types::ValueType;

    fn io(name: &str, value_type: ValueType) -> IoSpec {
        IoSpec {
            name: name.to_string(),
            value_type,
            description: String::new(),
            example: value_type.example(),
        }
    }

    #[test]
    fn literals() {
        assert_eq!(parse_literal("42"), Some(Value::from(42)));
        assert_eq!(parse_literal("0.25"), Some(Value::from(0.25)));
        assert_eq!(parse_literal("True"), Some(Value::Bool(true)));
        assert_eq!(parse_literal("'abc'"), Some(Value::from("abc")));
        assert_eq!(parse_literal("\"abc\""), Some(Value::from("abc")));
        assert_eq!(parse_literal("[]"), Some(Value::Array(Vec::new())));
        assert_eq!(parse_literal("path"), None);
    }

    #[test]
    fn single_literal_return_is_evaluable() {
        let lines = parse("ignore question\nreturn 42").unwrap();
        assert_eq!(evaluate(&lines, &[]), Some(Evaluation::Literal(Value::from(42))));
    }

    #[test]
    fn returning_untouched_input_is_evaluable() {
        let inputs = [io("xs", ValueType::List)];
        let lines = parse("log xs\nreturn xs").unwrap();
        assert_eq!(evaluate(&lines, &inputs), Some(Evaluation::Input("xs".into())));

        let lines = parse("xs ← sort xs\nreturn xs").unwrap();
        assert_eq!(evaluate(&lines, &inputs), None);
    }

    #[test]
    fn procedure_wrapper_is_looked_through() {
        let lines = parse("procedure Answer()\n  return 42\nend procedure").unwrap();
        assert_eq!(evaluate(&lines, &[]), Some(Evaluation::Literal(Value::from(42))));

        let inputs = [io("xs", ValueType::List)];
        let lines = parse("def identity(xs):\n    return xs").unwrap();
        assert_eq!(evaluate(&lines, &inputs), Some(Evaluation::Input("xs".into())));

        let lines = parse("procedure Sum(xs)\n  s ← 0\n  for each x in xs do\n    s ← s + x\n  end for\n  return s\nend procedure")
            .unwrap();
        assert_eq!(evaluate(&lines, &inputs), None);
    }

    #[test]
    fn branching_returns_are_not_evaluable() {
        let lines = parse("if x then\nreturn 0\nend if\nreturn 1").unwrap();
        assert_eq!(evaluate(&lines, &[]), None);
        let lines = parse("if x then\nreturn 0\nend if\nlog x").unwrap();
        assert_eq!(evaluate(&lines, &[]), None);
    }

    #[test]
    fn fixture_resolves_input_evaluation() {
        let inputs = [io("n", ValueType::Integer)];
        let eval = Evaluation::Input("n".into());
        let fx = fixture("f", "d", &inputs, |io| io.value_type.boundary(), Some(&eval));
        assert_eq!(fx.expected_output, Some(Value::from(0)));
        assert!(!fx.requires_expected_output);

        let fx = fixture("f", "d", &inputs, |io| io.example.clone(), None);
        assert!(fx.requires_expected_output);
        assert_eq!(fx.input.get("n"), Some(&Value::from(3)));
    }
}
