//! Signature typing
//!
//! Algorithm inputs/outputs are plain strings, optionally annotated as
//! `name: type` or `name (type)`. Unannotated entries get a type guessed
//! from the name.

use crate::types::ValueType;
use docgen_paper::signature_name;

const INTEGER_NAMES: &[&str] = &[
    "n", "m", "k", "i", "j", "t", "count", "size", "length", "len", "index", "idx", "depth",
    "iterations", "steps", "epochs", "rounds", "limit",
];

const FLOAT_NAMES: &[&str] = &[
    "rate", "alpha", "beta", "gamma", "lambda", "epsilon", "eps", "threshold", "weight",
    "score", "probability", "prob", "temperature", "tolerance", "ratio", "cost", "distance",
    "learning_rate", "momentum",
];

const STRING_NAMES: &[&str] = &[
    "text", "name", "label", "query", "id", "key", "title", "word", "token", "prefix",
    "suffix", "source", "target", "message", "path_name",
];

const MAP_NAMES: &[&str] = &["map", "dict", "dictionary", "mapping", "graph", "table", "lookup"];

const LIST_NAMES: &[&str] = &["list", "array", "sequence", "vector", "vec", "items", "queue"];

/// Split a signature entry into its name and type
#[must_use]
pub fn parse_signature(entry: &str) -> (String, ValueType) {
    let name = signature_name(entry).to_string();
    let value_type = annotation(entry)
        .and_then(parse_annotation)
        .unwrap_or_else(|| infer_from_name(&name));
    (name, value_type)
}

/// Type annotation text of an entry, if any
fn annotation(entry: &str) -> Option<&str> {
    let start = entry.find([':', '('])?;
    let rest = entry[start + 1..].trim_end_matches(')').trim();
    (!rest.is_empty()).then_some(rest)
}

/// Map an annotation (`int`, `List[float]`, `string[]`, ...) to a type
#[must_use]
pub fn parse_annotation(annotation: &str) -> Option<ValueType> {
    let lower = annotation.trim().to_ascii_lowercase();
    if lower.ends_with("[]") {
        return Some(ValueType::List);
    }
    let head = lower
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .next()
        .unwrap_or_default();
    let value_type = match head {
        "int" | "integer" | "long" | "usize" | "isize" | "i32" | "i64" | "u32" | "u64" | "nat" => {
            ValueType::Integer
        }
        "float" | "double" | "real" | "number" | "f32" | "f64" | "decimal" => ValueType::Float,
        "bool" | "boolean" => ValueType::Boolean,
        "str" | "string" | "text" | "char" => ValueType::String,
        "list" | "array" | "vec" | "sequence" | "set" | "tuple" | "matrix" | "vector" => {
            ValueType::List
        }
        "map" | "dict" | "dictionary" | "hashmap" | "object" | "record" => ValueType::Map,
        _ => return None,
    };
    Some(value_type)
}

/// Guess a type from an input/output name
#[must_use]
pub fn infer_from_name(name: &str) -> ValueType {
    let lower = name.trim().to_ascii_lowercase();
    let last = lower.rsplit('_').next().unwrap_or(lower.as_str());

    if lower.starts_with("is_") || lower.starts_with("has_") || lower.starts_with("should_") {
        ValueType::Boolean
    } else if INTEGER_NAMES.contains(&lower.as_str())
        || lower.starts_with("num_")
        || lower.ends_with("_count")
    {
        ValueType::Integer
    } else if FLOAT_NAMES.contains(&lower.as_str()) || FLOAT_NAMES.contains(&last) {
        ValueType::Float
    } else if MAP_NAMES.contains(&lower.as_str()) || lower.ends_with("_map") || lower.ends_with("_dict") {
        ValueType::Map
    } else if STRING_NAMES.contains(&lower.as_str()) || lower.ends_with("_name") {
        ValueType::String
    } else if LIST_NAMES.contains(&last) || is_plural(&lower) {
        ValueType::List
    } else {
        ValueType::Unknown
    }
}

fn is_plural(word: &str) -> bool {
    word.len() > 2 && word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_wins_over_name() {
        assert_eq!(parse_signature("n: string"), ("n".to_string(), ValueType::String));
        assert_eq!(parse_signature("weights (List[float])").1, ValueType::List);
        assert_eq!(parse_signature("ids: int[]").1, ValueType::List);
    }

    #[test]
    fn unknown_annotation_falls_back_to_name() {
        assert_eq!(parse_signature("k: Foo").1, ValueType::Integer);
    }

    #[test]
    fn name_heuristics() {
        assert_eq!(infer_from_name("n"), ValueType::Integer);
        assert_eq!(infer_from_name("num_nodes"), ValueType::Integer);
        assert_eq!(infer_from_name("learning_rate"), ValueType::Float);
        assert_eq!(infer_from_name("alpha"), ValueType::Float);
        assert_eq!(infer_from_name("is_sorted"), ValueType::Boolean);
        assert_eq!(infer_from_name("edges"), ValueType::List);
        assert_eq!(infer_from_name("node_list"), ValueType::List);
        assert_eq!(infer_from_name("word_map"), ValueType::Map);
        assert_eq!(infer_from_name("label"), ValueType::String);
        assert_eq!(infer_from_name("input1"), ValueType::Unknown);
        assert_eq!(infer_from_name("status"), ValueType::Unknown);
    }
}
