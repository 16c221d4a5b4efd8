//! Dotted get/set over nested specs.
//!
//! Reads walk nested mappings and fail with `KeyNotFound` on the first missing
//! segment. Writes create missing intermediate mappings and refuse to descend
//! through a scalar or sequence.

use serde_json::{Map, Number, Value};

use super::key_path::KeyPath;
use super::spec::{SpecSource, SpecTarget};
use crate::error::{DatError, Result};

/// Value at `key`, or the mapping itself when `key` names a non-leaf node.
pub fn get<'a, S, K>(source: &'a S, key: K) -> Result<&'a Value>
where
    S: SpecSource + ?Sized,
    K: Into<KeyPath>,
{
    let key = key.into();
    lookup(source, &key).ok_or_else(|| DatError::KeyNotFound {
        key: key.to_string(),
    })
}

/// Like [`get`], returning `default` when any segment is missing.
pub fn get_or<'a, S, K>(source: &'a S, key: K, default: &'a Value) -> &'a Value
where
    S: SpecSource + ?Sized,
    K: Into<KeyPath>,
{
    lookup(source, &key.into()).unwrap_or(default)
}

/// One value per requested key, in request order.
pub fn gets<'a, S, I>(source: &'a S, keys: I) -> Result<Vec<&'a Value>>
where
    S: SpecSource + ?Sized,
    I: IntoIterator,
    I::Item: Into<KeyPath>,
{
    keys.into_iter().map(|key| get(source, key)).collect()
}

/// Write `value` at `key`, creating intermediate mappings as needed.
pub fn set<T, K>(target: &mut T, key: K, value: Value) -> Result<()>
where
    T: SpecTarget + ?Sized,
    K: Into<KeyPath>,
{
    let key = key.into();
    let conflict = |depth: usize| DatError::TypeConflict {
        key: key.segments()[..=depth].join("."),
    };
    let degenerate = || DatError::TypeConflict {
        key: key.to_string(),
    };
    if key.is_degenerate() {
        return Err(degenerate());
    }
    let Some((leaf, parents)) = key.segments().split_last() else {
        return Err(degenerate());
    };

    let mut map = target.spec_mut();
    for (depth, segment) in parents.iter().enumerate() {
        let slot = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        map = match slot {
            Value::Object(inner) => inner,
            _ => return Err(conflict(depth)),
        };
    }
    map.insert(leaf.clone(), value);
    Ok(())
}

/// Apply `dotted.path = literal` assignments in order.
///
/// Literals are coerced to an integer, then a float, then kept as a string.
pub fn sets<T, I>(target: &mut T, assignments: I) -> Result<()>
where
    T: SpecTarget + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment.as_ref())?;
        set(target, key, value)?;
    }
    Ok(())
}

/// Split `dotted.path = literal` into its key path and coerced value.
pub fn parse_assignment(text: &str) -> Result<(KeyPath, Value)> {
    let invalid = || DatError::InvalidAssignment {
        text: text.to_string(),
    };
    let (key, literal) = text.split_once('=').ok_or_else(invalid)?;
    let key = KeyPath::parse(key.trim());
    if key.is_degenerate() {
        return Err(invalid());
    }
    Ok((key, parse_literal(literal.trim())))
}

/// Coerce a literal with descending specificity: integer, float, string.
pub fn parse_literal(literal: &str) -> Value {
    if let Ok(int) = literal.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(uint) = literal.parse::<u64>() {
        return Value::Number(uint.into());
    }
    // `inf` and `NaN` parse as f64 but have no JSON representation.
    if let Some(float) = literal.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(float);
    }
    Value::String(literal.to_string())
}

fn lookup<'a, S>(source: &'a S, key: &KeyPath) -> Option<&'a Value>
where
    S: SpecSource + ?Sized,
{
    let (first, rest) = key.segments().split_first()?;
    let mut current = source.spec().get(first)?;
    for segment in rest {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spec::Spec;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn spec1() -> Spec {
        json!({
            "main": {
                "path": "test_dats/{YY}-{MM} Dats{unique}",
                "my_key1": "my_val1",
                "my_key2": "my_val2"
            }
        })
        .as_object()
        .cloned()
        .expect("object")
    }

    #[test]
    fn get_accepts_dotted_and_list_keys() {
        let spec = spec1();
        assert_eq!(get(&spec, ["main", "my_key1"]).expect("get"), "my_val1");
        assert_eq!(get(&spec, "main.my_key1").expect("get"), "my_val1");
        assert_eq!(get(&spec, "main").expect("get"), &spec["main"]);
    }

    #[test]
    fn get_missing_is_not_found_unless_defaulted() {
        let spec = spec1();
        let err = get(&spec, "main.nope").expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = get(&spec, "main.my_key1.deeper").expect_err("through leaf");
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let fallback = json!("fallback");
        assert_eq!(get_or(&spec, "main.nope", &fallback), "fallback");
        assert_eq!(get_or(&spec, "main.my_key2", &fallback), "my_val2");
    }

    #[test]
    fn set_overwrites_and_get_reads_back() {
        let mut spec = spec1();
        set(&mut spec, ["main", "foo"], json!("bar")).expect("set");
        assert_eq!(get(&spec, ["main", "foo"]).expect("get"), "bar");
        set(&mut spec, "main.foo", json!("baz")).expect("set");
        assert_eq!(get(&spec, "main.foo").expect("get"), "baz");

        set(&mut spec, ["key1"], json!("value1")).expect("set");
        set(&mut spec, "key1", json!("value2")).expect("set");
        assert_eq!(get(&spec, "key1").expect("get"), "value2");
    }

    #[test]
    fn deep_set_creates_empty_intermediate_mappings() {
        let mut spec = Spec::new();
        set(&mut spec, ["level1", "level2", "level3", "lev4"], json!("val")).expect("set");
        assert_eq!(get(&spec, "level1.level2.level3.lev4").expect("get"), "val");
        assert!(get(&spec, "level1.level2").expect("get").is_object());
        assert_eq!(
            Value::Object(spec),
            json!({"level1": {"level2": {"level3": {"lev4": "val"}}}})
        );
    }

    #[test]
    fn set_through_scalar_is_type_conflict() {
        let mut spec = spec1();
        let err = set(&mut spec, "main.my_key1.sub", json!(1)).expect_err("conflict");
        assert_eq!(err.kind(), ErrorKind::TypeConflict);
        assert_eq!(err.to_string(), "cannot descend into main.my_key1: holds a non-mapping value");
        assert_eq!(get(&spec, "main.my_key1").expect("untouched"), "my_val1");
    }

    #[test]
    fn gets_preserves_request_order() {
        let spec = spec1();
        let values = gets(&spec, ["main.my_key2", "main.my_key1", "main"]).expect("gets");
        assert_eq!(values, vec![&json!("my_val2"), &json!("my_val1"), &spec["main"]]);
        assert!(gets(&spec, ["main.my_key1", "missing"]).is_err());
    }

    #[test]
    fn sets_coerces_literals() {
        let mut spec = spec1();
        sets(&mut spec, ["main.foo = bar", "bip.bop.boop=2.75", "bip.zip=7"]).expect("sets");
        let values = gets(&spec, ["main.foo", "bip.bop.boop", "bip.zip"]).expect("gets");
        assert_eq!(values, vec![&json!("bar"), &json!(2.75), &json!(7)]);
        assert!(values[2].is_i64());
        assert!(values[1].is_f64());
    }

    #[test]
    fn later_assignments_win() {
        let mut spec = Spec::new();
        sets(&mut spec, ["a.b=1", "a.b = two"]).expect("sets");
        assert_eq!(get(&spec, "a.b").expect("get"), "two");
    }

    #[test]
    fn assignment_without_equals_is_rejected() {
        let mut spec = Spec::new();
        let err = sets(&mut spec, ["a.b"]).expect_err("no equals");
        assert_eq!(err.kind(), ErrorKind::InvalidAssignment);
        let err = parse_assignment(" = 3").expect_err("empty key");
        assert_eq!(err.kind(), ErrorKind::InvalidAssignment);
    }

    #[test]
    fn literal_coercion_order() {
        assert_eq!(parse_literal("-12"), json!(-12));
        assert_eq!(parse_literal("18446744073709551615"), json!(u64::MAX));
        assert_eq!(parse_literal("1e3"), json!(1000.0));
        assert_eq!(parse_literal("NaN"), json!("NaN"));
        assert_eq!(parse_literal(""), json!(""));
        assert_eq!(parse_literal("a b"), json!("a b"));
    }
}
