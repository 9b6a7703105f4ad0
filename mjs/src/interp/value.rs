//! Runtime values and equality

use super::env::EnvRef;
use crate::ast::{Spanned, Stmt};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shared mutable property map backing an object value
pub type ObjRef = Rc<RefCell<HashMap<String, Value>>>;

/// A user function value. Captures the environment at its definition site,
/// so calls resolve free names lexically rather than through the caller.
#[derive(Clone)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Vec<Spanned<Stmt>>,
    pub env: EnvRef,
}

// The captured environment can hold the function itself (any recursive
// function does), so Debug must not walk it.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Runtime value
///
/// `Undefined` and `Null` are distinct singletons: a binding that exists but
/// was never assigned holds `Undefined`; `Null` is a value a script assigns
/// on purpose. They are never strict-equal and loose-equal only each other.
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    /// 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    Bool(bool),
    Str(Rc<String>),
    /// Object reference; clones alias the same property map
    Object(ObjRef),
    Function(Rc<Function>),
}

impl Value {
    /// Build an empty object value
    pub fn new_object() -> Self {
        Value::Object(Rc::new(RefCell::new(HashMap::new())))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(Rc::new(s.into()))
    }

    /// Check if value is truthy (if/while conditions)
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// The `typeof`-style tag for this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Int(_) | Value::Float(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Property read. Undefined for a missing property or a non-object
    /// receiver; never an error.
    pub fn get_property(&self, name: &str) -> Value {
        match self {
            Value::Object(props) => props
                .borrow()
                .get(name)
                .cloned()
                .unwrap_or(Value::Undefined),
            _ => Value::Undefined,
        }
    }

    /// Property write. Returns false (and does nothing) for a non-object
    /// receiver, mirroring the permissive read path.
    pub fn set_property(&self, name: impl Into<String>, value: Value) -> bool {
        match self {
            Value::Object(props) => {
                props.borrow_mut().insert(name.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Numeric view used by loose comparison. Undefined deliberately has
    /// none: it compares equal only to itself and null.
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Display form, also the stringification hook for host print/concat
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

/// Loose (`==`) comparison.
///
/// Undefined and null equal each other and themselves, and nothing else.
/// Numeric pairs (int/float/bool) compare numerically; objects and functions
/// compare by reference identity; remaining pairs compare by string form.
/// Total: every pair has a defined result, no coercion ever errors.
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Object(x), Value::Object(y)) => Rc::ptr_eq(x, y),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Object(_) | Value::Function(_), _) | (_, Value::Object(_) | Value::Function(_)) => {
            false
        }
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x == y,
            _ => a.to_string() == b.to_string(),
        },
    }
}

/// Strict (`===`) comparison: same variant kind, then loose-equal.
/// Int and Float are distinct kinds, so `1 === 1.0` is false.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b) && loose_equals(a, b)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Object(props) => {
                // sorted for deterministic output
                let props = props.borrow();
                let mut names: Vec<&String> = props.keys().collect();
                names.sort();
                write!(f, "{{ ")?;
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, props[*name])?;
                }
                write!(f, " }}")
            }
            Value::Function(func) => {
                write!(f, "function({})", func.params.join(", "))
            }
        }
    }
}

/// Structural equality for primitives, identity for objects and functions.
/// This is Rust-side test plumbing; script-level `==`/`===` go through
/// [`loose_equals`] and [`strict_equals`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_vs_null_strict() {
        assert!(!strict_equals(&Value::Undefined, &Value::Null));
        assert!(!strict_equals(&Value::Null, &Value::Undefined));
        assert!(strict_equals(&Value::Undefined, &Value::Undefined));
        assert!(strict_equals(&Value::Null, &Value::Null));
    }

    #[test]
    fn test_undefined_vs_null_loose() {
        assert!(loose_equals(&Value::Undefined, &Value::Null));
        assert!(loose_equals(&Value::Null, &Value::Undefined));
        assert!(loose_equals(&Value::Undefined, &Value::Undefined));
        assert!(loose_equals(&Value::Null, &Value::Null));
    }

    #[test]
    fn test_undefined_never_equals_concrete() {
        for v in [
            Value::Int(0),
            Value::Float(0.0),
            Value::Bool(false),
            Value::str(""),
            Value::new_object(),
        ] {
            assert!(!loose_equals(&Value::Undefined, &v), "undefined == {v:?}");
            assert!(!loose_equals(&v, &Value::Null), "{v:?} == null");
            assert!(!strict_equals(&Value::Undefined, &v));
        }
    }

    #[test]
    fn test_numeric_loose_coercion() {
        assert!(loose_equals(&Value::Int(1), &Value::Float(1.0)));
        assert!(loose_equals(&Value::Bool(true), &Value::Int(1)));
        assert!(loose_equals(&Value::Bool(false), &Value::Float(0.0)));
        assert!(!loose_equals(&Value::Int(1), &Value::Int(2)));
    }

    #[test]
    fn test_string_number_loose_compares_string_forms() {
        assert!(loose_equals(&Value::str("5"), &Value::Int(5)));
        assert!(!loose_equals(&Value::str("5.0"), &Value::Int(5)));
    }

    #[test]
    fn test_strict_requires_same_kind() {
        assert!(!strict_equals(&Value::Int(1), &Value::Float(1.0)));
        assert!(!strict_equals(&Value::str("5"), &Value::Int(5)));
        assert!(strict_equals(&Value::Int(3), &Value::Int(3)));
        assert!(strict_equals(&Value::str("a"), &Value::str("a")));
    }

    #[test]
    fn test_object_identity() {
        let a = Value::new_object();
        let b = a.clone();
        let c = Value::new_object();
        assert!(loose_equals(&a, &b));
        assert!(strict_equals(&a, &b));
        assert!(!loose_equals(&a, &c));
    }

    #[test]
    fn test_equality_symmetry() {
        let values = [
            Value::Undefined,
            Value::Null,
            Value::Int(0),
            Value::Float(0.5),
            Value::Bool(true),
            Value::str("x"),
            Value::new_object(),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(loose_equals(a, b), loose_equals(b, a));
                assert_eq!(strict_equals(a, b), strict_equals(b, a));
            }
        }
    }

    #[test]
    fn test_display_undefined_and_null() {
        insta::assert_snapshot!(Value::Undefined.to_display_string(), @"undefined");
        insta::assert_snapshot!(Value::Null.to_display_string(), @"null");
    }

    #[test]
    fn test_display_primitives() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::str("Hello!").to_string(), "Hello!");
    }

    #[test]
    fn test_display_object_sorted() {
        let obj = Value::new_object();
        obj.set_property("b", Value::Int(2));
        obj.set_property("a", Value::Int(1));
        insta::assert_snapshot!(obj.to_string(), @"{ a: 1, b: 2 }");
    }

    #[test]
    fn test_get_property_missing_is_undefined() {
        let obj = Value::new_object();
        assert_eq!(obj.get_property("myProp"), Value::Undefined);
        assert_eq!(obj.get_property("myProp").to_display_string(), "undefined");
    }

    #[test]
    fn test_get_property_on_non_object_is_undefined() {
        assert_eq!(Value::Int(1).get_property("x"), Value::Undefined);
        assert_eq!(Value::Null.get_property("x"), Value::Undefined);
    }

    #[test]
    fn test_set_property_aliases() {
        let a = Value::new_object();
        let b = a.clone();
        assert!(a.set_property("n", Value::Int(9)));
        assert_eq!(b.get_property("n"), Value::Int(9));
        assert!(!Value::Int(1).set_property("n", Value::Null));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Int(1).type_name(), "number");
        assert_eq!(Value::Float(1.0).type_name(), "number");
        assert_eq!(Value::Bool(false).type_name(), "boolean");
        assert_eq!(Value::str("").type_name(), "string");
        assert_eq!(Value::new_object().type_name(), "object");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(Value::str("a").is_truthy());
        assert!(Value::new_object().is_truthy());
    }
}
