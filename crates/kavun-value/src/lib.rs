//! The Kavun runtime data model (spec.md §3): the `Value` tagged union and
//! the frame stack. Lists and dicts are shared-ownership handles so that
//! assigning one name to another aliases the same underlying container,
//! matching spec.md's "assigning a list to another name does not deep-copy"
//! invariant.

mod frame;

pub use frame::{Frame, FrameStack};

use indexmap::IndexMap;
use itertools::Itertools as _;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type List = Rc<RefCell<Vec<Value>>>;
pub type Dict = Rc<RefCell<IndexMap<String, Value>>>;

/// A Kavun runtime value. Integer/Float/Boolean/String/Nil are plain data and
/// clone cheaply (String aside); List/Dict are `Rc<RefCell<_>>` handles so
/// mutation through one alias is visible through every alias of the same
/// container.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    List(List),
    Dict(Dict),
    Nil,
}

impl Value {
    pub fn new_list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn new_dict(pairs: IndexMap<String, Value>) -> Self {
        Value::Dict(Rc::new(RefCell::new(pairs)))
    }

    /// The name used in diagnostics and by `Tanınmayan değişken`-style
    /// messages for "not a list"/"not a dict" type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "tam sayı",
            Value::Float(_) => "ondalık sayı",
            Value::Boolean(_) => "mantıksal değer",
            Value::String(_) => "metin",
            Value::List(_) => "liste",
            Value::Dict(_) => "sözlük",
            Value::Nil => "yok",
        }
    }

    /// Python-style truthiness, since the language this interprets was
    /// originally hosted on `eval()` and conditions flowed straight into a
    /// Python `if`: zero, empty containers/strings and Nil are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::List(list) => !list.borrow().is_empty(),
            Value::Dict(dict) => !dict.borrow().is_empty(),
            Value::Nil => false,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Numeric coercion used by arithmetic and relational operators: both
    /// Integer and Float widen to f64 for mixed-type comparison, while
    /// pure-integer arithmetic stays in i64 (see `kavun-parser`'s evaluator).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Quoted rendering used for nested list/dict elements, so that
    /// printed containers round-trip key/value text (spec.md §6).
    fn repr(&self) -> String {
        match self {
            Value::String(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Value::Boolean(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::String(s) => write!(f, "{s}"),
            Value::List(list) => {
                write!(f, "[{}]", list.borrow().iter().map(Value::repr).format(", "))
            }
            Value::Dict(dict) => {
                write!(
                    f,
                    "{{{}}}",
                    dict.borrow().iter().map(|(k, v)| format!("\"{k}\": {}", v.repr())).format(", ")
                )
            }
            Value::Nil => write!(f, "Nil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_display_keeps_trailing_decimal() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Integer(3).to_string(), "3");
    }

    #[test]
    fn boolean_display_is_capitalized() {
        assert_eq!(Value::Boolean(true).to_string(), "True");
        assert_eq!(Value::Boolean(false).to_string(), "False");
    }

    #[test]
    fn list_aliasing_is_observable_through_both_names() {
        let a = Value::new_list(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        let b = a.clone();
        b.as_list().unwrap().borrow_mut().push(Value::Integer(4));
        assert_eq!(a.to_string(), "[1, 2, 3, 4]");
    }

    #[test]
    fn list_display_quotes_nested_strings() {
        let list = Value::new_list(vec![Value::String("a".into()), Value::Integer(1)]);
        assert_eq!(list.to_string(), "[\"a\", 1]");
    }

    #[test]
    fn truthiness_matches_python_semantics() {
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Integer(1).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::new_list(vec![]).is_truthy());
    }
}
