//! This module defines `RawValue`, the dynamically shaped argument value a
//! host hands to the capture engine.
//!
//! Containers are reference-counted with interior mutability so an argument
//! graph can contain cycles and shared substructure; the normalizer uses
//! `Rc` pointer identity to detect revisits.
use std::cell::RefCell;
use std::rc::Rc;

/// Error-shaped value: anything carrying a name, a message, and optionally a
/// stack trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorValue {
    /// Creates a new `ErrorValue` without a stack trace.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Attaches a stack trace.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// An arbitrary runtime value as delivered by the host logging surface.
///
/// This is a closed variant over every shape the engine accepts, including
/// the non-JSON ones (`Undefined`, `BigInt`, `Symbol`, `Function`, `Error`)
/// that the normalizer later replaces with textual fallbacks.
#[derive(Debug, Clone)]
pub enum RawValue {
    Null,
    Undefined,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    /// Arbitrary-precision integer, kept as its decimal digit string.
    BigInt(String),
    /// A symbol's descriptive form, e.g. `Symbol(token)`.
    Symbol(String),
    /// A function-like value, carrying its name if it has one.
    Function(Option<String>),
    Error(ErrorValue),
    List(Rc<RefCell<Vec<RawValue>>>),
    Map(Rc<RefCell<Vec<(String, RawValue)>>>),
}

impl RawValue {
    /// Creates an empty, shared list container.
    pub fn empty_list() -> Self {
        RawValue::List(Rc::new(RefCell::new(Vec::new())))
    }

    /// Creates a list from owned items.
    pub fn list(items: Vec<RawValue>) -> Self {
        RawValue::List(Rc::new(RefCell::new(items)))
    }

    /// Creates an empty, shared map container.
    pub fn empty_map() -> Self {
        RawValue::Map(Rc::new(RefCell::new(Vec::new())))
    }

    /// Creates a map from owned key/value pairs, preserving order.
    pub fn map(pairs: Vec<(&str, RawValue)>) -> Self {
        RawValue::Map(Rc::new(RefCell::new(
            pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )))
    }

    /// The identity of a container value, used for cycle detection.
    ///
    /// Non-container values have no identity: revisiting them is harmless.
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            RawValue::List(items) => Some(Rc::as_ptr(items) as usize),
            RawValue::Map(pairs) => Some(Rc::as_ptr(pairs) as usize),
            _ => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(serde_json::Number::from(value))
    }
}

impl From<u64> for RawValue {
    fn from(value: u64) -> Self {
        RawValue::Number(serde_json::Number::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        // Non-finite floats have no JSON representation; stringify them the
        // way a host console would render them.
        match serde_json::Number::from_f64(value) {
            Some(number) => RawValue::Number(number),
            None => RawValue::Text(value.to_string()),
        }
    }
}
