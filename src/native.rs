//! Native capabilities exposed to Lox programs as globals.
//!
//! * `clock()` ‑ seconds since the Unix epoch.
//! * `builtin_array(n)` ‑ a fixed‑size array of `n` `nil` slots exposing
//!   `length`, `get(index)` and `set(index, value)`.  The prelude's `Array`
//!   class is written on top of it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// Signature shared by every native: the receiver (for bound array methods)
/// comes first, followed by the call arguments.
pub type NativeFn = fn(&[Value]) -> Result<Value, String>;

pub struct NativeFunction {
    name: &'static str,
    arity: usize,
    func: NativeFn,
    receiver: Option<Value>,
}

impl NativeFunction {
    pub fn new(name: &'static str, arity: usize, func: NativeFn) -> Self {
        Self {
            name,
            arity,
            func,
            receiver: None,
        }
    }

    fn bound(name: &'static str, arity: usize, func: NativeFn, receiver: Value) -> Self {
        Self {
            name,
            arity,
            func,
            receiver: Some(receiver),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, arguments: &[Value]) -> Result<Value, String> {
        debug!("Calling native function '{}'", self.name);

        match &self.receiver {
            Some(receiver) => {
                let mut all: Vec<Value> = Vec::with_capacity(arguments.len() + 1);
                all.push(receiver.clone());
                all.extend_from_slice(arguments);
                (self.func)(&all)
            }
            None => (self.func)(arguments),
        }
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("bound", &self.receiver.is_some())
            .finish()
    }
}

/// Register every native under its global name.
pub fn define_globals(globals: &mut Environment) {
    info!("Defining native functions");

    globals.define(
        "clock",
        Value::NativeFunction(Rc::new(NativeFunction::new("clock", 0, clock))),
    );
    globals.define(
        "builtin_array",
        Value::NativeFunction(Rc::new(NativeFunction::new(
            "builtin_array",
            1,
            builtin_array,
        ))),
    );
}

fn clock(_args: &[Value]) -> Result<Value, String> {
    let millis = Utc::now().timestamp_millis();
    Ok(Value::Number(millis as f64 / 1000.0))
}

/// Largest length `builtin_array` accepts.
pub const MAX_ARRAY_LENGTH: usize = 1 << 24;

fn builtin_array(args: &[Value]) -> Result<Value, String> {
    let length = match args.first() {
        Some(Value::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => *n,
        _ => return Err("Array length must be a non-negative integer.".to_string()),
    };

    // compared as f64 so lengths beyond usize never reach the cast
    if length > MAX_ARRAY_LENGTH as f64 {
        return Err("Array length too large.".to_string());
    }

    debug!("Allocating native array of {} slot(s)", length);

    let array = NativeArray::new(length as usize)?;
    Ok(Value::Array(Rc::new(RefCell::new(array))))
}

/// Fixed‑size storage backing `builtin_array`.
pub struct NativeArray {
    slots: Vec<Value>,
}

impl NativeArray {
    /// `length` nil slots, or an error if the allocation is refused.
    pub fn new(length: usize) -> Result<Self, String> {
        let mut slots: Vec<Value> = Vec::new();
        slots
            .try_reserve_exact(length)
            .map_err(|_| "Array length too large.".to_string())?;
        slots.resize(length, Value::Nil);

        Ok(Self { slots })
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn index(&self, value: &Value) -> Result<usize, String> {
        match value {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && (*n as usize) < self.len() => {
                Ok(*n as usize)
            }
            Value::Number(_) => Err("Array index out of bounds.".to_string()),
            _ => Err("Array index must be a number.".to_string()),
        }
    }

    /// Property access on an array value: `length`, or one of the bound
    /// methods `get` / `set`.
    pub fn get_property(
        array: &Rc<RefCell<NativeArray>>,
        name: &Token,
    ) -> Result<Value, RuntimeError> {
        let receiver = Value::Array(array.clone());

        match name.lexeme.as_str() {
            "length" => Ok(Value::Number(array.borrow().len() as f64)),
            "get" => Ok(Value::NativeFunction(Rc::new(NativeFunction::bound(
                "get", 1, array_get, receiver,
            )))),
            "set" => Ok(Value::NativeFunction(Rc::new(NativeFunction::bound(
                "set", 2, array_set, receiver,
            )))),
            _ => Err(RuntimeError::UndefinedProperty { name: name.clone() }),
        }
    }
}

// A slot may hold the array itself.
impl fmt::Debug for NativeArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeArray")
            .field("length", &self.slots.len())
            .finish()
    }
}

fn receiver(args: &[Value]) -> Result<Rc<RefCell<NativeArray>>, String> {
    match args.first() {
        Some(Value::Array(array)) => Ok(array.clone()),
        _ => Err("Array method called without an array receiver.".to_string()),
    }
}

fn array_get(args: &[Value]) -> Result<Value, String> {
    let array = receiver(args)?;
    let array = array.borrow();
    let index = array.index(args.get(1).unwrap_or(&Value::Nil))?;

    Ok(array.slots[index].clone())
}

fn array_set(args: &[Value]) -> Result<Value, String> {
    let array = receiver(args)?;
    let mut array = array.borrow_mut();
    let index = array.index(args.get(1).unwrap_or(&Value::Nil))?;

    array.slots[index] = args.get(2).cloned().unwrap_or(Value::Nil);

    Ok(Value::Nil)
}
