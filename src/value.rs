use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::class::{LoxClass, LoxInstance};
use crate::error::RuntimeError;
use crate::function::LoxFunction;
use crate::interpreter::Interpreter;
use crate::native::{NativeArray, NativeFunction};
use crate::token::Token;

/// A runtime value.  Scalars are stored inline; every object kind is behind an
/// `Rc` so closures, bound methods and variables can share it.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Rc<LoxFunction>),
    NativeFunction(Rc<NativeFunction>),
    Class(Rc<LoxClass>),
    Instance(Rc<RefCell<LoxInstance>>),
    Array(Rc<RefCell<NativeArray>>),
}

impl Value {
    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The callable capability of this value, if it has one.
    pub fn as_callable(&self) -> Option<Callable> {
        match self {
            Value::Function(f) => Some(Callable::Function(f.clone())),
            Value::NativeFunction(f) => Some(Callable::Native(f.clone())),
            Value::Class(c) => Some(Callable::Class(c.clone())),
            _ => None,
        }
    }
}

/// Scalars compare by value with no coercion between types; objects compare
/// by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::String(s) => write!(f, "{}", s),

            Value::Function(func) => write!(f, "{}", func),

            Value::NativeFunction(native) => write!(f, "{}", native),

            Value::Class(class) => write!(f, "{}", class),

            Value::Instance(instance) => write!(f, "{}", instance.borrow()),

            Value::Array(_) => write!(f, "<native array>"),
        }
    }
}

/// The closed set of things a call expression can invoke.
#[derive(Debug, Clone)]
pub enum Callable {
    Function(Rc<LoxFunction>),
    Native(Rc<NativeFunction>),
    Class(Rc<LoxClass>),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Function(f) => f.arity(),
            Callable::Native(f) => f.arity(),
            Callable::Class(c) => c.arity(),
        }
    }

    /// Whether a call must pass exactly [`arity`](Self::arity) arguments.
    /// A class without an initializer accepts (and ignores) any arguments.
    pub fn checks_arity(&self) -> bool {
        match self {
            Callable::Class(c) => c.find_method(LoxClass::INITIALIZER).is_some(),
            _ => true,
        }
    }

    /// Invoke with already-evaluated arguments.  `paren` is the call site's
    /// closing parenthesis, used to attribute native failures.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match self {
            Callable::Function(f) => f.call(interpreter, arguments),
            Callable::Native(f) => f.call(&arguments).map_err(|message| RuntimeError::Native {
                token: paren.clone(),
                message,
            }),
            Callable::Class(c) => LoxClass::instantiate(c, interpreter, arguments),
        }
    }
}
