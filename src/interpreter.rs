use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, ExprKind, FunctionDecl, LiteralValue, Stmt};
use crate::class::{LoxClass, LoxInstance};
use crate::environment::{Environment, SharedEnv};
use crate::error::RuntimeError;
use crate::function::LoxFunction;
use crate::native::{self, NativeArray};
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Nested calls allowed before a program is stopped with "Stack overflow.".
pub const MAX_CALL_DEPTH: usize = 1024;

// Native stack kept free before a call, and how much to add when it runs low.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Convenient alias for interpreter results.
pub type IResult<T> = Result<T, RuntimeError>;

/// How a statement finished.  `return` unwinds through blocks and loops as
/// `Flow::Return` until the enclosing call consumes it; it never travels on
/// the error channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: SharedEnv,
    environment: SharedEnv,
    /// Resolver output: binding depth per variable occurrence.  Occurrences
    /// without an entry are globals.
    locals: HashMap<ExprId, usize>,
    call_depth: usize,
    out: Box<dyn Write>,
}

impl Interpreter {
    /// Creates an interpreter printing to stdout, with the native functions
    /// defined as globals.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates an interpreter whose `print` statements write to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals = Environment::new().shared();
        native::define_globals(&mut globals.borrow_mut());

        Self {
            environment: globals.clone(),
            globals,
            locals: HashMap::new(),
            call_depth: 0,
            out,
        }
    }

    pub fn globals(&self) -> &SharedEnv {
        &self.globals
    }

    /// Called by the resolver for every local variable occurrence.
    pub fn note_local(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// The depth recorded for `id`, or `None` for a global.
    pub fn resolved_depth(&self, id: ExprId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    /// Interprets a list of statements (a "program").  The first runtime
    /// error stops the remaining statements.
    pub fn interpret(&mut self, statements: &[Stmt]) -> IResult<()> {
        debug!("Interpreting {} statements", statements.len());
        for stmt in statements {
            self.execute(stmt)?;
        }
        self.out.flush()?;
        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> IResult<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                debug!("Printed value: {}", value);
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(self.environment.clone()).shared();
                self.execute_block(statements, scope)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);
                let function = LoxFunction::new(decl.clone(), self.environment.clone(), false);
                self.environment
                    .borrow_mut()
                    .define(&decl.name.lexeme, Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(e) => self.evaluate(e)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                self.declare_class(name, superclass.as_ref(), methods)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Run `statements` inside `environment`, restoring the current
    /// environment afterwards however the block exits.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: SharedEnv) -> IResult<Flow> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = self.execute_all(statements);

        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> IResult<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn declare_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> IResult<()> {
        debug!("Declaring class '{}'", name.lexeme);

        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Nil);

        let superclass: Option<Rc<LoxClass>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    let token = match &expr.kind {
                        ExprKind::Variable(token) => token,
                        _ => name,
                    };
                    return Err(RuntimeError::type_error(token, "Superclass must be a class."));
                }
            },
            None => None,
        };

        // Methods of a subclass close over an extra scope holding `super`.
        let enclosing = self.environment.clone();
        if let Some(superclass) = &superclass {
            let scope = Environment::with_enclosing(enclosing.clone()).shared();
            scope
                .borrow_mut()
                .define("super", Value::Class(superclass.clone()));
            self.environment = scope;
        }

        let table: HashMap<String, Rc<LoxFunction>> = methods
            .iter()
            .map(|method| {
                let is_initializer = method.name.lexeme == LoxClass::INITIALIZER;
                let function =
                    LoxFunction::new(method.clone(), self.environment.clone(), is_initializer);
                (method.name.lexeme.clone(), Rc::new(function))
            })
            .collect();

        let class = LoxClass::new(name.lexeme.clone(), superclass, table);

        self.environment = enclosing;
        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))?;

        info!("Class '{}' defined with {} method(s)", name.lexeme, methods.len());
        Ok(())
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> IResult<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            ExprKind::Grouping(inner) => self.evaluate(inner),

            ExprKind::Unary { operator, right } => self.evaluate_unary(operator, right),

            ExprKind::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            ExprKind::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let short_circuits = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            ExprKind::Variable(name) => self.look_up_variable(name, expr.id),

            ExprKind::Assign { name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(&expr.id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }
                Ok(value)
            }

            ExprKind::Call {
                callee,
                paren,
                arguments,
            } => self.evaluate_call(callee, paren, arguments),

            ExprKind::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),
                Value::Array(array) => NativeArray::get_property(&array, name),
                _ => Err(RuntimeError::NotAnInstance {
                    name: name.clone(),
                    message: "Only instances have properties.",
                }),
            },

            ExprKind::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(RuntimeError::NotAnInstance {
                        name: name.clone(),
                        message: "Only instances have fields.",
                    });
                };
                let value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());
                Ok(value)
            }

            ExprKind::This(keyword) => self.look_up_variable(keyword, expr.id),

            ExprKind::Super { keyword, method } => self.evaluate_super(expr.id, keyword, method),
        }
    }

    fn look_up_variable(&self, name: &Token, id: ExprId) -> IResult<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate_unary(&mut self, op: &Token, expr: &Expr) -> IResult<Value> {
        let right = self.evaluate(expr)?;
        match (&op.token_type, right) {
            (TokenType::MINUS, Value::Number(n)) => Ok(Value::Number(-n)),
            (TokenType::MINUS, _) => Err(RuntimeError::type_error(op, "Operand must be a number.")),
            (_, right) => Ok(Value::Bool(!right.is_truthy())),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> IResult<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match op.token_type {
            TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left == right)),
            TokenType::BANG_EQUAL => return Ok(Value::Bool(left != right)),
            TokenType::PLUS => {
                return match (left, right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                    _ => Err(RuntimeError::type_error(
                        op,
                        "Operands must be two numbers or two strings.",
                    )),
                };
            }
            _ => {}
        }

        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            return Err(RuntimeError::type_error(op, "Operands must be numbers."));
        };

        Ok(match op.token_type {
            TokenType::MINUS => Value::Number(a - b),
            TokenType::STAR => Value::Number(a * b),
            TokenType::SLASH => Value::Number(a / b),
            TokenType::LESS => Value::Bool(a < b),
            TokenType::LESS_EQUAL => Value::Bool(a <= b),
            TokenType::GREATER => Value::Bool(a > b),
            TokenType::GREATER_EQUAL => Value::Bool(a >= b),
            _ => return Err(RuntimeError::type_error(op, "Invalid binary operator.")),
        })
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> IResult<Value> {
        let callee = self.evaluate(callee)?;

        let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
        for arg in arguments {
            values.push(self.evaluate(arg)?);
        }

        let Some(callable) = callee.as_callable() else {
            return Err(RuntimeError::NotCallable {
                paren: paren.clone(),
            });
        };

        if callable.checks_arity() && values.len() != callable.arity() {
            return Err(RuntimeError::ArityMismatch {
                paren: paren.clone(),
                expected: callable.arity(),
                got: values.len(),
            });
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow {
                paren: paren.clone(),
            });
        }

        debug!("Calling {} with {} argument(s)", callee, values.len());

        self.call_depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            callable.call(self, paren, values)
        });
        self.call_depth -= 1;

        result
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> IResult<Value> {
        let distance = self
            .locals
            .get(&id)
            .copied()
            .ok_or_else(|| RuntimeError::undefined_variable(keyword))?;

        let superclass = match Environment::get_at(&self.environment, distance, keyword)? {
            Value::Class(class) => class,
            _ => return Err(RuntimeError::type_error(keyword, "Superclass must be a class.")),
        };

        // `this` lives in the scope just inside the one holding `super`.
        let this = Token::synthetic("this", keyword.line);
        let instance = match Environment::get_at(&self.environment, distance.saturating_sub(1), &this)?
        {
            Value::Instance(instance) => instance,
            _ => {
                return Err(RuntimeError::NotAnInstance {
                    name: keyword.clone(),
                    message: "Only instances have properties.",
                })
            }
        };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),
            None => Err(RuntimeError::UndefinedProperty {
                name: method.clone(),
            }),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
