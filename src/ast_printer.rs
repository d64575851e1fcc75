use crate::ast::{Expr, ExprKind, FunctionDecl, LiteralValue, Stmt};

/// Renders the tree in a fully parenthesised, Lisp‑like form.  Used by the
/// `parse` command and by parser tests.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_expr(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Binary {
                left,
                operator,
                right,
            }
            | ExprKind::Logical {
                left,
                operator,
                right,
            } => self.parenthesize(&operator.lexeme, &[left.as_ref(), right.as_ref()]),

            ExprKind::Unary { operator, right } => {
                self.parenthesize(&operator.lexeme, &[right.as_ref()])
            }

            ExprKind::Literal(value) => match value {
                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }

                LiteralValue::Str(s) => s.to_string(),

                LiteralValue::True => "true".to_string(),

                LiteralValue::False => "false".to_string(),

                LiteralValue::Nil => "nil".to_string(),
            },

            ExprKind::Grouping(inner) => self.parenthesize("group", &[inner.as_ref()]),

            ExprKind::Variable(name) => name.lexeme.to_string(),

            ExprKind::Assign { name, value } => {
                format!("(= {} {})", name.lexeme, self.print_expr(value))
            }

            ExprKind::Call {
                callee, arguments, ..
            } => {
                let mut out = format!("(call {}", self.print_expr(callee));
                for arg in arguments {
                    out.push(' ');
                    out.push_str(&self.print_expr(arg));
                }
                out.push(')');
                out
            }

            ExprKind::Get { object, name } => {
                format!("(. {} {})", self.print_expr(object), name.lexeme)
            }

            ExprKind::Set {
                object,
                name,
                value,
            } => format!(
                "(.= {} {} {})",
                self.print_expr(object),
                name.lexeme,
                self.print_expr(value)
            ),

            ExprKind::This(_) => "this".to_string(),

            ExprKind::Super { method, .. } => format!("(super {})", method.lexeme),
        }
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", self.print_expr(expr)),

            Stmt::Print(expr) => format!("(print {})", self.print_expr(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, self.print_expr(init)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => {
                let mut out = String::from("(block");
                for s in statements {
                    out.push(' ');
                    out.push_str(&self.print_stmt(s));
                }
                out.push(')');
                out
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    self.print_expr(condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    self.print_expr(condition),
                    self.print_stmt(then_branch)
                ),
            },

            Stmt::While { condition, body } => format!(
                "(while {} {})",
                self.print_expr(condition),
                self.print_stmt(body)
            ),

            Stmt::Function(decl) => self.print_function(decl),

            Stmt::Return { value, .. } => match value {
                Some(value) => format!("(return {})", self.print_expr(value)),
                None => "(return)".to_string(),
            },

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let mut out = format!("(class {}", name.lexeme);
                if let Some(superclass) = superclass {
                    out.push_str(" < ");
                    out.push_str(&self.print_expr(superclass));
                }
                for method in methods {
                    out.push(' ');
                    out.push_str(&self.print_function(method));
                }
                out.push(')');
                out
            }
        }
    }

    fn print_function(&self, decl: &FunctionDecl) -> String {
        let params: Vec<&str> = decl.params.iter().map(|p| p.lexeme.as_str()).collect();
        let mut out = format!("(fun {} ({})", decl.name.lexeme, params.join(" "));
        for s in &decl.body {
            out.push(' ');
            out.push_str(&self.print_stmt(s));
        }
        out.push(')');
        out
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print_expr(expr));
        }
        out.push(')');
        out
    }
}
