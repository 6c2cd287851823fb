use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info};

use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Tree‑walking evaluator.
///
/// Holds the session's root scope and a pointer to the scope currently in
/// effect, which moves inward on block entry and back out on block exit.
/// `print` output goes to `out`.
pub struct Interpreter<W: Write> {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    out: W,
}

impl Interpreter<io::Stdout> {
    /// Creates an interpreter printing to standard output.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter printing to `out`.
    pub fn with_output(out: W) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        Self {
            environment: Rc::clone(&globals),
            globals,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Interprets a list of statements (a "program") against the root scope.
    /// The first runtime error abandons the remaining statements.
    pub fn interpret(&mut self, statements: &[Stmt<'_>]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        // A previous run that failed inside a block must not leak its scope.
        self.environment = Rc::clone(&self.globals);

        for stmt in statements {
            self.execute(stmt)?;
        }

        self.out.flush()?;

        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Runs `statements` with `environment` as the current scope, restoring
    /// the previous scope afterwards whether or not an error occurred.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt<'_>],
        environment: Environment,
    ) -> Result<()> {
        let scope = Rc::new(RefCell::new(environment));
        let previous = std::mem::replace(&mut self.environment, scope);

        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));

        self.environment = previous;

        result
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Expression(expr) => {
                debug!("Evaluating expression statement");
                self.evaluate(expr)?;
                Ok(())
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                debug!("Printed value: {}", value);
                Ok(())
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                self.environment.borrow_mut().define(name.lexeme, value);
                Ok(())
            }

            Stmt::Block(statements) => {
                debug!("Entering block with {} statements", statements.len());
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                let result = self.execute_block(statements, scope);
                debug!("Exited block");
                result
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }

            Stmt::While { condition, body } => {
                debug!("Entering while loop");
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                debug!("Exited while loop");
                Ok(())
            }
        }
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr<'_>) -> Result<Value> {
        let value = match expr {
            Expr::Literal(value) => value.clone(),

            Expr::Grouping(inner) => self.evaluate(inner)?,

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right)?,

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right)?,

            Expr::Logical {
                left,
                operator,
                right,
            } => self.evaluate_logical(left, operator, right)?,

            Expr::Variable(name) => self.environment.borrow().get(name)?,

            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;
                value
            }
        };

        debug!("Expression evaluated to: {}", value);
        Ok(value)
    }

    fn evaluate_unary(&mut self, op: &Token<'_>, right: &Expr<'_>) -> Result<Value> {
        let right = self.evaluate(right)?;

        match op.token_type {
            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),

            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(LoxError::runtime(op.line, "Operand must be a number.")),
            },

            _ => Err(invalid_operator(op)),
        }
    }

    /// Both operands are evaluated, left first, before the operator is applied.
    fn evaluate_binary(
        &mut self,
        left: &Expr<'_>,
        op: &Token<'_>,
        right: &Expr<'_>,
    ) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        debug!(
            "Binary {} on {} and {}",
            op.lexeme,
            left.type_name(),
            right.type_name()
        );

        match op.token_type {
            TokenType::PLUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                _ => Err(LoxError::runtime(
                    op.line,
                    "Operands must be two numbers or two strings.",
                )),
            },

            TokenType::MINUS => numeric(op, &left, &right, |a, b| Value::Number(a - b)),
            TokenType::STAR => numeric(op, &left, &right, |a, b| Value::Number(a * b)),
            TokenType::SLASH => numeric(op, &left, &right, |a, b| Value::Number(a / b)),

            TokenType::GREATER => numeric(op, &left, &right, |a, b| Value::Bool(a > b)),
            TokenType::GREATER_EQUAL => numeric(op, &left, &right, |a, b| Value::Bool(a >= b)),
            TokenType::LESS => numeric(op, &left, &right, |a, b| Value::Bool(a < b)),
            TokenType::LESS_EQUAL => numeric(op, &left, &right, |a, b| Value::Bool(a <= b)),

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(is_equal(&left, &right))),
            TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(&left, &right))),

            _ => Err(invalid_operator(op)),
        }
    }

    /// `or` / `and` return the deciding operand itself, not a boolean.
    fn evaluate_logical(
        &mut self,
        left: &Expr<'_>,
        op: &Token<'_>,
        right: &Expr<'_>,
    ) -> Result<Value> {
        let left = self.evaluate(left)?;

        let short_circuit = match op.token_type {
            TokenType::OR => left.is_truthy(),
            TokenType::AND => !left.is_truthy(),
            _ => return Err(invalid_operator(op)),
        };

        if short_circuit {
            debug!("Short-circuit on {}", op.lexeme);
            return Ok(left);
        }

        self.evaluate(right)
    }
}

/// Applies `f` when both operands are numbers.
fn numeric(
    op: &Token<'_>,
    left: &Value,
    right: &Value,
    f: impl FnOnce(f64, f64) -> Value,
) -> Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(f(*a, *b)),
        _ => Err(LoxError::runtime(op.line, "Operands must be numbers.")),
    }
}

/// No implicit coercion: values of different types are never equal.
fn is_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

fn invalid_operator(op: &Token<'_>) -> LoxError {
    LoxError::runtime(op.line, format!("Invalid operator '{}'.", op.lexeme))
}
