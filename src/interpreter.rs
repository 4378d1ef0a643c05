use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::Expression;
use crate::environment::Environment;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("unbound identifier \"{0}\"")]
    UnboundVariable(String),
    #[error("the condition of an if expression must be 0 or 1, not {0}")]
    InvalidCondition(i64),
}

/// Evaluate a whole program, starting with no bindings.
pub fn interpret(expr: &Expression) -> Result<i64, EvaluationError> {
    let result = evaluate(expr, &Environment::new())?;
    debug!(result, "evaluated program");
    Ok(result)
}

/// Evaluate `expr` with the bindings in `env` in scope.
///
/// Subtraction wraps on overflow. Arguments are evaluated left to right and the
/// first error aborts the evaluation.
///
/// Recursion depth equals the depth of `expr`. Trees from [`crate::parser::parse`]
/// are bounded by the parser's nesting limit; trees built by hand are not checked,
/// so a very deep one can exhaust the thread's stack.
pub fn evaluate(expr: &Expression, env: &Environment) -> Result<i64, EvaluationError> {
    match expr {
        Expression::Const(value) => Ok(*value),
        Expression::Var(name) => {
            let value = env
                .lookup(name)
                .ok_or_else(|| EvaluationError::UnboundVariable(name.clone()))?;
            trace!(name = name.as_str(), value, "resolved identifier");
            Ok(value)
        }
        Expression::Diff {
            minuend,
            subtrahend,
        } => {
            let minuend = evaluate(minuend, env)?;
            let subtrahend = evaluate(subtrahend, env)?;
            Ok(minuend.wrapping_sub(subtrahend))
        }
        Expression::IsZero { operand } => Ok(i64::from(evaluate(operand, env)? == 0)),
        Expression::If {
            condition,
            then_branch,
            else_branch,
        } => match evaluate(condition, env)? {
            1 => evaluate(then_branch, env),
            0 => evaluate(else_branch, env),
            other => Err(EvaluationError::InvalidCondition(other)),
        },
        Expression::Let { name, value, body } => {
            // The bound expression only sees the enclosing scope.
            let value = evaluate(value, env)?;
            trace!(name = name.as_str(), value, "bound identifier");
            evaluate(body, &env.extend(name.as_str(), value))
        }
    }
}
