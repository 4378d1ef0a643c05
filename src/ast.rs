use std::fmt::{self, Display, Write};

// AST NODES

/// A boxed Expression to allow recursive type structure.
pub type BoxExpr = Box<Expression>;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    Const(i64),
    Var(String),
    Diff {
        minuend: BoxExpr,
        subtrahend: BoxExpr,
    },
    IsZero {
        operand: BoxExpr,
    },
    If {
        condition: BoxExpr,
        then_branch: BoxExpr,
        else_branch: BoxExpr,
    },
    Let {
        name: String,
        value: BoxExpr,
        body: BoxExpr,
    },
}

// CONSTRUCTORS

impl Expression {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    pub fn diff(minuend: Expression, subtrahend: Expression) -> Self {
        Self::Diff {
            minuend: Box::new(minuend),
            subtrahend: Box::new(subtrahend),
        }
    }

    pub fn is_zero(operand: Expression) -> Self {
        Self::IsZero {
            operand: Box::new(operand),
        }
    }

    pub fn if_then_else(
        condition: Expression,
        then_branch: Expression,
        else_branch: Expression,
    ) -> Self {
        Self::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn let_in(name: impl Into<String>, value: Expression, body: Expression) -> Self {
        Self::Let {
            name: name.into(),
            value: Box::new(value),
            body: Box::new(body),
        }
    }

    /// Number of nested expression levels, counting this one.
    pub fn depth(&self) -> usize {
        match self {
            Self::Const(_) | Self::Var(_) => 1,
            Self::IsZero { operand } => 1 + operand.depth(),
            Self::Diff {
                minuend,
                subtrahend,
            } => 1 + minuend.depth().max(subtrahend.depth()),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                1 + condition
                    .depth()
                    .max(then_branch.depth())
                    .max(else_branch.depth())
            }
            Self::Let { value, body, .. } => 1 + value.depth().max(body.depth()),
        }
    }

    /// Renders the expression as an indented tree, e.g. `DiffExp(` ... `)`.
    pub fn tree(&self) -> Tree<'_> {
        Tree(self)
    }
}

// SOURCE RENDERING

/// Writes the expression back out as LetLang source that parses to the same tree.
impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => write!(f, "{value}"),
            Self::Var(name) => write!(f, "{name}"),
            Self::Diff {
                minuend,
                subtrahend,
            } => write!(f, "minus({minuend}, {subtrahend})"),
            Self::IsZero { operand } => write!(f, "iszero({operand})"),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "if {condition} then {then_branch} else {else_branch}"),
            Self::Let { name, value, body } => write!(f, "let {name} = {value} in {body}"),
        }
    }
}

// TREE RENDERING

/// Display adapter printing one element per line, indented with a tab per level.
pub struct Tree<'a>(&'a Expression);

impl Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(self.0, 0, f)
    }
}

enum Child<'a> {
    Name(&'a str),
    Expr(&'a Expression),
}

fn write_tree(expr: &Expression, level: usize, out: &mut impl Write) -> fmt::Result {
    let indent = "\t".repeat(level);
    let (label, children) = match expr {
        Expression::Var(name) => {
            return write!(out, "{indent}VarExp(\n{indent}\t\"{name}\"\n{indent})");
        }
        Expression::Const(value) => {
            return write!(out, "{indent}ConstExp(\n{indent}\t{value}\n{indent})");
        }
        Expression::Diff {
            minuend,
            subtrahend,
        } => (
            "DiffExp",
            vec![Child::Expr(minuend), Child::Expr(subtrahend)],
        ),
        Expression::IsZero { operand } => ("IsZeroExp", vec![Child::Expr(operand)]),
        Expression::If {
            condition,
            then_branch,
            else_branch,
        } => (
            "IfExp",
            vec![
                Child::Expr(condition),
                Child::Expr(then_branch),
                Child::Expr(else_branch),
            ],
        ),
        Expression::Let { name, value, body } => (
            "LetExp",
            vec![Child::Name(name), Child::Expr(value), Child::Expr(body)],
        ),
    };

    writeln!(out, "{indent}{label}(")?;
    let last = children.len() - 1;
    for (idx, child) in children.into_iter().enumerate() {
        match child {
            Child::Name(name) => write!(out, "{indent}\t\"{name}\"")?,
            Child::Expr(expr) => write_tree(expr, level + 1, out)?,
        }
        if idx == last {
            writeln!(out)?;
        } else {
            writeln!(out, ",")?;
        }
    }
    write!(out, "{indent})")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn render_leaf_trees() {
        assert_eq!(
            Expression::Const(42).tree().to_string(),
            "ConstExp(\n\t42\n)"
        );
        assert_eq!(
            Expression::var("x").tree().to_string(),
            "VarExp(\n\t\"x\"\n)"
        );
    }

    #[test]
    fn render_nested_tree() {
        let expr = Expression::let_in(
            "x",
            Expression::diff(Expression::Const(7), Expression::Const(2)),
            Expression::is_zero(Expression::var("x")),
        );

        let expected = "\
LetExp(
\t\"x\",
\tDiffExp(
\t\tConstExp(
\t\t\t7
\t\t),
\t\tConstExp(
\t\t\t2
\t\t)
\t),
\tIsZeroExp(
\t\tVarExp(
\t\t\t\"x\"
\t\t)
\t)
)";
        assert_eq!(expr.tree().to_string(), expected);
    }

    #[test]
    fn render_source() {
        let expr = Expression::let_in(
            "x",
            Expression::diff(Expression::Const(7), Expression::Const(-2)),
            Expression::if_then_else(
                Expression::is_zero(Expression::var("x")),
                Expression::Const(100),
                Expression::Const(200),
            ),
        );
        assert_eq!(
            expr.to_string(),
            "let x = minus(7, -2) in if iszero(x) then 100 else 200"
        );
    }

    #[test]
    fn depth_counts_deepest_branch() {
        let expr = Expression::if_then_else(
            Expression::Const(1),
            Expression::is_zero(Expression::is_zero(Expression::Const(0))),
            Expression::var("y"),
        );
        assert_eq!(expr.depth(), 4);
    }
}
