//! Expression evaluation against scopes.
//!
//! `Getter` and `Setter` are compiled from expression text on demand and
//! evaluated against any `Scope` at call time. Nothing is cached between
//! compilations.

use crate::parser::Expression;
use crate::scope::Scope;
use weft_core::{Error, Result, Segment, Value};

/// A compiled read of an expression.
#[derive(Clone, Debug)]
pub struct Getter {
    expression: Expression,
}

impl Getter {
    /// Compiles a getter from expression text.
    pub fn compile(source: &str) -> Result<Self> {
        Ok(Self {
            expression: Expression::parse(source)?,
        })
    }

    /// Creates a getter from an already parsed expression.
    pub fn from_expression(expression: Expression) -> Self {
        Self { expression }
    }

    /// Returns the underlying expression.
    #[inline]
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Evaluates the expression against `scope`.
    ///
    /// Absent values anywhere along the path evaluate to `Value::Null`. A call
    /// suffix invokes the named method; calling anything but a top-level
    /// method fails with `Error::NotCallable`.
    pub fn get<S: Scope + ?Sized>(&self, scope: &S) -> Result<Value> {
        let path = self.expression.path();
        let head = match path.head() {
            Some(Segment::Field(name)) => name,
            _ => return Ok(Value::Null),
        };

        if self.expression.is_call() {
            if path.len() == 1 {
                return scope.invoke(head);
            }
            return Err(Error::not_callable(self.expression.source()));
        }

        let Some(value) = scope.lookup(head)? else {
            return Ok(Value::Null);
        };
        Ok(value.get_path(&path.tail()).cloned().unwrap_or(Value::Null))
    }
}

/// A compiled write of an expression.
#[derive(Clone, Debug)]
pub struct Setter {
    expression: Expression,
}

impl Setter {
    /// Compiles a setter from expression text.
    ///
    /// Call expressions cannot be assigned to.
    pub fn compile(source: &str) -> Result<Self> {
        let expression = Expression::parse(source)?;
        if expression.is_call() {
            return Err(Error::not_assignable(
                expression.source(),
                "call expressions are read-only",
            ));
        }
        Ok(Self { expression })
    }

    /// Returns the underlying expression.
    #[inline]
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Assigns `value` at the expression's path on `scope`.
    pub fn set<S: Scope + ?Sized>(&self, scope: &S, value: Value) -> Result<()> {
        scope.assign(self.expression.path(), value)
    }
}
