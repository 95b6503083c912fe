//! Evaluation scopes.
//!
//! A `Scope` is the object an expression is evaluated against. The view-model
//! is the usual scope; a plain data tree behind a `RefCell` is another.

use core::cell::RefCell;
use weft_core::{Error, Path, Result, Value};

/// Something expressions can read from, call into and write to.
pub trait Scope {
    /// Resolves a top-level name.
    ///
    /// Returns `Ok(None)` when the name is not defined on this scope.
    fn lookup(&self, name: &str) -> Result<Option<Value>>;

    /// Invokes a top-level method with no arguments.
    fn invoke(&self, name: &str) -> Result<Value>;

    /// Writes `value` at `path`, where the first segment is a top-level name.
    fn assign(&self, path: &Path, value: Value) -> Result<()>;
}

/// A plain data tree used as a scope. It has no methods.
impl Scope for RefCell<Value> {
    fn lookup(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.borrow().get(name).cloned())
    }

    fn invoke(&self, name: &str) -> Result<Value> {
        Err(Error::not_callable(name))
    }

    fn assign(&self, path: &Path, value: Value) -> Result<()> {
        self.borrow_mut().set_path(path, value).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use weft_core::{Object, Segment};

    fn scope() -> RefCell<Value> {
        let mut root = Object::new();
        root.insert("count", Value::from(1));
        RefCell::new(Value::Object(root))
    }

    #[test]
    fn test_lookup() {
        let scope = scope();
        assert_eq!(scope.lookup("count").unwrap(), Some(Value::from(1)));
        assert_eq!(scope.lookup("missing").unwrap(), None);
    }

    #[test]
    fn test_invoke_is_not_callable() {
        let scope = scope();
        assert!(matches!(scope.invoke("count"), Err(Error::NotCallable { .. })));
    }

    #[test]
    fn test_assign() {
        let scope = scope();
        let path = Path::from(vec![Segment::Field("count".into())]);
        scope.assign(&path, Value::from(2)).unwrap();
        assert_eq!(scope.lookup("count").unwrap(), Some(Value::from(2)));
    }
}
