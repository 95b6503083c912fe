//! Error types for Weft view-models.

use alloc::string::String;
use core::fmt;

/// Result type alias for Weft operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for view-model, expression and surface operations.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Expression could not be parsed.
    Parse {
        expression: String,
        message: String,
        position: usize,
    },
    /// List-repeat expression is not of the shape `item in collection`.
    MalformedRepeat {
        expression: String,
    },
    /// Call suffix applied to something that is not a method.
    NotCallable {
        expression: String,
    },
    /// Expression cannot be written to.
    NotAssignable {
        expression: String,
        reason: String,
    },
    /// An intermediate segment of a path is absent.
    PathNotFound {
        path: String,
    },
    /// No observable node is registered under this id.
    NodeNotFound {
        id: u64,
    },
    /// Linking would make a node its own ancestor.
    CyclicLink {
        parent: u64,
        child: u64,
    },
    /// A surface node handle does not refer to a node of the surface.
    SurfaceNodeNotFound {
        node: u64,
    },
    /// Selector did not match any surface node.
    SelectorNotFound {
        selector: String,
    },
    /// Markup could not be parsed.
    Markup {
        message: String,
        position: usize,
    },
    /// A directive handler failed.
    Handler {
        directive: String,
        message: String,
    },
    /// An observer, method or computed callback failed.
    Callback {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse {
                expression,
                message,
                position,
            } => {
                write!(
                    f,
                    "Error while parsing expression '{}' at {}: {}",
                    expression, position, message
                )
            }
            Error::MalformedRepeat { expression } => {
                write!(f, "Error while parsing repeat expression: {}", expression)
            }
            Error::NotCallable { expression } => {
                write!(f, "Expression is not callable: {}", expression)
            }
            Error::NotAssignable { expression, reason } => {
                write!(f, "Cannot assign to {}: {}", expression, reason)
            }
            Error::PathNotFound { path } => {
                write!(f, "Path not found: {}", path)
            }
            Error::NodeNotFound { id } => {
                write!(f, "Observable node not found: {}", id)
            }
            Error::CyclicLink { parent, child } => {
                write!(
                    f,
                    "Linking node {} under node {} would create a cycle",
                    child, parent
                )
            }
            Error::SurfaceNodeNotFound { node } => {
                write!(f, "Surface node not found: {}", node)
            }
            Error::SelectorNotFound { selector } => {
                write!(f, "No surface node matches selector: {}", selector)
            }
            Error::Markup { message, position } => {
                write!(f, "Invalid markup at {}: {}", position, message)
            }
            Error::Handler { directive, message } => {
                write!(f, "Directive {} failed: {}", directive, message)
            }
            Error::Callback { message } => {
                write!(f, "Callback failed: {}", message)
            }
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// Creates an expression parse error.
    pub fn parse(expression: impl Into<String>, message: impl Into<String>, position: usize) -> Self {
        Error::Parse {
            expression: expression.into(),
            message: message.into(),
            position,
        }
    }

    /// Creates a malformed repeat expression error.
    pub fn malformed_repeat(expression: impl Into<String>) -> Self {
        Error::MalformedRepeat {
            expression: expression.into(),
        }
    }

    /// Creates a not-callable error.
    pub fn not_callable(expression: impl Into<String>) -> Self {
        Error::NotCallable {
            expression: expression.into(),
        }
    }

    /// Creates a not-assignable error.
    pub fn not_assignable(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::NotAssignable {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Creates a path not found error.
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Error::PathNotFound { path: path.into() }
    }

    /// Creates a node not found error.
    pub fn node_not_found(id: u64) -> Self {
        Error::NodeNotFound { id }
    }

    /// Creates a cyclic link error.
    pub fn cyclic_link(parent: u64, child: u64) -> Self {
        Error::CyclicLink { parent, child }
    }

    /// Creates a surface node not found error.
    pub fn surface_node_not_found(node: u64) -> Self {
        Error::SurfaceNodeNotFound { node }
    }

    /// Creates a selector not found error.
    pub fn selector_not_found(selector: impl Into<String>) -> Self {
        Error::SelectorNotFound {
            selector: selector.into(),
        }
    }

    /// Creates a markup error.
    pub fn markup(message: impl Into<String>, position: usize) -> Self {
        Error::Markup {
            message: message.into(),
            position,
        }
    }

    /// Creates a directive handler error.
    pub fn handler(directive: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Handler {
            directive: directive.into(),
            message: message.into(),
        }
    }

    /// Creates a callback error.
    pub fn callback(message: impl Into<String>) -> Self {
        Error::Callback {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::malformed_repeat("fruit of fruits");
        assert!(err.to_string().contains("fruit of fruits"));

        let err = Error::parse("user..name", "Expected identifier", 5);
        assert!(err.to_string().contains("user..name"));
        assert!(err.to_string().contains("Expected identifier"));

        let err = Error::selector_not_found("#app");
        assert!(err.to_string().contains("#app"));
    }

    #[test]
    fn test_error_constructors() {
        let err = Error::cyclic_link(1, 7);
        match err {
            Error::CyclicLink { parent, child } => {
                assert_eq!(parent, 1);
                assert_eq!(child, 7);
            }
            _ => panic!("Wrong error type"),
        }
    }
}
