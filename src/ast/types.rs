use std::fmt::Display;

use serde::Serialize;

/// Types
///
/// Every VC type, plus `Error` for expressions that failed to check.
/// `Error` is compatible with everything so one mistake yields one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Type {
    Boolean,
    Int,
    Float,
    String,
    Void,
    Array {
        element: Box<Type>,
        /// `None` until the size is written or inferred from an initialiser.
        size: Option<usize>,
    },
    Error,
}

impl Type {
    pub fn array(element: Type, size: Option<usize>) -> Self {
        Type::Array {
            element: Box::new(element),
            size,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Boolean)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// The element type of an array, `None` for scalars.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn array_size(&self) -> Option<usize> {
        match self {
            Type::Array { size, .. } => *size,
            _ => None,
        }
    }

    /// Whether a value of type `source` may be stored into `self`.
    ///
    /// Int into Float is allowed; the caller is responsible for inserting
    /// the conversion node.
    pub fn assignable(&self, source: &Type) -> bool {
        match (self, source) {
            (Type::Error, _) | (_, Type::Error) => true,
            (Type::Array { .. }, _) | (_, Type::Array { .. }) => false,
            (Type::Float, Type::Int) => true,
            (target, source) => target == source,
        }
    }

    /// Whether an Int `source` needs an `IntToFloat` conversion to be stored into `self`.
    pub fn needs_int_to_float(&self, source: &Type) -> bool {
        self.is_float() && source.is_int()
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Boolean => write!(f, "boolean"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Array { element, .. } => write!(f, "{}[]", element),
            Type::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Type;

    #[test]
    fn test_assignable() {
        assert!(Type::Int.assignable(&Type::Int));
        assert!(Type::Float.assignable(&Type::Int));
        assert!(!Type::Int.assignable(&Type::Float));
        assert!(!Type::Boolean.assignable(&Type::Int));
        assert!(Type::Boolean.assignable(&Type::Error));
        assert!(Type::Error.assignable(&Type::String));
        assert!(!Type::array(Type::Int, Some(2)).assignable(&Type::array(Type::Int, Some(2))));
        assert!(!Type::Int.assignable(&Type::array(Type::Int, None)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::array(Type::Float, Some(3)).to_string(), "float[]");
        assert_eq!(Type::Error.to_string(), "error");
    }

    #[test]
    fn test_element_type() {
        let array = Type::array(Type::Boolean, None);
        assert_eq!(array.element_type(), Some(&Type::Boolean));
        assert_eq!(Type::Int.element_type(), None);
        assert_eq!(Type::array(Type::Int, Some(4)).array_size(), Some(4));
    }
}
