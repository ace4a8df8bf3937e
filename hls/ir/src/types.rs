#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Types of values in the IR.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Type {
    /// Signless integer of the given width.
    Int(u32),
    /// Floating point value of the given width.
    Float(u32),
    /// Target-sized index.
    Index,
    /// A stream channel carrying elements of the inner type.
    Channel(Box<Type>),
}

impl Type {
    /// Construct a channel type carrying `elem`.
    pub fn channel(elem: Type) -> Self {
        Type::Channel(Box::new(elem))
    }

    pub fn is_channel(&self) -> bool {
        matches!(self, Type::Channel(_))
    }

    /// The element type if this is a channel.
    pub fn channel_elem(&self) -> Option<&Type> {
        match self {
            Type::Channel(elem) => Some(elem),
            _ => None,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int(w) => write!(f, "i{w}"),
            Type::Float(w) => write!(f, "f{w}"),
            Type::Index => write!(f, "index"),
            Type::Channel(elem) => write!(f, "stream<{elem}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Type;

    #[test]
    fn channel_display_and_elem() {
        let ty = Type::channel(Type::Float(32));
        assert!(ty.is_channel());
        assert_eq!(ty.channel_elem(), Some(&Type::Float(32)));
        assert_eq!(ty.to_string(), "stream<f32>");
        assert_eq!(Type::Int(8).channel_elem(), None);
    }
}
