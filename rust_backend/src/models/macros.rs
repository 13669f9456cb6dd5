/// Defines a newtype identifier around an integer scalar.
///
/// The generated type is `Copy`, ordered and hashable, serializes as the bare
/// integer, and converts to and from the wrapped type.
///
/// Usage:
///   define_id_type!(i64, TileId);
#[macro_export]
macro_rules! define_id_type {
    ($inner:ty, $name:ident) => {
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::convert::From<$inner> for $name {
            fn from(v: $inner) -> Self {
                $name(v)
            }
        }

        impl ::std::convert::From<$name> for $inner {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl $name {
            pub const fn new(value: $inner) -> Self {
                $name(value)
            }

            pub const fn value(&self) -> $inner {
                self.0
            }
        }
    };
}
