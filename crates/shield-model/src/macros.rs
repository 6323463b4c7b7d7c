//! Declarative helpers shared by the model modules.

/// Declare a closed, string-valued enumeration.
///
/// Generates the enum with serde renames, `as_str()`, `all()`, `Display`,
/// and a `FromStr` that fails with [`UnknownVariant`](crate::UnknownVariant).
/// Parsing is exact: the wire spelling is the only accepted form.
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every member in declaration order.
            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }

            /// Wire spelling of this member.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(crate::UnknownVariant::new($kind, other)),
                }
            }
        }
    };
}

/// Route an entity's `Deserialize` through its validating constructor.
///
/// The payload type is a plain serde struct with the entity's raw fields;
/// `$build` turns it into the entity or an error, which becomes a serde
/// error.
macro_rules! impl_validating_deserialize {
    ($ty:ident, $payload:ty, $build:expr) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <$payload as serde::Deserialize>::deserialize(deserializer)?;
                let build: fn($payload) -> Result<$ty, _> = $build;
                build(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}
