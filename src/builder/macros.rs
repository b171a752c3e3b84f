//! Macros for ergonomic state machine construction.

/// Generate a `Copy` state enum with its `State` implementation.
///
/// Besides the trait impl, the macro adds an `ALL` constant listing every
/// variant in declaration order.
///
/// # Example
///
/// ```
/// use urbanite::state_enum;
/// use urbanite::core::State;
///
/// state_enum! {
///     pub enum DisplayState {
///         WaitDisplay,
///         SetDisplay,
///     }
/// }
///
/// assert_eq!(DisplayState::SetDisplay.name(), "SetDisplay");
/// assert_eq!(DisplayState::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every state, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
