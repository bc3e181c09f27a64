//! Macros for ergonomic command definitions.

/// Generate a command enum and its [`Command`](crate::core::Command) implementation.
///
/// The enum derives `Clone, Copy, PartialEq, Eq, Hash, Debug` and serde's
/// `Serialize`/`Deserialize`; `name()` returns the variant identifier.
///
/// # Example
///
/// ```
/// use cellsort::command_enum;
/// use cellsort::core::Command;
///
/// command_enum! {
///     pub enum ConveyorCommand {
///         Run,
///         Halt,
///     }
/// }
///
/// assert_eq!(ConveyorCommand::Halt.name(), "Halt");
/// ```
#[macro_export]
macro_rules! command_enum {
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
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Command for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
