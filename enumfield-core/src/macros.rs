/// Declares a typed enum with an optional transition table and default.
///
/// ```
/// use enumfield_core::{enumfield, Enum};
///
/// enumfield! {
///     /// Order lifecycle.
///     pub struct OrderStatus {
///         CREATED = 0,
///         PAID = 1,
///         SHIPPED = 2,
///         CANCELLED = 9,
///     }
///     transitions {
///         PAID <- [CREATED],
///         SHIPPED <- [PAID],
///         CANCELLED <- [CREATED, PAID],
///     }
///     default = CREATED;
/// }
///
/// assert_eq!(OrderStatus::PAID, 1);
/// assert!(OrderStatus::is_valid_transition(OrderStatus::PAID, OrderStatus::CANCELLED));
/// assert!(!OrderStatus::is_valid_transition(OrderStatus::SHIPPED, OrderStatus::CANCELLED));
/// ```
///
/// # Panics
///
/// The definition is validated on first access; an invalid declaration
/// (for example two members sharing a value) panics there.
#[macro_export]
macro_rules! enumfield {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($member:ident = $value:expr),+ $(,)?
        }
        $(transitions {
            $($to:ident <- [$($from:ident),* $(,)?]),* $(,)?
        })?
        $(default = $default:ident;)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        #[allow(dead_code)]
        impl $name {
            $(pub const $member: i64 = $value;)+
        }

        impl $crate::Enum for $name {
            fn definition() -> &'static $crate::EnumDefinition {
                static DEFINITION: $crate::__private::OnceLock<$crate::EnumDefinition> =
                    $crate::__private::OnceLock::new();
                DEFINITION.get_or_init(|| {
                    let builder = $crate::EnumDefinition::builder(stringify!($name))
                        $(.member(stringify!($member), Self::$member))+;
                    $(
                        let builder = builder.with_transitions()
                            $(.transition(Self::$to, {
                                let origins: ::std::vec::Vec<i64> = ::std::vec![$(Self::$from),*];
                                origins
                            }))*;
                    )?
                    $(let builder = builder.default_member(Self::$default);)?
                    match builder.build() {
                        Ok(definition) => definition,
                        Err(e) => panic!("invalid enum declaration {}: {}", stringify!($name), e),
                    }
                })
            }
        }
    };
}
