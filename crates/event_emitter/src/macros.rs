//! # Typed Event Macros
//!
//! Declarative helpers for the [`typed`](crate::typed) facade:
//!
//! - [`define_event!`] - gives a payload type its static event name
//! - [`event_schema!`] - declares a schema marker type and the events it carries

/// Implements [`Event`](crate::typed::Event) for a payload type.
///
/// ```rust
/// use event_emitter::{define_event, typed::Event};
///
/// struct ThemeChanged { dark: bool }
/// define_event!(ThemeChanged => "theme_changed");
///
/// assert_eq!(ThemeChanged::NAME, "theme_changed");
/// ```
#[macro_export]
macro_rules! define_event {
    ($event:ty => $name:expr) => {
        impl $crate::typed::Event for $event {
            const NAME: &'static str = $name;
        }
    };
}

/// Declares a schema marker type carrying the listed events.
///
/// ```rust
/// use event_emitter::{define_event, event_schema};
///
/// struct Opened;
/// struct Closed;
/// define_event!(Opened => "opened");
/// define_event!(Closed => "closed");
///
/// event_schema! {
///     /// Everything a dialog emits.
///     pub DialogEvents { Opened, Closed }
/// }
/// ```
#[macro_export]
macro_rules! event_schema {
    ($(#[$meta:meta])* $vis:vis $schema:ident { $($event:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        $vis struct $schema;

        $(
            impl $crate::typed::Carries<$event> for $schema {}
        )*
    };
}
