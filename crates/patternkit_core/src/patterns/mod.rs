//! Catalogue of creational, structural and injection patterns.
//!
//! Each submodule is self-contained and exercised by the `patternkit demo`
//! command.

pub mod adapter;
pub mod builder;
pub mod factory;
pub mod fluent;
pub mod injection;
pub mod prototype;
pub mod singleton;

pub use adapter::AdapterError;
pub use factory::CardKindError;
pub use fluent::FluentError;
pub use injection::InjectionError;
