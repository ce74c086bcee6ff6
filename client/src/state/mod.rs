//! Reactive state models shared through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each model is a plain struct with pure transition methods; pages and the
//! channel client wrap them in `RwSignal`s and mutate through `update`.

pub mod channel;
pub mod session;
pub mod toast;
