//! Task-list core: a canonical ordered task collection, a pure
//! view-derivation engine, and a string key-value persistence adapter.
//!
//! The presentation layer is external. It holds a [`model::ViewState`],
//! calls [`store::TaskStore`] mutators on user actions, and re-derives the
//! display projection with [`ops::derive_view`] (or [`store::TaskStore::view`])
//! after every change, passing today's date explicitly so derivation stays
//! deterministic.

pub mod io;
pub mod model;
pub mod ops;
pub mod store;
