//! Message types flowing from the stores to the front-end.
//!
//! Stores publish snapshots through `watch` channels and push transient
//! notices through an unbounded channel; read operations answer with an
//! explicit [`Outcome`] instead of raising.

pub mod notice;
pub mod outcome;

pub use notice::{Notice, NoticeLevel, Notifier};
pub use outcome::{Binding, Outcome};
