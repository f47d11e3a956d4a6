//! Event-source adapters: three interchangeable ways of turning the
//! remote status feed into one pull-based sequence of snapshots.
//!
//! All of them observe the cancellation token at every suspension
//! point, emit nothing after cancellation, and stop after handing out
//! a terminal snapshot.

pub mod event_stream;
pub mod long_poll;
pub mod short_poll;

pub use event_stream::EventStreamSource;
pub use long_poll::LongPollSource;
pub use short_poll::ShortPollSource;
