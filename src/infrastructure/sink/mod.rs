//! Sink task-service adapter.
//!
//! Implements the `TaskSink` port against the service's REST API. All wire
//! quirks (status encodings, wrapped-vs-bare list shapes) are contained in
//! `wire`; the engine never sees them.

pub mod client;
pub mod mock;
pub mod wire;

pub use client::SinkClient;
pub use mock::MockTaskSink;
