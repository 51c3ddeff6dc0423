//! GitHub source adapter.
//!
//! Implements the `IssueSource` port against the GitHub REST API.

pub mod client;
pub mod types;

pub use client::GithubClient;
