#![doc = "gemgrind-core: inventory classification and gem conversion pipeline."]

//! This crate contains everything that does not touch the network directly:
//! the inventory data model, the run-scoped description cache, the
//! classifier filters, the expected-value link parser, the response
//! acceptance policy and the `grind` orchestration.
//!
//! Transport lives behind the [`contract::SteamApi`] trait; the `gemgrind`
//! binary crate provides the steamcommunity.com implementation and tests use
//! the generated `MockSteamApi`.

pub mod acceptance;
pub mod classify;
pub mod config;
pub mod contract;
pub mod error;
pub mod goo_link;
pub mod grind;
pub mod inventory;
pub mod progress;

pub use acceptance::{AcceptRule, AcceptancePolicy, ResponsePolicy};
pub use classify::{classify, Candidate, CandidateSet, Filter, ProtectedClasses};
pub use config::{GrindConfig, ValueSource};
pub use error::{FetchError, GrindError, LookupError, MalformedLinkFormat};
pub use grind::{grind, GrindReport, SkipReason};
pub use inventory::{DescriptionCache, InventorySnapshot};
