//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **clientraw**: reqwest-backed station file fetcher and probe
//! - **cache**: in-process TTL cache for fetched snapshots
//! - **memory**: in-memory site and user repositories
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod clientraw;
pub mod memory;
pub mod persistence;
