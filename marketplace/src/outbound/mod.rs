//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest client for the marketplace REST backend
//! - **storage**: in-memory and directory-backed key-value stores
//!
//! Adapters translate between domain types and transport or storage
//! representations. They contain no business logic.

pub mod http;
pub mod storage;
