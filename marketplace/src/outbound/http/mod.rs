//! HTTP adapter for the marketplace REST backend.
//!
//! A thin reqwest implementation of every read port.

mod client;
mod dto;

pub use client::HttpMarketplaceClient;
