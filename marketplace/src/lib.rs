//! Marketplace client core: role-specific dashboards aggregated from
//! independently failing sources, faceted job search, and saved selections.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
