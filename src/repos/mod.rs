pub mod error;
pub mod link_repo;

#[cfg(test)]
pub mod memory;

pub use error::StoreError;
pub use link_repo::{LinkRow, LinkStore, NewLink, PgLinkStore};
