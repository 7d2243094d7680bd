//! Core PAC-resolution engine: prefix matching, zone/template loading,
//! element building, the lookup tree, and the cache that ties them
//! together (C1–C6).

pub mod cache;
pub mod element;
pub mod error;
pub mod prefix;
pub mod template;
pub mod tree;
pub mod zone;

pub use cache::Cache;
pub use element::Element;
pub use error::LoadError;
pub use prefix::{Ipv4Prefix, PrefixError};
pub use tree::TreeNode;
