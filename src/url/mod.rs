//! URL handling module for Sumi-Politeness
//!
//! Robots rules are evaluated against request paths, not full URLs. This
//! module turns the URLs a crawler wants to fetch into those paths.

mod path;

pub use path::{host_of, parse_base_url, request_path};
