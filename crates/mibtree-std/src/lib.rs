//! mibtree-std: filesystem MIB loading
//!
//! Native convenience layer over `mibtree-core`: reads module files and
//! directories and feeds them to a core
//! [`Resolver`](mibtree_core::resolver::Resolver).

pub mod loader;

pub use mibtree_core;
