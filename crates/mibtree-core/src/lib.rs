//! mibtree-core: MIB module extraction and OID namespace resolution.
//!
//! This crate extracts OID-bearing declarations from SMIv1/SMIv2 module text
//! and links modules into one global OID tree, resolving imports across
//! modules on demand. It is `no_std` compatible and IO-free; loading from
//! the filesystem lives in `mibtree-std`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod lexer;
pub mod module;
pub mod parser;
pub mod resolver;
pub mod tree;
