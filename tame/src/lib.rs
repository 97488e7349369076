//! Tame: a parametric, capability-tagged type algebra and the symbolic
//! expressions built over it.
//!
//! The crate is organised bottom-up:
//! - [`id`]: monotonic identifier source used to name type nodes.
//! - [`dag`]: a generic directed acyclic graph with ancestor/descendant
//!   traversal and rank computation.
//! - [`types`]: the [`types::TypeRegistry`], which creates, derives and memoizes
//!   parametric types on top of one shared [`dag::Dag`].
//! - [`model`]: values, literals, operators, applications and the memoized
//!   [`model::operation::OperationRegistry`].
//! - [`backend`]: the dispatch contract used to render expression trees into
//!   a lazy stream of output atoms.
//!
//! ```
//! use tame::types::{Capabilities, TypeDecl, TypeRegistry};
//!
//! let types = TypeRegistry::new();
//! let number = types.create_type(TypeDecl::new("Number")).unwrap();
//! let natural = types
//!     .create_type(TypeDecl::new("NaturalNumber").capabilities(Capabilities::NATURAL))
//!     .unwrap();
//! types.link_supertype(natural, number).unwrap();
//!
//! assert!(types.isa(natural, number).unwrap());
//! assert_eq!(types.intersect(natural, number), Some(number));
//! ```

pub mod backend;
pub mod dag;
pub mod id;
pub mod model;
pub mod types;
pub mod utils;

pub use utils::{Error, TameResult};
