//! Collaborators built on top of the `tame` core.
//!
//! - [`prelude`]: builtin numeric and array types plus literal constructors.
//! - [`c`]: a text backend producing C expressions and declarations.
//! - [`ascii`]: rank-ordered ASCII rendering of a [`tame::dag::Dag`].
//!
//! ```
//! use tame::backend::Backend;
//! use tame::model::{Application, Expr};
//! use tame_api::{c::CBackend, prelude::Prelude};
//!
//! let prelude = Prelude::new().unwrap();
//! let c = CBackend::new(prelude.types().clone());
//!
//! let sum = Expr::from(Application::add(prelude.int(10), prelude.int(20)));
//! assert_eq!(c.render(&sum).unwrap().into_string(), "10 + 20");
//! ```

pub mod ascii;
pub mod c;
pub mod prelude;

pub use prelude::Prelude;
