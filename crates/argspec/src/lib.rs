//! Declarative command-line argument parsing.
//!
//! An application describes its options and positionals once, as a
//! [`Schema`]. Building the schema validates every declaration, so a
//! malformed schema never reaches parsing. Parsing fills a [`ParsedArgs`]
//! map with one typed slot per declaration:
//!
//! - arity-0 options are flags (`bool`)
//! - arity-1 options hold one string, arity-N options a tuple of N strings
//! - positionals hold one string, and a trailing capturing positional holds
//!   every remaining token
//!
//! ```
//! use argspec::{AppInfo, OptionSpec, PositionalSpec, Schema};
//!
//! let schema = Schema::builder(AppInfo::new("greet", "Say hello.", 1, 0, 0))
//!     .option(OptionSpec::flag("loud").short('l').long("loud"))
//!     .option(OptionSpec::value("name").short('n').default_value("world"))
//!     .positional(PositionalSpec::new("rest").capture_remaining())
//!     .build()?;
//!
//! let argv = ["-l", "extra"];
//! let args = schema.parse(&argv)?;
//! assert!(args.flag("loud"));
//! assert_eq!(args.get("name"), Some("world"));
//! assert_eq!(args.get_all("rest"), Some(&["extra"][..]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Matching is by prefix and in declaration order: the first option whose
//! short or long form starts the token wins, so `-fstrict` matches `-f`.

pub mod error;
mod help;
pub mod parsed;
mod scan;
pub mod schema;
pub mod shape;
pub mod style;
mod validate;

pub use error::{ErrorKind, ParseError, SchemaError};
pub use parsed::{ParsedArgs, Value};
pub use schema::{AppInfo, OptionSpec, PositionalSpec, Schema, SchemaBuilder};
pub use shape::{Shape, Slot, SlotKind};
pub use style::Palette;
