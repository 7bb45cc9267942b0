//! Declarative binding of positional command line arguments
//!
//! A command declares its positional arguments as an ordered list of [`Arg`]s. Each one says
//! how many tokens it takes ([`Arity`]), whether it may be left out, and how to bind the
//! tokens it is given. Once flags are parsed, the remaining bare tokens are matched against
//! that list left to right:
//!
//! ```
//! use bind_positionals::{name_arg, names_arg, Args, Command, Parsed};
//!
//! let mut target = String::new();
//! let mut sources = vec![];
//!
//! let mut app = Command::new("copy", "copies things")
//!     .args(Args::build([name_arg(&mut target), names_arg(&mut sources)]).unwrap());
//!
//! let parsed = app.parse_from(["exe", "dest", "a", "b"]).unwrap();
//! assert!(matches!(parsed, Parsed::Run(_)));
//! drop(app);
//!
//! assert_eq!(target, "dest");
//! assert_eq!(sources, ["a", "b"]);
//! ```
//!
//! # Syntax
//!
//! The command line around the positional tokens follows a small set of rules:
//!
//! - An argument prefixed with `+` sets a [`Flag`] of the same name
//! - An argument containing a `=` sets a [`Prop`] as long as the `=` is not the prefix
//! - An argument naming a sub-[`Command`] switches to that command, until the first
//! positional token is seen
//! - Everything else is a positional token
//! - A bare `--` turns everything after it into positional tokens

mod arg;
mod args;
mod binders;
mod cmdline;
mod command;

pub use arg::{Arg, Arity, BindError, Claim, Tokens};
pub use args::{Args, ArgsError, SpecError};
pub use binders::{bare_double_dash_args, name_arg, names_arg};
pub use cmdline::{HelpRequest, Matches};
pub use command::{help::write_help, ArgumentKind, Command, Flag, InvalidArguments, Parsed, Prop};
