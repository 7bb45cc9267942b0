//! Ready-made [`Arg`]s for the common cases

use crate::arg::{Arg, Arity, Claim};

/// A single required token, stored in `dest`
pub fn name_arg(dest: &mut String) -> Arg<'_> {
    Arg::new(Arity::Exactly(1), move |tokens, offset| {
        *dest = tokens.args()[offset].clone();
        Ok(Claim::Consumed)
    })
    .placeholder("<NAME>")
}

/// Every remaining token, stored in `dest`. No tokens leaves `dest` empty
pub fn names_arg(dest: &mut Vec<String>) -> Arg<'_> {
    Arg::new(Arity::Capture, move |tokens, offset| {
        *dest = tokens.rest(offset).to_vec();
        Ok(Claim::Consumed)
    })
    .placeholder("<NAME>")
}

/// Everything after a bare `--` in the raw argument vector, stored in `dest`.
///
/// Flag parsing normally swallows the separator, so this looks at [`Tokens::raw`] rather
/// than the positional tokens. Without a separator `dest` is left alone. The argument
/// captures the remaining positional tokens either way.
///
/// [`Tokens::raw`]: crate::Tokens::raw
pub fn bare_double_dash_args(dest: &mut Option<Vec<String>>) -> Arg<'_> {
    Arg::new(Arity::Capture, move |tokens, _| {
        let raw = tokens.raw();
        if let Some(idx) = raw.iter().position(|a| a.trim() == "--") {
            *dest = Some(raw[idx + 1..].to_vec());
        }
        Ok(Claim::Consumed)
    })
    .placeholder("-- <ARGS>")
}
