use std::fmt;

/// The error a bind function returns when it rejects the tokens it was offered
pub type BindError = Box<dyn std::error::Error + Send + Sync>;

/// How many positional tokens an [`Arg`] consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Consume exactly this many tokens
    Exactly(usize),
    /// Consume every token that is still unclaimed
    Capture,
}

impl Arity {
    /// Maps the integer convention where a negative count means "capture the rest"
    pub fn from_raw(n: isize) -> Self {
        match usize::try_from(n) {
            Ok(n) => Arity::Exactly(n),
            Err(_) => Arity::Capture,
        }
    }
}

/// What a bind function did with the tokens it was offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The tokens belong to this argument
    Consumed,
    /// The tokens are not for this argument and should be offered to the next one
    Declined,
}

/// The positional tokens of one invocation, as seen by bind functions.
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'t> {
    command: &'t str,
    args: &'t [String],
    raw: &'t [String],
}

impl<'t> Tokens<'t> {
    /// Wraps the positional tokens left over after flag parsing.
    ///
    /// `raw` is the argument vector before flag parsing, including any `--` separator.
    pub fn new(command: &'t str, args: &'t [String], raw: &'t [String]) -> Self {
        Tokens { command, args, raw }
    }

    /// The name of the command being invoked
    pub fn command(&self) -> &'t str {
        self.command
    }

    /// All positional tokens
    pub fn args(&self) -> &'t [String] {
        self.args
    }

    /// The unfiltered argument vector
    pub fn raw(&self) -> &'t [String] {
        self.raw
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Every positional token from `offset` to the end. Out of range offsets yield an empty slice
    pub fn rest(&self, offset: usize) -> &'t [String] {
        self.args.get(offset..).unwrap_or_default()
    }
}

type BindFn<'a> = Box<dyn FnMut(&Tokens<'_>, usize) -> Result<Claim, BindError> + 'a>;

/// A declared expectation about a position (or a run of positions) in the token list.
///
/// The bind function is called with the whole token list and the offset at which this
/// argument's tokens begin. It is responsible for copying the tokens it owns into its
/// destination. Bind functions run in declaration order and a later failure does not undo
/// earlier binds, so they should not touch anything besides their own destination.
pub struct Arg<'a> {
    pub(crate) arity: Arity,
    pub(crate) optional: bool,
    pub(crate) placeholder: &'static str,
    bind: BindFn<'a>,
}

impl<'a> Arg<'a> {
    /// Defines a new required argument
    pub fn new<F>(arity: Arity, bind: F) -> Self
    where
        F: FnMut(&Tokens<'_>, usize) -> Result<Claim, BindError> + 'a,
    {
        Arg {
            arity,
            optional: false,
            placeholder: "<ARG>",
            bind: Box::new(bind),
        }
    }

    /// Lets the argument be skipped when too few tokens remain
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the name shown for this argument in usage lines
    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub(crate) fn bind(&mut self, tokens: &Tokens<'_>, offset: usize) -> Result<Claim, BindError> {
        (self.bind)(tokens, offset)
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("arity", &self.arity)
            .field("optional", &self.optional)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}
