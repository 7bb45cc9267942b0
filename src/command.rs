use crate::arg::Tokens;
use crate::args::{Args, ArgsError};
use crate::cmdline::{CmdLine, HelpRequest, Matches};
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use tracing::debug;

pub mod help;

#[derive(Debug)]
pub enum ArgumentKind {
    Flag,
    Prop,
}

impl std::fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentKind::Prop => write!(f, "option"),
            ArgumentKind::Flag => write!(f, "flag"),
        }
    }
}

/// A variant of this enum is returned when the command line arguments don't match the command
/// definition
#[derive(Debug, thiserror::Error)]
pub enum InvalidArguments {
    #[error("{name} is not a valid {kind}")]
    UnrecognizedArgument { name: String, kind: ArgumentKind },
    #[error("missing required option '{0}'")]
    MissingRequiredOptions(String),
    #[error(transparent)]
    Positional(#[from] ArgsError),
}

/// The outcome of parsing a command line
#[derive(Debug)]
pub enum Parsed {
    /// Everything checked out and the positional arguments have been bound
    Run(Matches),
    /// Help was requested. Nothing was validated or bound
    Help(HelpRequest),
}

/// A blueprint for command line props (e.g. `prop=value`)
#[derive(Debug, Clone)]
pub struct Prop {
    help: &'static str,
    required: bool,
    names: Vec<&'static str>,
}

impl Prop {
    /// Defines a new property
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Prop {
            help,
            names: vec![name],
            required: false,
        }
    }

    /// Returns the primary name for this prop
    pub fn name(&self) -> &'static str {
        self.names
            .first()
            .expect("props must have at least one name")
    }

    /// Makes this prop required
    pub fn make_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches an alias to this prop
    pub fn add_alias(mut self, alias: &'static str) -> Self {
        self.names.push(alias);
        self
    }
}

/// A blueprint for command line flags (e.g. `+flag`)
#[derive(Debug, Clone)]
pub struct Flag {
    help: &'static str,
    names: Vec<&'static str>,
}

impl Flag {
    /// Defines a new flag
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Flag {
            help,
            names: vec![name],
        }
    }

    /// Returns the primary name for this flag
    pub fn name(&self) -> &'static str {
        self.names
            .first()
            .expect("flags must have at least one name")
    }

    /// Attaches an alias to this flag
    pub fn add_alias(mut self, alias: &'static str) -> Self {
        self.names.push(alias);
        self
    }
}

/// A blueprint for what valid command line should look like.
///
/// The `'a` lifetime is that of the destinations the command's positional [`Args`] write
/// into.
#[derive(Debug)]
pub struct Command<'a> {
    names: Vec<&'static str>,
    help: &'static str,

    props: Vec<Prop>,
    flags: Vec<Flag>,
    commands: Vec<Command<'a>>,
    args: Args<'a>,
}

impl<'a> Command<'a> {
    /// Creates a new instance.
    ///
    /// This structure can be used to represent both root and sub-commands. A new command
    /// accepts no positional arguments until [`Command::args`] says otherwise.
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            names: vec![name],
            help,
            props: vec![],
            flags: vec![],
            commands: vec![],
            args: Args::none(),
        }
    }

    /// Returns the primary name for this command
    pub fn name(&self) -> &'static str {
        self.names
            .first()
            .expect("commands should have at least one name")
    }

    /// Attaches an alias to this command.
    ///
    /// Attaching an alias to the root command has no visible effect
    pub fn add_alias(mut self, alias: &'static str) -> Self {
        self.names.push(alias);
        self
    }

    /// Defines a flag parameter for this command
    pub fn add_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Defines a prop parameter for this command
    pub fn add_prop(mut self, prop: Prop) -> Self {
        self.props.push(prop);
        self
    }

    /// Defines a subcommand
    pub fn add_command(mut self, subcommand: Command<'a>) -> Self {
        self.commands.push(subcommand);
        self
    }

    /// Declares the positional arguments of this command
    pub fn args(mut self, args: Args<'a>) -> Self {
        self.args = args;
        self
    }

    /// Returns a reference to a subcommand with the given name or alias
    pub fn get_subcommand(&self, name: &str) -> Option<&Command<'a>> {
        self.commands.iter().find(|c| c.names.contains(&name))
    }

    fn get_subcommand_mut(&mut self, name: &str) -> Option<&mut Command<'a>> {
        self.commands.iter_mut().find(|c| c.names.contains(&name))
    }

    /// Returns a reference to a flag with the given name or alias
    pub fn get_flag(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.names.contains(&name))
    }

    /// Returns a reference to a prop with the given name or alias
    pub fn get_prop(&self, name: &str) -> Option<&Prop> {
        self.props.iter().find(|p| p.names.contains(&name))
    }

    /// Follows a path of subcommand names (not including this command) down the tree
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<&Command<'a>> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.get_subcommand(first.as_ref())?.resolve(rest),
        }
    }

    fn resolve_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Command<'a>> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.get_subcommand_mut(first.as_ref())?.resolve_mut(rest),
        }
    }

    /// Writes the help of the command a [`HelpRequest`] points at
    pub fn write_help_for(&self, request: &HelpRequest, w: impl Write) -> io::Result<()> {
        let path = request.path.get(1..).unwrap_or_default();
        let command = self.resolve(path).unwrap_or(self);
        help::write_help(w, command)
    }

    /// Parses the command line arguments `items`, validates that the parsed structure adheres
    /// to this command definition, then binds the positional arguments of the innermost
    /// command.
    ///
    /// `items` is expected in the same format that [args()](std::env::args) returns (i.e. the
    /// name of the executable is first).
    pub fn parse_from<I, T>(&mut self, items: I) -> Result<Parsed, InvalidArguments>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut iter = items.into_iter().map(|s| s.into());
        let exe = iter.next().unwrap_or_default();
        let raw = iter.collect::<Vec<String>>();

        let mut args = match CmdLine::parse_from(self, &exe, &raw) {
            CmdLine::Args(args) => args,
            CmdLine::Help(request) => {
                debug!(path = ?request.path, "help requested");
                return Ok(Parsed::Help(request));
            }
        };

        Self::_validate(self, &args)?;
        Self::_resolve_aliases(self, &mut args);

        let path = args.path();
        let leaf_def = self
            .resolve_mut(&path[1..])
            .expect("subcommands are only recognized when defined");
        let tokens = Tokens::new(leaf_def.name(), &args.leaf().positionals, &raw);
        leaf_def.args.validate(&tokens)?;

        Ok(Parsed::Run(args))
    }

    fn _resolve_aliases(cmd_def: &Command<'_>, cmd_args: &mut Matches) {
        // Assumes that _validate has been called, so we unwrap() without fear

        let mut canonical_flags = HashSet::new();
        for flag in &cmd_args.flags {
            canonical_flags.insert(cmd_def.get_flag(flag).unwrap().name().to_string());
        }

        let mut canonical_props = HashMap::new();
        for (prop, value) in &cmd_args.props {
            canonical_props.insert(
                cmd_def.get_prop(prop).unwrap().name().to_string(),
                value.to_string(),
            );
        }

        cmd_args.flags = canonical_flags;
        cmd_args.props = canonical_props;

        if let Some(ref mut subcmd_arg) = cmd_args.subcommand {
            let subcmd_def = cmd_def.get_subcommand(&subcmd_arg.name).unwrap();
            subcmd_arg.name = subcmd_def.name().to_string();
            Self::_resolve_aliases(subcmd_def, subcmd_arg.as_mut());
        }
    }

    fn _validate(cmd_def: &Command<'_>, cmd_args: &Matches) -> Result<(), InvalidArguments> {
        // Every flag argument must have a corresponding flag definition
        for flag in &cmd_args.flags {
            if cmd_def.get_flag(flag).is_none() {
                return Err(InvalidArguments::UnrecognizedArgument {
                    name: flag.clone(),
                    kind: ArgumentKind::Flag,
                });
            }
        }

        let required_props = cmd_def
            .props
            .iter()
            .filter_map(|p| if p.required { Some(p.name()) } else { None })
            .collect::<HashSet<_>>();
        let mut seen: HashSet<&str> = HashSet::new();

        for prop in cmd_args.props.keys() {
            // Every prop argument must have a corresponding prop definition
            let Some(prop_def) = cmd_def.get_prop(prop) else {
                return Err(InvalidArguments::UnrecognizedArgument {
                    name: prop.clone(),
                    kind: ArgumentKind::Prop,
                });
            };

            // All required options must be observed
            if prop_def.required {
                seen.insert(prop_def.name());
            }
        }

        let missing = required_props
            .difference(&seen)
            .copied()
            .collect::<Vec<&str>>();
        if let Some(first) = missing.first() {
            return Err(InvalidArguments::MissingRequiredOptions(first.to_string()));
        }

        let Some(ref subcommand_arg) = cmd_args.subcommand else {
            return Ok(());
        };

        // The command line parser only descends into defined subcommands
        let subcommand_def = cmd_def
            .get_subcommand(&subcommand_arg.name)
            .expect("subcommands are only recognized when defined");

        Self::_validate(subcommand_def, subcommand_arg.as_ref())
    }
}
