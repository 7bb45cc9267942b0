use crate::command::Command;
use std::collections::{HashMap, HashSet};
use tracing::trace;

const HELP_FLAGS: [&str; 4] = ["-h", "+h", "--help", "+help"];

pub enum CmdLine {
    // This variant is emitted when we parse a command line without any help arguments
    Args(Matches),
    // This variant is emitted when we parse a command line with help arguments
    Help(HelpRequest),
}

/// The command path help was requested for, starting with the executable name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRequest {
    pub path: Vec<String>,
}

/// A structured view of command line arguments
#[derive(Debug)]
#[non_exhaustive]
pub struct Matches {
    pub name: String,
    pub flags: HashSet<String>,
    pub props: HashMap<String, String>,
    /// Bare tokens left once flags, props and subcommands are taken out. Only the innermost
    /// command has any
    pub positionals: Vec<String>,
    /// How many positional tokens came before a bare `--`, if there was one
    pub args_len_at_dash: Option<usize>,
    pub subcommand: Option<Box<Matches>>,
}

impl Matches {
    fn new(name: String) -> Self {
        Matches {
            name,
            flags: HashSet::new(),
            props: HashMap::new(),
            positionals: vec![],
            args_len_at_dash: None,
            subcommand: None,
        }
    }

    /// The innermost subcommand that was invoked
    pub fn leaf(&self) -> &Matches {
        let mut current = self;
        while let Some(sub) = current.subcommand.as_deref() {
            current = sub;
        }
        current
    }

    /// Names of the invoked commands, starting with the executable name
    pub fn path(&self) -> Vec<&str> {
        let mut path = vec![self.name.as_str()];
        let mut next = self.subcommand.as_deref();
        while let Some(sub) = next {
            path.push(&sub.name);
            next = sub.subcommand.as_deref();
        }
        path
    }
}

impl CmdLine {
    // Parses `args` as command line arguments. `args` excludes the name of the executable.
    // Bare tokens matching one of the subcommands of `def` descend into that subcommand.
    pub(crate) fn parse_from(def: &Command<'_>, exe: &str, args: &[String]) -> Self {
        let mut result = Matches::new(exe.to_string());
        let mut path = vec![result.name.clone()];

        let mut current = &mut result;
        let mut current_def = def;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut arg = arg.trim().to_string();
            if arg.is_empty() {
                continue;
            }

            if arg == "--" {
                // Everything after the separator is positional, even if it looks like a flag
                current.args_len_at_dash = Some(current.positionals.len());
                current.positionals.extend(
                    iter.by_ref()
                        .map(|a| a.trim())
                        .filter(|a| !a.is_empty())
                        .map(String::from),
                );
                break;
            }

            if HELP_FLAGS.contains(&arg.as_str()) {
                // If a help flag is detected, return early with the `HelpRequest` variant. This
                // allows us to bypass validation when the user wants help (i.e. we can show the
                // help even if a required argument was missing)
                return CmdLine::Help(HelpRequest { path });
            }

            if arg.starts_with('+') {
                current.flags.insert(arg.split_off(1));
                continue;
            }

            if let Some(idx) = arg.find('=') {
                if idx != 0 {
                    let value = arg.split_off(idx + 1);
                    // pop the trailing `=`
                    arg.pop();
                    current.props.insert(arg, value);
                    continue;
                }
            }

            if current.positionals.is_empty() {
                if let Some(sub_def) = current_def.get_subcommand(&arg) {
                    trace!(command = arg.as_str(), "descending into subcommand");
                    path.push(arg.clone());
                    current.subcommand = Some(Box::new(Matches::new(arg)));
                    current = current.subcommand.as_mut().unwrap();
                    current_def = sub_def;
                    continue;
                }
            }

            current.positionals.push(arg);
        }

        CmdLine::Args(result)
    }

    #[cfg(test)]
    fn to_args(self) -> Matches {
        match self {
            CmdLine::Args(a) => a,
            _ => panic!("enum had the wrong variant"),
        }
    }

    #[cfg(test)]
    fn to_help(self) -> HelpRequest {
        match self {
            CmdLine::Help(r) => r,
            _ => panic!("enum had the wrong variant"),
        }
    }
}
