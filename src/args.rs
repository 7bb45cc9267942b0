use crate::arg::{Arg, Arity, BindError, Claim, Tokens};
use tracing::{debug, trace};

/// Returned when positional tokens don't fit the declared arguments
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error("missing required argument(s)")]
    MissingArgument,
    #[error("unknown command {token:?} for {command:?}")]
    UnknownToken { token: String, command: String },
    #[error(transparent)]
    Bind(BindError),
}

/// Returned when a sequence of arguments can't be matched unambiguously
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("arguments {first} and {second} both capture the remaining tokens")]
    MultipleCaptures { first: usize, second: usize },
}

/// An ordered sequence of [`Arg`]s, matched left to right against the positional tokens of
/// a command.
///
/// Declaration order is consumption order: each argument claims the earliest tokens no
/// previous argument has claimed.
#[derive(Debug, Default)]
pub struct Args<'a> {
    specs: Vec<Arg<'a>>,
}

impl<'a> Args<'a> {
    /// A command that takes no positional arguments at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Collects `specs` into a sequence.
    ///
    /// At most one capturing argument is allowed, since two of them would have no sensible
    /// way of splitting the remaining tokens.
    pub fn build<I>(specs: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = Arg<'a>>,
    {
        let specs = specs.into_iter().collect::<Vec<_>>();

        let mut captures = specs
            .iter()
            .enumerate()
            .filter(|(_, s)| s.arity == Arity::Capture)
            .map(|(i, _)| i);

        if let (Some(first), Some(second)) = (captures.next(), captures.next()) {
            return Err(SpecError::MultipleCaptures { first, second });
        }

        Ok(Args { specs })
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg<'a>> {
        self.specs.iter()
    }

    /// Matches `tokens` against the declared arguments, calling each bind function with the
    /// offset of the tokens it owns.
    ///
    /// The first failure stops the match. Binds that already ran are not undone.
    pub fn validate(&mut self, tokens: &Tokens<'_>) -> Result<(), ArgsError> {
        let len = tokens.len();
        let mut pos = 0;

        for (idx, spec) in self.specs.iter_mut().enumerate() {
            match spec.arity {
                Arity::Exactly(n) => {
                    if n > len - pos {
                        if spec.optional {
                            trace!(idx, pos, "skipping optional argument");
                            continue;
                        }
                        debug!(idx, pos, n, len, "not enough tokens for required argument");
                        return Err(ArgsError::MissingArgument);
                    }

                    match spec.bind(tokens, pos).map_err(ArgsError::Bind)? {
                        Claim::Consumed => {
                            trace!(idx, pos, n, "argument consumed tokens");
                            pos += n;
                        }
                        Claim::Declined => {
                            trace!(idx, pos, "argument declined tokens");
                        }
                    }
                }
                Arity::Capture => {
                    if spec.bind(tokens, pos).map_err(ArgsError::Bind)? == Claim::Declined {
                        trace!(idx, pos, "capturing argument declined, consuming anyway");
                    }
                    trace!(idx, pos, len, "argument captured remaining tokens");
                    pos = len;
                }
            }
        }

        if let Some(token) = tokens.args().get(pos) {
            debug!(pos, token = token.as_str(), "unclaimed token");
            return Err(ArgsError::UnknownToken {
                token: token.clone(),
                command: tokens.command().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run(specs: Vec<Arg<'_>>, items: &[&str]) -> Result<(), ArgsError> {
        let args = strings(items);
        let tokens = Tokens::new("args-test", &args, &args);
        Args::build(specs).unwrap().validate(&tokens)
    }

    fn expect(expected: &'static str) -> Arg<'static> {
        Arg::new(Arity::Exactly(1), move |tokens, offset| {
            if tokens.args()[offset] != expected {
                return Err(format!("unexpected arg {:?}", tokens.args()[offset]).into());
            }
            Ok(Claim::Consumed)
        })
    }

    fn expect_rest(expected: &'static [&'static str]) -> Arg<'static> {
        Arg::new(Arity::Capture, move |tokens, offset| {
            if tokens.rest(offset) != expected {
                return Err(format!("unexpected args {:?}", tokens.rest(offset)).into());
            }
            Ok(Claim::Consumed)
        })
    }

    fn never_called(arity: Arity) -> Arg<'static> {
        Arg::new(arity, |_, _| Err("should not be called".into()))
    }

    #[test]
    fn table() {
        struct Case {
            name: &'static str,
            specs: Vec<Arg<'static>>,
            args: &'static [&'static str],
            err: Option<&'static str>,
        }

        let cases = vec![
            Case {
                name: "no args",
                specs: vec![],
                args: &[],
                err: None,
            },
            Case {
                name: "no specs with args",
                specs: vec![],
                args: &["my-arg"],
                err: Some(r#"unknown command "my-arg" for "args-test""#),
            },
            Case {
                name: "single arity",
                specs: vec![expect("my-arg")],
                args: &["my-arg"],
                err: None,
            },
            Case {
                name: "missing args",
                specs: vec![never_called(Arity::Exactly(1))],
                args: &[],
                err: Some("missing required argument(s)"),
            },
            Case {
                name: "extra args",
                specs: vec![expect("my-arg-1")],
                args: &["my-arg-1", "my-arg-2"],
                err: Some(r#"unknown command "my-arg-2" for "args-test""#),
            },
            Case {
                name: "multiple single arity",
                specs: vec![expect("my-arg"), expect("other-arg")],
                args: &["my-arg", "other-arg"],
                err: None,
            },
            Case {
                name: "capture arity",
                specs: vec![expect_rest(&["my-arg-1", "my-arg-2"])],
                args: &["my-arg-1", "my-arg-2"],
                err: None,
            },
            Case {
                name: "capture arity, no args",
                specs: vec![expect_rest(&[])],
                args: &[],
                err: None,
            },
            Case {
                name: "capture arity, after single arity",
                specs: vec![expect("my-arg-1"), expect_rest(&["my-arg-2"])],
                args: &["my-arg-1", "my-arg-2"],
                err: None,
            },
            Case {
                name: "optional args",
                specs: vec![never_called(Arity::Exactly(1)).optional()],
                args: &[],
                err: None,
            },
            Case {
                name: "ignored args",
                specs: vec![
                    Arg::new(Arity::Exactly(1), |_, _| Ok(Claim::Declined)),
                    expect("my-arg"),
                ],
                args: &["my-arg"],
                err: None,
            },
            Case {
                name: "ignored args left unclaimed",
                specs: vec![Arg::new(Arity::Exactly(1), |_, _| Ok(Claim::Declined))],
                args: &["my-arg"],
                err: Some(r#"unknown command "my-arg" for "args-test""#),
            },
            Case {
                name: "bind error",
                specs: vec![Arg::new(Arity::Exactly(1), |_, _| Err("bad value".into()))],
                args: &["my-arg"],
                err: Some("bad value"),
            },
            Case {
                name: "extra args reports the first unclaimed",
                specs: vec![expect("my-arg-1")],
                args: &["my-arg-1", "my-arg-2", "my-arg-3"],
                err: Some(r#"unknown command "my-arg-2" for "args-test""#),
            },
            Case {
                name: "huge optional arity after consumed token",
                specs: vec![
                    expect("my-arg"),
                    never_called(Arity::Exactly(usize::MAX)).optional(),
                ],
                args: &["my-arg"],
                err: None,
            },
            Case {
                name: "huge required arity after consumed token",
                specs: vec![expect("my-arg"), never_called(Arity::Exactly(usize::MAX))],
                args: &["my-arg"],
                err: Some("missing required argument(s)"),
            },
            Case {
                name: "optional after capture",
                specs: vec![
                    expect_rest(&["my-arg"]),
                    never_called(Arity::Exactly(1)).optional(),
                ],
                args: &["my-arg"],
                err: None,
            },
            Case {
                name: "required after capture",
                specs: vec![expect_rest(&["my-arg"]), never_called(Arity::Exactly(1))],
                args: &["my-arg"],
                err: Some("missing required argument(s)"),
            },
        ];

        for case in cases {
            let actual = run(case.specs, case.args).err().map(|e| e.to_string());
            assert_eq!(
                actual.as_deref(),
                case.err,
                "case {:?} returned the wrong error",
                case.name
            );
        }
    }

    #[test]
    fn declined_tokens_are_offered_at_the_same_offset() {
        let offsets = RefCell::new(vec![]);
        let specs = vec![
            Arg::new(Arity::Exactly(1), |_, offset| {
                offsets.borrow_mut().push(offset);
                Ok(Claim::Declined)
            }),
            Arg::new(Arity::Exactly(1), |tokens, offset| {
                offsets.borrow_mut().push(offset);
                assert_eq!(tokens.args()[offset], "x");
                Ok(Claim::Consumed)
            }),
        ];

        run(specs, &["x"]).unwrap();
        assert_eq!(offsets.into_inner(), [0, 0]);
    }

    #[test]
    fn capture_cannot_decline() {
        let specs = vec![Arg::new(Arity::Capture, |_, _| Ok(Claim::Declined))];
        run(specs, &["a", "b"]).unwrap();
    }

    #[test]
    fn capture_is_bound_once_with_no_tokens() {
        let calls = RefCell::new(0);
        let specs = vec![Arg::new(Arity::Capture, |tokens, offset| {
            *calls.borrow_mut() += 1;
            assert!(tokens.rest(offset).is_empty());
            Ok(Claim::Consumed)
        })];

        run(specs, &[]).unwrap();
        assert_eq!(calls.into_inner(), 1);
    }

    #[test]
    fn fixed_arity_larger_than_one() {
        let seen = RefCell::new(vec![]);
        let specs = vec![Arg::new(Arity::Exactly(2), |tokens, offset| {
            seen.borrow_mut()
                .extend_from_slice(&tokens.args()[offset..offset + 2]);
            Ok(Claim::Consumed)
        })];

        run(specs, &["a", "b"]).unwrap();
        assert_eq!(seen.into_inner(), ["a", "b"]);

        let specs = vec![never_called(Arity::Exactly(2))];
        let err = run(specs, &["a"]).unwrap_err();
        assert!(matches!(err, ArgsError::MissingArgument));
    }

    #[test]
    fn failure_stops_later_binds() {
        let specs = vec![
            Arg::new(Arity::Exactly(1), |_, _| Err("first".into())),
            never_called(Arity::Exactly(1)),
        ];
        let err = run(specs, &["a", "b"]).unwrap_err();
        assert!(matches!(err, ArgsError::Bind(_)));
        assert_eq!(err.to_string(), "first");
    }

    #[test]
    fn bind_error_keeps_its_source() {
        use std::error::Error;

        #[derive(Debug, thiserror::Error)]
        #[error("bad count")]
        struct BadCount(#[source] std::num::ParseIntError);

        let specs = vec![Arg::new(Arity::Exactly(1), |tokens, offset| {
            match tokens.args()[offset].parse::<u32>() {
                Ok(_) => Ok(Claim::Consumed),
                Err(e) => Err(BadCount(e).into()),
            }
        })];

        let err = run(specs, &["ten"]).unwrap_err();
        assert_eq!(err.to_string(), "bad count");
        let source = err.source().expect("bind error source");
        assert_eq!(source.to_string(), "invalid digit found in string");
    }

    #[test]
    fn multiple_captures_are_rejected() {
        let specs = vec![
            expect("a"),
            never_called(Arity::Capture),
            never_called(Arity::Capture),
        ];
        let err = Args::build(specs).unwrap_err();
        assert!(matches!(
            err,
            SpecError::MultipleCaptures {
                first: 1,
                second: 2
            }
        ));
    }
}
