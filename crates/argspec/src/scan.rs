//! The token scanner.
//!
//! Options are scanned first: each token is matched by prefix against the
//! declared options in order, and the first match wins. The first token that
//! matches no option switches the scanner to positionals for good. Value
//! tokens are consumed verbatim and never re-interpreted as options.

use crate::error::ParseError;
use crate::parsed::{ParsedArgs, Value};
use crate::schema::{OptionSpec, Schema};

/// Short and long prefixes that request help during the option phase.
const HELP_PREFIXES: [&str; 2] = ["-h", "--help"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ScanningOptions,
    ScanningPositionals,
    Done,
}

struct Scanner<'a> {
    schema: &'a Schema,
    tokens: Vec<&'a str>,
    cursor: usize,
    state: State,
    parsed: ParsedArgs<'a>,
}

impl<'a> Scanner<'a> {
    fn new<S: AsRef<str>>(schema: &'a Schema, argv: &'a [S]) -> Self {
        Self {
            schema,
            tokens: argv.iter().map(|s| s.as_ref()).collect(),
            cursor: 0,
            state: State::ScanningOptions,
            parsed: ParsedArgs::with_defaults(schema),
        }
    }

    fn remaining(&self) -> &[&'a str] {
        &self.tokens[self.cursor..]
    }

    fn run(mut self) -> Result<ParsedArgs<'a>, ParseError> {
        loop {
            self.state = match self.state {
                State::ScanningOptions => self.scan_option()?,
                State::ScanningPositionals => self.scan_positionals()?,
                State::Done => break,
            };
        }
        self.post_validate()?;
        Ok(self.parsed)
    }

    /// Consume one option token (and its values), or move on to positionals.
    fn scan_option(&mut self) -> Result<State, ParseError> {
        let Some(&token) = self.remaining().first() else {
            return Ok(State::ScanningPositionals);
        };

        if HELP_PREFIXES.iter().any(|p| token.starts_with(p)) {
            tracing::debug!(token, "help requested");
            return Err(ParseError::HelpRequested(self.schema.help()));
        }

        let schema = self.schema;
        let Some(opt) = schema.options().iter().find(|o| o.matches(token)) else {
            tracing::trace!(token, cursor = self.cursor, "no option matches, scanning positionals");
            return Ok(State::ScanningPositionals);
        };

        if self.parsed.is_present(opt.name()) {
            return Err(ParseError::RepeatedOption(opt.display_name()));
        }

        let values = self.take_values(opt)?;
        tracing::trace!(token, option = opt.name(), ?values, "matched option");
        let value = match opt.get_arity() {
            0 => Value::Flag(true),
            1 => Value::Single(values[0]),
            _ => Value::Tuple(values),
        };
        self.parsed.set(opt.name(), value);
        self.parsed.mark_seen(opt.name());
        Ok(State::ScanningOptions)
    }

    /// Advance past the option token and its `arity` value tokens.
    fn take_values(&mut self, opt: &OptionSpec) -> Result<Vec<&'a str>, ParseError> {
        let arity = opt.get_arity();
        let available = self.remaining().len() - 1;
        if available < arity {
            return Err(ParseError::MissingOptionArgument {
                option: opt.display_name(),
                expected: arity,
                found: available,
            });
        }

        let start = self.cursor + 1;
        let values = self.tokens[start..start + arity].to_vec();
        if let Some(bad) = values.iter().find(|v| !opt.accepts(v)) {
            return Err(ParseError::InvalidOptionArgument {
                option: opt.display_name(),
                value: bad.to_string(),
                possible: opt.get_possible_values().unwrap_or_default().to_vec(),
            });
        }

        self.cursor = start + arity;
        Ok(values)
    }

    /// Fill positionals in order. Running out of tokens leaves the remaining
    /// non-capturing positionals unseen; the post-scan check reports them.
    fn scan_positionals(&mut self) -> Result<State, ParseError> {
        let schema = self.schema;
        for pos in schema.positionals() {
            if pos.is_capturing() {
                let captured = self.remaining().to_vec();
                self.cursor = self.tokens.len();
                self.parsed.set(pos.name(), Value::Captured(captured));
                self.parsed.mark_seen(pos.name());
                break;
            }
            let Some(&token) = self.remaining().first() else {
                break;
            };
            self.cursor += 1;
            self.parsed.set(pos.name(), Value::Single(token));
            self.parsed.mark_seen(pos.name());
        }

        let rest = self.remaining();
        if !rest.is_empty() {
            return Err(ParseError::UnparsedArguments(
                rest.iter().map(|s| s.to_string()).collect(),
            ));
        }
        Ok(State::Done)
    }

    fn post_validate(&self) -> Result<(), ParseError> {
        let options = self.schema.options();

        if let Some(opt) = options
            .iter()
            .find(|o| o.is_required() && !self.parsed.is_present(o.name()))
        {
            return Err(ParseError::MissingRequiredOption(opt.display_name()));
        }

        if let Some(pos) = self
            .schema
            .positionals()
            .iter()
            .find(|p| !self.parsed.is_present(p.name()))
        {
            return Err(ParseError::MissingPositional(pos.name().to_string()));
        }

        for opt in options.iter().filter(|o| self.parsed.is_present(o.name())) {
            for other in opt.get_conflicts_with() {
                if !self.parsed.is_present(other) {
                    continue;
                }
                let other = self
                    .schema
                    .option(other)
                    .map(OptionSpec::display_name)
                    .unwrap_or_else(|| other.clone());
                return Err(ParseError::ConflictingOptions {
                    option: opt.display_name(),
                    other,
                });
            }
        }
        Ok(())
    }
}

impl Schema {
    /// Parse `argv` (program name already stripped) against this schema.
    ///
    /// A help request is reported as [`ParseError::HelpRequested`], which is
    /// not fatal; see [`ParseError::is_fatal`].
    pub fn parse<'a, S: AsRef<str>>(&'a self, argv: &'a [S]) -> Result<ParsedArgs<'a>, ParseError> {
        Scanner::new(self, argv).run()
    }

    /// Parse `argv`, printing help or the diagnostic and exiting on any error.
    pub fn parse_or_exit<'a, S: AsRef<str>>(&'a self, argv: &'a [S]) -> ParsedArgs<'a> {
        self.parse(argv).unwrap_or_else(|e| e.exit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::{AppInfo, PositionalSpec};

    fn app() -> AppInfo {
        AppInfo::new("scan", "Scanner tests.", 0, 3, 0)
    }

    /// `foo` flag, `bar` single value, `baz` pair, `cux` positional.
    fn fbzc() -> Schema {
        Schema::builder(app())
            .option(OptionSpec::flag("foo").short('f').long("foo"))
            .option(OptionSpec::value("bar").short('b'))
            .option(OptionSpec::new("baz", 2).short('z'))
            .positional(PositionalSpec::new("cux"))
            .build()
            .unwrap()
    }

    fn kind<S: AsRef<str>>(schema: &Schema, argv: &[S]) -> ErrorKind {
        schema.parse(argv).unwrap_err().kind()
    }

    #[test]
    fn tuple_option_and_positional() {
        let schema = fbzc();
        let argv = ["-z", "a", "b", "c"];
        let m = schema.parse(&argv).unwrap();
        assert!(!m.flag("foo"));
        assert_eq!(m.get("bar"), Some(""));
        assert_eq!(m.get_all("baz"), Some(&["a", "b"][..]));
        assert_eq!(m.get("cux"), Some("c"));
    }

    #[test]
    fn option_order_is_irrelevant() {
        let schema = fbzc();
        let argv = ["-b", "a", "-f", "-z", "b", "c", "d"];
        let m = schema.parse(&argv).unwrap();
        assert!(m.flag("foo"));
        assert_eq!(m.get("bar"), Some("a"));
        assert_eq!(m.get_all("baz"), Some(&["b", "c"][..]));
        assert_eq!(m.get("cux"), Some("d"));

        let argv = ["-z", "b", "c", "-f", "-b", "a", "d"];
        let again = schema.parse(&argv).unwrap();
        assert_eq!(m, again);
    }

    #[test]
    fn flags_are_true_iff_present() {
        let schema = Schema::builder(app())
            .option(OptionSpec::flag("a").short('a'))
            .option(OptionSpec::flag("b").short('b'))
            .option(OptionSpec::flag("c").long("c"))
            .build()
            .unwrap();
        let cases: [&[&str]; 5] = [&[], &["-a"], &["--c", "-a"], &["-b", "--c"], &["--c", "-b", "-a"]];
        for argv in cases {
            let m = schema.parse(argv).unwrap();
            assert_eq!(m.flag("a"), argv.contains(&"-a"), "{argv:?}");
            assert_eq!(m.flag("b"), argv.contains(&"-b"), "{argv:?}");
            assert_eq!(m.flag("c"), argv.contains(&"--c"), "{argv:?}");
        }
    }

    #[test]
    fn value_tokens_are_not_reinterpreted() {
        let schema = Schema::builder(app())
            .option(OptionSpec::value("foo").short('f'))
            .option(OptionSpec::flag("bar").long("bar"))
            .build()
            .unwrap();
        let argv = ["-f", "--bar"];
        let m = schema.parse(&argv).unwrap();
        assert_eq!(m.get("foo"), Some("--bar"));
        assert!(!m.flag("bar"));
        assert!(!m.is_present("bar"));
    }

    #[test]
    fn default_is_overwritten_and_can_swallow_flag_looking_value() {
        let schema = Schema::builder(app())
            .option(OptionSpec::value("mode").short('m').default_value("slow"))
            .option(OptionSpec::new("pair", 2).short('p').default_values(["x", "y"]))
            .option(OptionSpec::flag("quiet").short('q'))
            .build()
            .unwrap();

        let none: [&str; 0] = [];
        let m = schema.parse(&none).unwrap();
        assert_eq!(m.get("mode"), Some("slow"));
        assert_eq!(m.get_all("pair"), Some(&["x", "y"][..]));

        let argv = ["-m", "-q", "-p", "1", "2"];
        let m = schema.parse(&argv).unwrap();
        assert_eq!(m.get("mode"), Some("-q"));
        assert!(!m.flag("quiet"));
        assert_eq!(m.get_all("pair"), Some(&["1", "2"][..]));
    }

    #[test]
    fn prefix_match_first_declared_wins() {
        let schema = Schema::builder(app())
            .option(OptionSpec::flag("fast").short('f'))
            .option(OptionSpec::value("file").long("file"))
            .positional(PositionalSpec::new("rest").capture_remaining())
            .build()
            .unwrap();

        // `-fstrict` is taken by `-f`.
        let argv = ["-fstrict"];
        let m = schema.parse(&argv).unwrap();
        assert!(m.flag("fast"));
        assert_eq!(m.get_all("rest"), Some(&[][..]));

        // `--filename` is a prefix match on `--file`.
        let argv = ["--filename", "x.txt"];
        let m = schema.parse(&argv).unwrap();
        assert_eq!(m.get("file"), Some("x.txt"));
    }

    #[test]
    fn earlier_declaration_shadows_later_prefix() {
        let schema = Schema::builder(app())
            .option(OptionSpec::flag("color").long("color"))
            .option(OptionSpec::value("colormap").long("colormap"))
            .build()
            .unwrap();
        let argv = ["--colormap", "viridis"];
        // `--colormap` matches `--color` first; `viridis` has nowhere to go.
        assert_eq!(kind(&schema, &argv), ErrorKind::UnparsedArguments);
    }

    #[test]
    fn option_phase_never_resumes() {
        let schema = fbzc();
        let argv = ["c", "-f"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(err, ParseError::UnparsedArguments(vec!["-f".to_string()]));
    }

    #[test]
    fn help_prefix_aborts_parse() {
        let schema = fbzc();
        let cases: [&[&str]; 5] = [&["-h"], &["--help"], &["-hx"], &["--helpme"], &["-f", "-h", "junk"]];
        for argv in cases {
            let err = schema.parse(argv).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::HelpRequested, "{argv:?}");
            assert!(!err.is_fatal());
            let ParseError::HelpRequested(text) = err else {
                unreachable!()
            };
            assert_eq!(text, schema.help());
        }
    }

    #[test]
    fn help_is_not_detected_in_values_or_positionals() {
        let schema = fbzc();
        let argv = ["-b", "-h", "c"];
        let m = schema.parse(&argv).unwrap();
        assert_eq!(m.get("bar"), Some("-h"));
        assert_eq!(m.get("cux"), Some("c"));

        assert_eq!(kind(&schema, &["c", "--help"]), ErrorKind::UnparsedArguments);
    }

    #[test]
    fn repeated_option() {
        let schema = fbzc();
        let argv = ["-f", "--foo", "c"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(err, ParseError::RepeatedOption("--foo".to_string()));
    }

    #[test]
    fn missing_option_argument() {
        let schema = fbzc();
        let argv = ["-z", "a"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingOptionArgument {
                option: "-z".to_string(),
                expected: 2,
                found: 1
            }
        );
        assert_eq!(kind(&schema, &["-b"]), ErrorKind::MissingOptionArgument);
    }

    #[test]
    fn invalid_option_argument() {
        let schema = Schema::builder(app())
            .option(
                OptionSpec::new("pair", 2)
                    .long("pair")
                    .possible_values(["a", "b"]),
            )
            .build()
            .unwrap();
        let argv = ["--pair", "a", "c"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidOptionArgument {
                option: "--pair".to_string(),
                value: "c".to_string(),
                possible: vec!["a".to_string(), "b".to_string()],
            }
        );
        let argv = ["--pair", "b", "a"];
        assert_eq!(schema.parse(&argv).unwrap().get_all("pair"), Some(&["b", "a"][..]));
    }

    #[test]
    fn missing_positional() {
        let schema = Schema::builder(app())
            .positional(PositionalSpec::new("src"))
            .positional(PositionalSpec::new("dst"))
            .build()
            .unwrap();
        let argv = ["a"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(err, ParseError::MissingPositional("dst".to_string()));
    }

    #[test]
    fn unparsed_arguments() {
        let schema = fbzc();
        let argv = ["c", "d", "e"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnparsedArguments(vec!["d".to_string(), "e".to_string()])
        );
    }

    #[test]
    fn missing_required_option_precedes_missing_positional() {
        let schema = Schema::builder(app())
            .option(OptionSpec::value("out").short('o').long("out").required())
            .positional(PositionalSpec::new("input"))
            .build()
            .unwrap();
        let none: [&str; 0] = [];
        let err = schema.parse(&none).unwrap_err();
        assert_eq!(err, ParseError::MissingRequiredOption("--out".to_string()));

        let argv = ["-o", "x"];
        assert_eq!(kind(&schema, &argv), ErrorKind::MissingPositional);
    }

    #[test]
    fn missing_positional_precedes_conflicts() {
        let schema = Schema::builder(app())
            .option(OptionSpec::flag("a").short('a').conflicts_with(["b"]))
            .option(OptionSpec::flag("b").short('b'))
            .positional(PositionalSpec::new("input"))
            .build()
            .unwrap();
        let argv = ["-a", "-b"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(err, ParseError::MissingPositional("input".to_string()));

        let argv = ["-a", "-b", "in.txt"];
        assert_eq!(kind(&schema, &argv), ErrorKind::ConflictingOptions);
    }

    #[test]
    fn single_value_outside_possible_values() {
        let schema = Schema::builder(app())
            .option(OptionSpec::value("mode").short('m').possible_values(["x"]))
            .positional(PositionalSpec::new("rest").capture_remaining())
            .build()
            .unwrap();
        let argv = ["-m", "y", "z"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidOptionArgument {
                option: "-m".to_string(),
                value: "y".to_string(),
                possible: vec!["x".to_string()],
            }
        );

        let argv = ["-m", "x", "z"];
        let m = schema.parse(&argv).unwrap();
        assert_eq!(m.get("mode"), Some("x"));
        assert_eq!(m.get_all("rest"), Some(&["z"][..]));
    }

    #[test]
    fn conflicts_are_checked_from_declaring_side_only() {
        let schema = Schema::builder(app())
            .option(OptionSpec::flag("json").long("json").conflicts_with(["plain"]))
            .option(OptionSpec::flag("plain").short('p'))
            .build()
            .unwrap();
        let argv = ["-p", "--json"];
        let err = schema.parse(&argv).unwrap_err();
        assert_eq!(
            err,
            ParseError::ConflictingOptions {
                option: "--json".to_string(),
                other: "-p".to_string()
            }
        );

        let one_sided = Schema::builder(app())
            .option(OptionSpec::flag("json").long("json"))
            .option(OptionSpec::flag("plain").short('p').conflicts_with(["json"]))
            .build()
            .unwrap();
        assert!(one_sided.parse(&["--json"]).is_ok());
        assert_eq!(kind(&one_sided, &["--json", "-p"]), ErrorKind::ConflictingOptions);
    }

    #[test]
    fn capture_takes_exactly_the_extra_tokens() {
        let schema = Schema::builder(app())
            .option(OptionSpec::flag("verbose").short('v'))
            .positional(PositionalSpec::new("cmd"))
            .positional(PositionalSpec::new("args").capture_remaining())
            .build()
            .unwrap();

        for extra in 0..4 {
            let mut argv = vec!["-v".to_string(), "run".to_string()];
            let tail: Vec<String> = (0..extra).map(|i| format!("-x{i}")).collect();
            argv.extend(tail.iter().cloned());
            let m = schema.parse(&argv).unwrap();
            assert_eq!(m.get("cmd"), Some("run"));
            let captured: Vec<&str> = tail.iter().map(String::as_str).collect();
            assert_eq!(m.value("args"), Some(&Value::Captured(captured)));
            assert!(m.is_present("args"));
        }
    }

    #[test]
    fn capture_only_schema_accepts_empty_input() {
        let schema = Schema::builder(app())
            .positional(PositionalSpec::new("files").capture_remaining())
            .build()
            .unwrap();
        let none: Vec<String> = Vec::new();
        let m = schema.parse(&none).unwrap();
        assert_eq!(m.get_all("files"), Some(&[][..]));
    }

    #[test]
    fn arity_n_without_default_is_n_empty_strings() {
        let schema = Schema::builder(app())
            .option(OptionSpec::new("rgb", 3).long("rgb"))
            .build()
            .unwrap();
        let none: [&str; 0] = [];
        assert_eq!(schema.parse(&none).unwrap().get_all("rgb"), Some(&["", "", ""][..]));
        let argv = ["--rgb", "1", "2", "3"];
        assert_eq!(schema.parse(&argv).unwrap().get_all("rgb"), Some(&["1", "2", "3"][..]));
    }

    #[test]
    fn required_flag_must_be_given() {
        let schema = Schema::builder(app())
            .option(OptionSpec::flag("yes").short('y').required())
            .build()
            .unwrap();
        assert_eq!(kind(&schema, &["x"]), ErrorKind::UnparsedArguments);
        let none: [&str; 0] = [];
        assert_eq!(kind(&schema, &none), ErrorKind::MissingRequiredOption);
        assert!(schema.parse(&["-y"]).unwrap().flag("yes"));
    }
}
