//! Error taxonomy for schema construction and argument parsing.

use std::io::{self, Write};

use crate::style::{self, Palette};

/// Suggestion printed below every parse diagnostic.
pub const SUGGESTION: &str = "use --help for more information";

/// A malformed schema declaration.
///
/// These are programmer errors: they are returned by [`crate::SchemaBuilder::build`]
/// before any argument is parsed, so a [`crate::Schema`] value is always valid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema error: name '{0}' must be non-empty and contain no whitespace")]
    InvalidName(String),

    #[error("schema error: '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("schema error: option '{0}' needs a short or a long form")]
    MissingForm(String),

    #[error("schema error: option '{name}' has an invalid short form '{short}'")]
    InvalidShort { name: String, short: char },

    #[error("schema error: option '{name}' has an invalid long form '{long}'")]
    InvalidLong { name: String, long: String },

    #[error("schema error: {form} maps to both '{first}' and '{second}'")]
    DuplicateForm {
        form: String,
        first: String,
        second: String,
    },

    #[error("schema error: {form} of option '{name}' is shadowed by -h/--help")]
    ReservedForm { name: String, form: String },

    #[error("schema error: '{0}' has an empty metavar")]
    EmptyMetavar(String),

    #[error("schema error: option '{0}' cannot be both required and defaulted")]
    RequiredWithDefault(String),

    #[error("schema error: flag '{0}' cannot have a default")]
    FlagWithDefault(String),

    #[error("schema error: flag '{0}' cannot restrict its possible values")]
    FlagWithPossibleValues(String),

    #[error("schema error: option '{name}' takes {arity} value(s) but its default has {len}")]
    DefaultArity {
        name: String,
        arity: usize,
        len: usize,
    },

    #[error("schema error: option '{name}' has an invalid possible value '{value}'")]
    InvalidPossibleValue { name: String, value: String },

    #[error("schema error: default '{value}' of option '{name}' is not a possible value")]
    DefaultNotPossible { name: String, value: String },

    #[error("schema error: option '{0}' conflicts with itself")]
    SelfConflict(String),

    #[error("schema error: '{name}' conflicts-with unknown option '{other}'")]
    UnknownConflict { name: String, other: String },

    #[error(
        "schema error: only one positional may capture remaining arguments ('{first}' and '{second}')"
    )]
    MultipleCapture { first: String, second: String },

    #[error("schema error: capturing positional '{0}' must be the last positional")]
    CaptureNotLast(String),
}

/// Machine-distinguishable parse outcome kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    HelpRequested,
    RepeatedOption,
    MissingOptionArgument,
    InvalidOptionArgument,
    MissingPositional,
    UnparsedArguments,
    MissingRequiredOption,
    ConflictingOptions,
}

/// The first failure detected while scanning an argument list.
///
/// Options and positionals are named by their preferred display form:
/// the long form if present, else the short form, else the internal name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// `-h`/`--help` was scanned. The payload is the rendered help text.
    ///
    /// This is not a failure; callers should print the text and exit cleanly.
    #[error("help requested")]
    HelpRequested(String),

    #[error("option '{0}' was given more than once")]
    RepeatedOption(String),

    #[error("option '{option}' expects {expected} value(s) but only {found} remain")]
    MissingOptionArgument {
        option: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid value '{value}' for '{option}'. possible values: {}", .possible.join(", "))]
    InvalidOptionArgument {
        option: String,
        value: String,
        possible: Vec<String>,
    },

    #[error("missing positional argument '{0}'")]
    MissingPositional(String),

    #[error("unexpected argument(s): {}", .0.join(" "))]
    UnparsedArguments(Vec<String>),

    #[error("missing required option '{0}'")]
    MissingRequiredOption(String),

    #[error("option '{option}' cannot be used with '{other}'")]
    ConflictingOptions { option: String, other: String },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HelpRequested(_) => ErrorKind::HelpRequested,
            Self::RepeatedOption(_) => ErrorKind::RepeatedOption,
            Self::MissingOptionArgument { .. } => ErrorKind::MissingOptionArgument,
            Self::InvalidOptionArgument { .. } => ErrorKind::InvalidOptionArgument,
            Self::MissingPositional(_) => ErrorKind::MissingPositional,
            Self::UnparsedArguments(_) => ErrorKind::UnparsedArguments,
            Self::MissingRequiredOption(_) => ErrorKind::MissingRequiredOption,
            Self::ConflictingOptions { .. } => ErrorKind::ConflictingOptions,
        }
    }

    /// Whether this outcome should terminate the program with a failure status.
    ///
    /// Only [`ParseError::HelpRequested`] is non-fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::HelpRequested(_))
    }

    /// Render the diagnostic: one message line plus the suggestion line.
    ///
    /// For a help request this is the help text itself.
    pub fn render(&self, palette: Palette) -> String {
        match self {
            Self::HelpRequested(help) => help.clone(),
            _ => format!(
                "{}: {}\n{}\n",
                palette.paint(style::RED, "error"),
                palette.paint(style::BOLD, &self.to_string()),
                palette.paint(style::YELLOW, SUGGESTION),
            ),
        }
    }

    /// Write [`ParseError::render`] output to `out`.
    pub fn report<W: Write>(&self, out: &mut W, palette: Palette) -> io::Result<()> {
        out.write_all(self.render(palette).as_bytes())?;
        out.flush()
    }

    /// Print the outcome to the right stream and exit the process.
    ///
    /// Help goes to stdout with status 0; everything else goes to stderr with
    /// status 1.
    pub fn exit(&self) -> ! {
        if self.is_fatal() {
            let _ = self.report(&mut io::stderr().lock(), Palette::for_stderr());
            std::process::exit(1);
        }
        let _ = self.report(&mut io::stdout().lock(), Palette::plain());
        std::process::exit(0);
    }
}
