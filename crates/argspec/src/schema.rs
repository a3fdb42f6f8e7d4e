//! Declarative description of an application's options and positionals.

use semver::Version;

use crate::error::SchemaError;
use crate::shape::Shape;
use crate::validate;

/// Metavar used by options that do not declare one.
pub const DEFAULT_METAVAR: &str = "ARG";

/// Static identity of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    name: String,
    description: String,
    version: Version,
}

impl AppInfo {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        major: u64,
        minor: u64,
        patch: u64,
    ) -> Self {
        Self::with_version(name, description, Version::new(major, minor, patch))
    }

    /// Build from an existing version. Pre-release and build metadata are dropped.
    pub fn with_version(
        name: impl Into<String>,
        description: impl Into<String>,
        version: Version,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: Version::new(version.major, version.minor, version.patch),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

/// One declared switch.
///
/// An option with arity 0 is a flag, arity 1 takes a single value and arity N
/// takes a fixed tuple of N values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub(crate) name: String,
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) metavar: String,
    pub(crate) description: String,
    pub(crate) arity: usize,
    pub(crate) required: bool,
    pub(crate) default: Option<Vec<String>>,
    pub(crate) possible_values: Option<Vec<String>>,
    pub(crate) conflicts_with: Vec<String>,
}

impl OptionSpec {
    /// Declare an option with the given arity and no forms.
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            short: None,
            long: None,
            metavar: DEFAULT_METAVAR.to_string(),
            description: String::new(),
            arity,
            required: false,
            default: None,
            possible_values: None,
            conflicts_with: Vec::new(),
        }
    }

    /// A boolean flag (arity 0).
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, 0)
    }

    /// An option taking a single value (arity 1).
    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, 1)
    }

    /// Short form, given without the leading dash (`'f'` for `-f`).
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Long form, given without the leading dashes (`"foo"` for `--foo`).
    pub fn long(mut self, long: impl Into<String>) -> Self {
        let long = long.into();
        self.long = Some(long.strip_prefix("--").map(str::to_string).unwrap_or(long));
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = metavar.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Default values; the count must equal the arity.
    pub fn default_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value(self, value: impl Into<String>) -> Self {
        self.default_values([value.into()])
    }

    pub fn possible_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Names of options that may not be given together with this one.
    ///
    /// Only this option's list is consulted when parsing, so symmetric
    /// conflicts must be declared on both sides.
    pub fn conflicts_with<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflicts_with.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_short(&self) -> Option<char> {
        self.short
    }

    pub fn get_long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn get_metavar(&self) -> &str {
        &self.metavar
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_arity(&self) -> usize {
        self.arity
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn get_default(&self) -> Option<&[String]> {
        self.default.as_deref()
    }

    pub fn get_possible_values(&self) -> Option<&[String]> {
        self.possible_values.as_deref()
    }

    pub fn get_conflicts_with(&self) -> &[String] {
        &self.conflicts_with
    }

    /// `-x`, if a short form is declared.
    pub fn short_form(&self) -> Option<String> {
        self.short.map(|c| format!("-{c}"))
    }

    /// `--name`, if a long form is declared.
    pub fn long_form(&self) -> Option<String> {
        self.long.as_ref().map(|l| format!("--{l}"))
    }

    /// Long form, else short form, else the internal name.
    pub fn display_name(&self) -> String {
        self.long_form()
            .or_else(|| self.short_form())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Whether `token` starts with this option's short or long form.
    ///
    /// This is a prefix test: `-fstrict` matches `-f`.
    pub(crate) fn matches(&self, token: &str) -> bool {
        let short = self.short.is_some_and(|c| {
            token
                .strip_prefix('-')
                .is_some_and(|rest| rest.starts_with(c))
        });
        let long = self.long.as_deref().is_some_and(|l| {
            token
                .strip_prefix("--")
                .is_some_and(|rest| rest.starts_with(l))
        });
        short || long
    }

    pub(crate) fn accepts(&self, value: &str) -> bool {
        self.possible_values
            .as_ref()
            .is_none_or(|p| p.iter().any(|v| v == value))
    }
}

/// One declared positional slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSpec {
    pub(crate) name: String,
    pub(crate) metavar: String,
    pub(crate) description: String,
    pub(crate) capture_remaining: bool,
}

impl PositionalSpec {
    /// Declare a positional; the metavar defaults to the upper-cased name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            metavar: name.to_uppercase(),
            name,
            description: String::new(),
            capture_remaining: false,
        }
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = metavar.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Absorb every remaining token. Only the last positional may capture.
    pub fn capture_remaining(mut self) -> Self {
        self.capture_remaining = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_metavar(&self) -> &str {
        &self.metavar
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn is_capturing(&self) -> bool {
        self.capture_remaining
    }
}

/// Collects declarations; [`SchemaBuilder::build`] validates them.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    app: AppInfo,
    options: Vec<OptionSpec>,
    positionals: Vec<PositionalSpec>,
}

impl SchemaBuilder {
    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = OptionSpec>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn positional(mut self, positional: PositionalSpec) -> Self {
        self.positionals.push(positional);
        self
    }

    pub fn positionals(mut self, positionals: impl IntoIterator<Item = PositionalSpec>) -> Self {
        self.positionals.extend(positionals);
        self
    }

    /// Validate every declaration and derive the result shape.
    pub fn build(self) -> Result<Schema, SchemaError> {
        validate::validate(&self.options, &self.positionals)?;
        let shape = Shape::of(&self.options, &self.positionals);
        tracing::debug!(
            app = self.app.name(),
            options = self.options.len(),
            positionals = self.positionals.len(),
            "schema validated"
        );
        Ok(Schema {
            app: self.app,
            options: self.options,
            positionals: self.positionals,
            shape,
        })
    }
}

/// A validated schema. Only obtainable through [`SchemaBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    app: AppInfo,
    options: Vec<OptionSpec>,
    positionals: Vec<PositionalSpec>,
    shape: Shape,
}

impl Schema {
    pub fn builder(app: AppInfo) -> SchemaBuilder {
        SchemaBuilder {
            app,
            options: Vec::new(),
            positionals: Vec::new(),
        }
    }

    pub fn app(&self) -> &AppInfo {
        &self.app
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn positionals(&self) -> &[PositionalSpec] {
        &self.positionals
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }
}
