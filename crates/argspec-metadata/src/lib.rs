//! Serializable schema documents for argspec.
//!
//! A [`SchemaDoc`] mirrors [`argspec::Schema`] as plain data so schemas can be
//! kept in JSON files. Converting a document into a `Schema` runs the same
//! validation as the builder.

use argspec::{AppInfo, OptionSpec, PositionalSpec, Schema, SchemaError};
use serde::{Deserialize, Serialize};

/// Document format written by [`SchemaDoc::to_json`].
pub const FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

fn default_version() -> String {
    "0.0.0".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema document format {0} (expected {FORMAT_VERSION})")]
    UnsupportedFormat(u32),

    #[error("invalid version '{version}': {source}")]
    Version {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("option '{name}': short form must be a single character, got '{short}'")]
    InvalidShort { name: String, short: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OptionDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metavar: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub arity: usize,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<String>,
}

impl OptionDoc {
    fn to_spec(&self) -> Result<OptionSpec, MetadataError> {
        let mut spec = OptionSpec::new(self.name.clone(), self.arity)
            .description(self.description.clone())
            .conflicts_with(self.conflicts_with.iter().cloned());
        if let Some(short) = &self.short {
            let mut chars = short.strip_prefix('-').unwrap_or(short).chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(MetadataError::InvalidShort {
                    name: self.name.clone(),
                    short: short.clone(),
                });
            };
            spec = spec.short(c);
        }
        if let Some(long) = &self.long {
            spec = spec.long(long.clone());
        }
        if let Some(metavar) = &self.metavar {
            spec = spec.metavar(metavar.clone());
        }
        if self.required {
            spec = spec.required();
        }
        if let Some(default) = &self.default {
            spec = spec.default_values(default.iter().cloned());
        }
        if let Some(possible) = &self.possible_values {
            spec = spec.possible_values(possible.iter().cloned());
        }
        Ok(spec)
    }

    fn from_spec(spec: &OptionSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            short: spec.get_short().map(String::from),
            long: spec.get_long().map(str::to_string),
            metavar: Some(spec.get_metavar().to_string()),
            description: spec.get_description().to_string(),
            arity: spec.get_arity(),
            required: spec.is_required(),
            default: spec.get_default().map(<[String]>::to_vec),
            possible_values: spec.get_possible_values().map(<[String]>::to_vec),
            conflicts_with: spec.get_conflicts_with().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct PositionalDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metavar: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub capture_remaining: bool,
}

impl PositionalDoc {
    fn to_spec(&self) -> PositionalSpec {
        let mut spec = PositionalSpec::new(self.name.clone()).description(self.description.clone());
        if let Some(metavar) = &self.metavar {
            spec = spec.metavar(metavar.clone());
        }
        if self.capture_remaining {
            spec = spec.capture_remaining();
        }
        spec
    }

    fn from_spec(spec: &PositionalSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            metavar: Some(spec.get_metavar().to_string()),
            description: spec.get_description().to_string(),
            capture_remaining: spec.is_capturing(),
        }
    }
}

/// A whole application schema as a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SchemaDoc {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// `major.minor.patch`
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positionals: Vec<PositionalDoc>,
}

impl SchemaDoc {
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describe an existing schema. Defaults are written out explicitly.
    pub fn from_schema(schema: &Schema) -> Self {
        let app = schema.app();
        Self {
            format_version: FORMAT_VERSION,
            name: app.name().to_string(),
            description: app.description().to_string(),
            version: app.version().to_string(),
            options: schema.options().iter().map(OptionDoc::from_spec).collect(),
            positionals: schema
                .positionals()
                .iter()
                .map(PositionalDoc::from_spec)
                .collect(),
        }
    }

    /// Validate the document and build the schema it describes.
    pub fn to_schema(&self) -> Result<Schema, MetadataError> {
        if self.format_version != FORMAT_VERSION {
            return Err(MetadataError::UnsupportedFormat(self.format_version));
        }
        let version =
            semver::Version::parse(&self.version).map_err(|source| MetadataError::Version {
                version: self.version.clone(),
                source,
            })?;
        let app = AppInfo::with_version(self.name.clone(), self.description.clone(), version);

        let options = self
            .options
            .iter()
            .map(OptionDoc::to_spec)
            .collect::<Result<Vec<_>, _>>()?;
        let schema = Schema::builder(app)
            .options(options)
            .positionals(self.positionals.iter().map(PositionalDoc::to_spec))
            .build()?;
        Ok(schema)
    }
}
