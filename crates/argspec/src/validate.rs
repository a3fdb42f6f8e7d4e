//! Declaration-time checks run by [`crate::SchemaBuilder::build`].

use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;
use crate::schema::{OptionSpec, PositionalSpec};

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

fn validate_forms(opt: &OptionSpec) -> Result<(), SchemaError> {
    if opt.short.is_none() && opt.long.is_none() {
        return Err(SchemaError::MissingForm(opt.name.clone()));
    }
    if let Some(short) = opt.short {
        if short == '-' || short.is_whitespace() {
            return Err(SchemaError::InvalidShort {
                name: opt.name.clone(),
                short,
            });
        }
        // Help is detected before option matching, so `-h...` can never reach us.
        if short == 'h' {
            return Err(SchemaError::ReservedForm {
                name: opt.name.clone(),
                form: format!("-{short}"),
            });
        }
    }
    if let Some(long) = &opt.long {
        if !is_identifier(long) {
            return Err(SchemaError::InvalidLong {
                name: opt.name.clone(),
                long: long.clone(),
            });
        }
        if long.starts_with("help") {
            return Err(SchemaError::ReservedForm {
                name: opt.name.clone(),
                form: format!("--{long}"),
            });
        }
    }
    Ok(())
}

fn validate_values(opt: &OptionSpec) -> Result<(), SchemaError> {
    let name = &opt.name;
    if opt.arity == 0 {
        if opt.default.is_some() {
            return Err(SchemaError::FlagWithDefault(name.clone()));
        }
        if opt.possible_values.is_some() {
            return Err(SchemaError::FlagWithPossibleValues(name.clone()));
        }
        return Ok(());
    }

    if opt.required && opt.default.is_some() {
        return Err(SchemaError::RequiredWithDefault(name.clone()));
    }
    if let Some(possible) = &opt.possible_values {
        if let Some(bad) = possible.iter().find(|v| !is_identifier(v)) {
            return Err(SchemaError::InvalidPossibleValue {
                name: name.clone(),
                value: bad.clone(),
            });
        }
    }
    if let Some(default) = &opt.default {
        if default.len() != opt.arity {
            return Err(SchemaError::DefaultArity {
                name: name.clone(),
                arity: opt.arity,
                len: default.len(),
            });
        }
        if let Some(bad) = default.iter().find(|v| !opt.accepts(v)) {
            return Err(SchemaError::DefaultNotPossible {
                name: name.clone(),
                value: bad.clone(),
            });
        }
    }
    Ok(())
}

fn validate_option(opt: &OptionSpec) -> Result<(), SchemaError> {
    if !is_identifier(&opt.name) {
        return Err(SchemaError::InvalidName(opt.name.clone()));
    }
    validate_forms(opt)?;
    if opt.metavar.is_empty() {
        return Err(SchemaError::EmptyMetavar(opt.name.clone()));
    }
    // `required` on a flag is legal: it forces the flag to be given.
    validate_values(opt)
}

fn validate_positionals(positionals: &[PositionalSpec]) -> Result<(), SchemaError> {
    for (idx, pos) in positionals.iter().enumerate() {
        if !is_identifier(&pos.name) {
            return Err(SchemaError::InvalidName(pos.name.clone()));
        }
        if pos.metavar.is_empty() {
            return Err(SchemaError::EmptyMetavar(pos.name.clone()));
        }
        if !pos.capture_remaining {
            continue;
        }
        if idx + 1 != positionals.len() {
            if let Some(second) = positionals[idx + 1..].iter().find(|p| p.capture_remaining) {
                return Err(SchemaError::MultipleCapture {
                    first: pos.name.clone(),
                    second: second.name.clone(),
                });
            }
            return Err(SchemaError::CaptureNotLast(pos.name.clone()));
        }
    }
    Ok(())
}

fn validate_unique(
    options: &[OptionSpec],
    positionals: &[PositionalSpec],
) -> Result<(), SchemaError> {
    let mut names: HashSet<&str> = HashSet::new();
    let all = options
        .iter()
        .map(|o| o.name.as_str())
        .chain(positionals.iter().map(|p| p.name.as_str()));
    for name in all {
        if !names.insert(name) {
            return Err(SchemaError::DuplicateName(name.to_string()));
        }
    }

    let mut forms: HashMap<String, &str> = HashMap::new();
    for opt in options {
        for form in [opt.short_form(), opt.long_form()].into_iter().flatten() {
            if let Some(first) = forms.insert(form.clone(), &opt.name) {
                return Err(SchemaError::DuplicateForm {
                    form,
                    first: first.to_string(),
                    second: opt.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn validate_conflicts(options: &[OptionSpec]) -> Result<(), SchemaError> {
    let names: HashSet<&str> = options.iter().map(|o| o.name.as_str()).collect();
    for opt in options {
        for other in &opt.conflicts_with {
            if other == &opt.name {
                return Err(SchemaError::SelfConflict(opt.name.clone()));
            }
            if !names.contains(other.as_str()) {
                return Err(SchemaError::UnknownConflict {
                    name: opt.name.clone(),
                    other: other.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Reject the first violated invariant, or accept with no effect.
pub(crate) fn validate(
    options: &[OptionSpec],
    positionals: &[PositionalSpec],
) -> Result<(), SchemaError> {
    for opt in options {
        validate_option(opt)?;
    }
    validate_positionals(positionals)?;
    validate_unique(options, positionals)?;
    validate_conflicts(options)
}
