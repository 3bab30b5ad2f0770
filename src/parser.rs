//! Token parsing and application against a binding registry.

use crate::coerce::{coerce, SlotType, Value};
use crate::help::{render_help, HelpSource};
use crate::registry::Registry;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io;
use thiserror::Error;

/// Errors that can occur during argument parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("invalid value '{value}' for key '{key}': expected {expected}")]
    TypeMismatch {
        key: String,
        value: String,
        expected: SlotType,
    },

    #[error("missing value for key: {0}")]
    MissingValue(String),

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("failed to write help text: {0}")]
    HelpSink(#[from] io::Error),
}

/// What the parser does after the first unresolvable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop consuming tokens at the first failure.
    #[default]
    FailFast,
    /// Keep consuming and applying later tokens; the first failure is
    /// still reported at the end.
    Continue,
}

/// Per-invocation parser configuration.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Compare keys exactly, or lowercase both sides first.
    pub case_sensitive: bool,
    /// What to do after the first unresolvable token.
    pub failure: FailurePolicy,
    /// Keys skipped without error and without coercion, typically drawn
    /// from registries being multiplexed over the same token sequence.
    pub ignored: HashSet<String>,
    /// Program description prepended to rendered help.
    pub description: String,
    /// Append the fixed tag-convention lines to rendered help.
    pub show_syntax: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            failure: FailurePolicy::FailFast,
            ignored: HashSet::new(),
            description: String::new(),
            show_syntax: true,
        }
    }
}

/// Result of a successful parse: the declared keys that received a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub touched: BTreeSet<String>,
}

impl ParseSummary {
    /// Whether the given declared key received a value.
    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.contains(key)
    }
}

/// Walks a token sequence and applies recognized tags to a target
/// through its binding registry.
///
/// A parser is a plain value owned by the caller; it carries the parse
/// options and the per-key observer table. Three token shapes are
/// recognized: `--key` followed by a single value token, `+key` setting
/// a boolean slot true, and `-key` setting it false.
pub struct Parser {
    options: ParseOptions,
    observers: HashMap<String, Box<dyn FnMut(&str)>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            observers: HashMap::new(),
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Register a callback invoked after a fully successful parse for
    /// the given declared key, if that key was touched.
    ///
    /// At most one observer per key: a second registration returns
    /// false and leaves the existing observer in place.
    pub fn observe<F>(&mut self, key: impl Into<String>, callback: F) -> bool
    where
        F: FnMut(&str) + 'static,
    {
        let key = key.into();
        if self.observers.contains_key(&key) {
            return false;
        }
        self.observers.insert(key, Box::new(callback));
        true
    }

    /// Parse a token sequence, applying recognized tags to the target.
    ///
    /// Tokens are trimmed before classification. The token after a
    /// `--key` tag is consumed verbatim as that key's value, whatever
    /// its own shape. On success, each touched key with a registered
    /// observer gets exactly one callback; observers never fire when any
    /// failure occurred.
    pub fn parse<C>(
        &mut self,
        registry: &Registry<C>,
        target: &mut C,
        tokens: &[String],
    ) -> Result<ParseSummary, ParseError> {
        let mut summary = ParseSummary::default();
        let mut first_error: Option<ParseError> = None;
        let mut pending: Option<String> = None;

        for raw in tokens {
            let token = raw.trim();

            if let Some(key) = pending.take() {
                match self.apply_value(registry, target, &key, token) {
                    Ok(Some(touched)) => {
                        summary.touched.insert(touched);
                    }
                    Ok(None) => {}
                    Err(err) => self.stash(&mut first_error, err)?,
                }
                continue;
            }

            if let Some(key) = token.strip_prefix("--") {
                pending = Some(key.to_string());
            } else if let Some(key) = token.strip_prefix('+') {
                match self.apply_boolean(registry, target, key, true) {
                    Ok(Some(touched)) => {
                        summary.touched.insert(touched);
                    }
                    Ok(None) => {}
                    Err(err) => self.stash(&mut first_error, err)?,
                }
            } else if let Some(key) = token.strip_prefix('-') {
                match self.apply_boolean(registry, target, key, false) {
                    Ok(Some(touched)) => {
                        summary.touched.insert(touched);
                    }
                    Ok(None) => {}
                    Err(err) => self.stash(&mut first_error, err)?,
                }
            } else {
                let err = ParseError::UnexpectedToken(token.to_string());
                self.stash(&mut first_error, err)?;
            }
        }

        if let Some(key) = pending {
            let err = ParseError::MissingValue(key);
            self.stash(&mut first_error, err)?;
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        for key in &summary.touched {
            if let Some(callback) = self.observers.get_mut(key) {
                callback(key);
            }
        }

        Ok(summary)
    }

    /// Like [`Parser::parse`], but renders help text into the sink when
    /// parsing fails.
    pub fn parse_with_help<C>(
        &mut self,
        registry: &Registry<C>,
        target: &mut C,
        tokens: &[String],
        sink: &mut dyn io::Write,
    ) -> Result<ParseSummary, ParseError> {
        match self.parse(registry, target, tokens) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                let text = render_help(
                    &self.options.description,
                    self.options.show_syntax,
                    &[registry as &dyn HelpSource],
                );
                sink.write_all(text.as_bytes())?;
                Err(err)
            }
        }
    }

    /// Resolve a pending `--key` against its value token.
    ///
    /// Returns the declared key on application, or None when the key is
    /// in the ignore set (the value token is discarded with it).
    fn apply_value<C>(
        &self,
        registry: &Registry<C>,
        target: &mut C,
        key: &str,
        raw: &str,
    ) -> Result<Option<String>, ParseError> {
        if self.is_ignored(key) {
            return Ok(None);
        }

        let binding = registry
            .lookup(key, self.options.case_sensitive)
            .ok_or_else(|| ParseError::UnknownKey(key.to_string()))?;

        let mismatch = || ParseError::TypeMismatch {
            key: binding.key().to_string(),
            value: raw.to_string(),
            expected: binding.slot_type(),
        };

        let value = coerce(raw, binding.slot_type()).map_err(|_| mismatch())?;
        if !binding.assign(target, value) {
            return Err(mismatch());
        }
        Ok(Some(binding.key().to_string()))
    }

    /// Resolve a `+key`/`-key` tag.
    fn apply_boolean<C>(
        &self,
        registry: &Registry<C>,
        target: &mut C,
        key: &str,
        flag: bool,
    ) -> Result<Option<String>, ParseError> {
        if self.is_ignored(key) {
            return Ok(None);
        }

        let binding = registry
            .lookup(key, self.options.case_sensitive)
            .ok_or_else(|| ParseError::UnknownKey(key.to_string()))?;

        if !binding.slot_type().accepts(SlotType::Bool) {
            return Err(ParseError::TypeMismatch {
                key: binding.key().to_string(),
                value: flag.to_string(),
                expected: binding.slot_type(),
            });
        }

        binding.assign(target, Value::Bool(flag));
        Ok(Some(binding.key().to_string()))
    }

    fn is_ignored(&self, key: &str) -> bool {
        if self.options.case_sensitive {
            self.options.ignored.contains(key)
        } else {
            let probe = key.to_lowercase();
            self.options
                .ignored
                .iter()
                .any(|k| k.to_lowercase() == probe)
        }
    }

    /// Record a failure: propagate immediately under fail-fast, keep the
    /// first one for the end under the continue policy.
    fn stash(
        &self,
        first_error: &mut Option<ParseError>,
        err: ParseError,
    ) -> Result<(), ParseError> {
        match self.options.failure {
            FailurePolicy::FailFast => Err(err),
            FailurePolicy::Continue => {
                first_error.get_or_insert(err);
                Ok(())
            }
        }
    }
}
