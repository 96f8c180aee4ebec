//! Regex synthesis for route templates
//!
//! Second pass of pattern compilation. Folds the segments produced by
//! [`tokenize`](super::pattern::tokenize) into a regex source with one named group per
//! placeholder, then anchors and compiles it.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use super::pattern::{tokenize, TemplateSegment};
use crate::config::RoutingConfig;
use crate::error::RouteError;

/// Rule used for parameters without a custom constraint: one or more word characters
pub const DEFAULT_RULE: &str = r"\w+";

/// Options that influence how a template is compiled
#[derive(Debug, Clone, PartialEq)]
pub struct PatternOptions {
    /// Match paths without regard to case (default: true)
    pub case_insensitive: bool,
    /// Rule for parameters without a custom constraint
    pub default_rule: String,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            default_rule: DEFAULT_RULE.to_string(),
        }
    }
}

impl From<&RoutingConfig> for PatternOptions {
    fn from(config: &RoutingConfig) -> Self {
        Self {
            case_insensitive: config.case_insensitive,
            default_rule: config.default_rule.clone(),
        }
    }
}

/// A template compiled into a matchable regex
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    params: Vec<String>,
    rules: HashMap<String, String>,
}

impl CompiledPattern {
    /// The synthesized, unanchored pattern (`/news/(?P<id>[0-9]+)`)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The anchored regex used for full-path matching
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Canonical placeholder names, in template order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Rules in effect for every placeholder, defaults included
    pub fn rules(&self) -> &HashMap<String, String> {
        &self.rules
    }

    /// Full-string match against `path`
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Named captures for declared parameters that took part in the match
    ///
    /// Returns an empty map when the path does not match.
    pub fn captures(&self, path: &str) -> HashMap<String, String> {
        let Some(caps) = self.regex.captures(path) else {
            return HashMap::new();
        };

        self.params
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect()
    }
}

/// Accumulator for the fold over template segments
#[derive(Default)]
struct SynthesisState {
    source: String,
    params: Vec<String>,
    rules: HashMap<String, String>,
}

impl SynthesisState {
    /// `?` is dropped from literal text; only placeholders may be optional
    fn with_literal(mut self, text: &str) -> Self {
        self.source.extend(text.chars().filter(|&c| c != '?'));
        self
    }

    fn with_placeholder(mut self, name: &str, optional: bool, rule: String) -> Self {
        self.source.push_str("(?P<");
        self.source.push_str(name);
        self.source.push('>');
        self.source.push_str(&rule);
        self.source.push(')');
        if optional {
            self.source.push('?');
        }

        if !self.params.iter().any(|p| p == name) {
            self.params.push(name.to_string());
        }
        self.rules.insert(name.to_string(), rule);
        self
    }
}

/// Compiles a template with its declared rules
///
/// Literal text is copied verbatim apart from `?`, which is removed, so a template without
/// placeholders or `?` compiles to itself.
/// Each `{name}` becomes `(?P<name>rule)` and each `{name?}` becomes `(?P<name>rule)?`.
/// The whole pattern is anchored on both ends before compilation.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use rhtmx_dispatch::route::compiler::{compile, PatternOptions};
///
/// let mut rules = HashMap::new();
/// rules.insert("id".to_string(), "[0-9]+".to_string());
///
/// let compiled = compile("/news/{section}/{id}", &rules, &PatternOptions::default()).unwrap();
/// assert_eq!(compiled.source(), r"/news/(?P<section>\w+)/(?P<id>[0-9]+)");
/// assert!(compiled.is_match("/news/it/16"));
/// assert!(!compiled.is_match("/news/it/sixteen"));
/// ```
pub fn compile(
    template: &str,
    declared_rules: &HashMap<String, String>,
    options: &PatternOptions,
) -> Result<CompiledPattern, RouteError> {
    let state = tokenize(template)
        .iter()
        .fold(SynthesisState::default(), |state, segment| match segment {
            TemplateSegment::Literal(text) => state.with_literal(text),
            TemplateSegment::Placeholder { name, optional } => {
                let rule = declared_rules
                    .get(name)
                    .filter(|rule| !rule.is_empty())
                    .cloned()
                    .unwrap_or_else(|| options.default_rule.clone());
                state.with_placeholder(name, *optional, rule)
            }
        });

    let regex = RegexBuilder::new(&format!("^(?:{})$", state.source))
        .case_insensitive(options.case_insensitive)
        .unicode(true)
        .build()
        .map_err(|source| RouteError::InvalidPattern {
            template: template.to_string(),
            source,
        })?;

    tracing::trace!(template, pattern = %state.source, "route pattern compiled");

    Ok(CompiledPattern {
        source: state.source,
        regex,
        params: state.params,
        rules: state.rules,
    })
}
