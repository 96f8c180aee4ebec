//! Template tokenizer for route patterns
//!
//! First pass of pattern compilation: splits a template like `/blog/{section}/{page?}` into
//! literal text and placeholders. Working on tokens keeps substitution exact even when one
//! parameter name is a prefix of another (`{id}` vs `{id_type}`).

/// One piece of a route template
///
/// # Examples
///
/// ```
/// use rhtmx_dispatch::route::pattern::{tokenize, TemplateSegment};
///
/// let segments = tokenize("/posts/{section}/{page?}");
/// assert_eq!(
///     segments,
///     vec![
///         TemplateSegment::Literal("/posts/".to_string()),
///         TemplateSegment::Placeholder { name: "section".to_string(), optional: false },
///         TemplateSegment::Literal("/".to_string()),
///         TemplateSegment::Placeholder { name: "page".to_string(), optional: true },
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSegment {
    /// Text copied as-is
    Literal(String),
    /// `{name}` or `{name?}`; `name` is the canonical name with every `?` stripped
    Placeholder { name: String, optional: bool },
}

/// Classifies the body of a `{...}` placeholder (pure function)
///
/// Any `?` marks the parameter optional, so both `page?` and `?page` parse the same way.
///
/// # Examples
///
/// ```
/// use rhtmx_dispatch::route::pattern::{classify_placeholder, TemplateSegment};
///
/// assert_eq!(
///     classify_placeholder("page?"),
///     TemplateSegment::Placeholder { name: "page".to_string(), optional: true }
/// );
/// assert_eq!(
///     classify_placeholder("id"),
///     TemplateSegment::Placeholder { name: "id".to_string(), optional: false }
/// );
/// ```
pub fn classify_placeholder(body: &str) -> TemplateSegment {
    TemplateSegment::Placeholder {
        name: body.replace('?', ""),
        optional: body.contains('?'),
    }
}

/// Splits a template into literal and placeholder segments (pure function)
///
/// A placeholder runs from `{` to the nearest following `}`. An unterminated `{` and
/// everything after it stays literal. Adjacent literal text is merged into one segment.
pub fn tokenize(template: &str) -> Vec<TemplateSegment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            break;
        };

        literal.push_str(&rest[..open]);
        if !literal.is_empty() {
            segments.push(TemplateSegment::Literal(std::mem::take(&mut literal)));
        }

        segments.push(classify_placeholder(&after_open[..close]));
        rest = &after_open[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(TemplateSegment::Literal(literal));
    }

    segments
}

/// Canonical names of every placeholder, in template order
pub fn placeholder_names(segments: &[TemplateSegment]) -> Vec<&str> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            TemplateSegment::Placeholder { name, .. } => Some(name.as_str()),
            TemplateSegment::Literal(_) => None,
        })
        .collect()
}
