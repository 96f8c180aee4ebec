//! HTTP method tokens accepted by routes

/// Methods accepted by `any` routes when no configuration overrides them
pub const ANY_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS", "TRACE", "CONNECT", "PATCH",
];

/// Normalizes a list of method tokens to uppercase, preserving order
///
/// # Examples
///
/// ```
/// use rhtmx_dispatch::method::normalize_methods;
///
/// assert_eq!(normalize_methods(["get", "Post"]), vec!["GET", "POST"]);
/// ```
pub fn normalize_methods<I, S>(methods: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    methods
        .into_iter()
        .map(|m| m.as_ref().trim().to_uppercase())
        .collect()
}

/// Case-insensitive membership test
pub fn contains_method(methods: &[String], method: &str) -> bool {
    let wanted = method.trim().to_uppercase();
    methods.iter().any(|m| *m == wanted)
}
