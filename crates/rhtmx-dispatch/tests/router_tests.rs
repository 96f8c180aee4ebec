//! Integration tests for the route registry
//!
//! Covers registration, first-match lookup, identity replacement, named lookup
//! and reverse URL generation through the router.

use pretty_assertions::assert_eq;
use rhtmx_dispatch::*;
use rstest::rstest;
use std::collections::HashMap;

fn news_router() -> Router {
    let mut router = Router::new();
    router
        .get("/news/{section}/{id}", "NewsController@show")
        .unwrap()
        .rule("id", "[0-9]+")
        .name("news.show");
    router
        .get("/news/{id}", "NewsController@legacy")
        .unwrap()
        .rule("id", "[0-9]{3,6}")
        .name("news.legacy");
    router
        .post("/news", "NewsController@store")
        .unwrap()
        .name("news.store");
    router
        .get("/blog/{section}/{id}", "BlogController@show")
        .unwrap()
        .name("blog.show");
    router
        .get("/posts/{section}/{?page}", "PostController@index")
        .unwrap()
        .name("posts.index");
    router
}

// ============================================================================
// Registration
// ============================================================================

#[rstest]
#[case::get(Route::get("/r", "r"), "GET")]
#[case::post(Route::post("/r", "r"), "POST")]
#[case::put(Route::put("/r", "r"), "PUT")]
#[case::delete(Route::delete("/r", "r"), "DELETE")]
fn test_method_constructors(#[case] route: Result<Route, RouteError>, #[case] method: &str) {
    let route = route.unwrap();
    assert_eq!(route.methods(), &[method.to_string()]);
}

#[test]
fn test_any_accepts_standard_methods() {
    let mut router = Router::new();
    router.any("/ping", "ping").unwrap();

    for method in ["GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS", "TRACE", "CONNECT", "PATCH"] {
        assert!(router.match_route("/ping", method).is_ok(), "{} should match", method);
    }
    assert!(router.match_route("/ping", "PROPFIND").is_err());
}

#[rstest]
#[case("")]
#[case(" ")]
#[case("\t\n")]
fn test_empty_route_rejected(#[case] template: &str) {
    let mut router = Router::new();
    let err = router.get(template, "home").unwrap_err();

    assert!(matches!(err, RouteError::EmptyRoute));
    assert!(err.is_invalid_argument());
    assert!(router.is_empty());
}

#[test]
fn test_same_identity_overwrites() {
    let mut router = Router::new();
    router.get("/about", "old").unwrap().name("about.old");
    router.get("/contact", "contact").unwrap();
    router.get("/about", "new").unwrap().name("about");

    assert_eq!(router.len(), 2);
    let templates: Vec<&str> = router.routes().iter().map(Route::template).collect();
    assert_eq!(templates, vec!["/about", "/contact"]);
    assert!(router.route_by_name("about.old").is_err());
    assert!(matches!(
        router.match_route("/about", "GET").unwrap().handler(),
        Handler::Function(name) if name == "new"
    ));
}

#[test]
fn test_same_template_different_methods_coexist() {
    let mut router = Router::new();
    router.get("/form", "show").unwrap();
    router.post("/form", "submit").unwrap();

    assert_eq!(router.len(), 2);
    assert!(matches!(
        router.match_route("/form", "POST").unwrap().handler(),
        Handler::Function(name) if name == "submit"
    ));
}

#[test]
fn test_register_detached_route() {
    let route = Route::some(["get", "head"], "/feed", "feed")
        .unwrap()
        .with_name("feed");
    let router = Router::new().with_route(route);

    assert_eq!(router.route_by_name("feed").unwrap().methods(), &["GET", "HEAD"]);
    assert!(router.match_route("/feed", "HEAD").is_ok());
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_rule_floor_rejects_short_id() {
    let router = news_router();

    let err = router.match_route("/news/86", "GET").unwrap_err();
    assert!(err.is_not_matched());

    let route = router.match_route("/news/865", "GET").unwrap();
    assert_eq!(route.get_name(), Some("news.legacy"));
}

#[test]
fn test_get_route_does_not_match_post() {
    let router = news_router();
    assert!(router.match_route("/news/it/16", "POST").is_err());
    assert_eq!(
        router.match_route("/news", "POST").unwrap().get_name(),
        Some("news.store")
    );
    assert!(router.match_route("/news", "GET").is_err());
}

#[test]
fn test_first_registered_match_wins() {
    let mut router = Router::new();
    router.get("/users/{name}", "profile").unwrap();
    router.get("/users/{id}", "by_id").unwrap().rule("id", "[0-9]+");

    let route = router.match_route("/users/42", "GET").unwrap();
    assert_eq!(route.template(), "/users/{name}");
}

#[test]
fn test_match_is_case_insensitive_by_default() {
    let router = news_router();
    let route = router.match_route("/NEWS/it/16", "get").unwrap();
    assert_eq!(route.get_name(), Some("news.show"));
}

#[test]
fn test_match_requires_full_path() {
    let router = news_router();
    assert!(router.match_route("/news/it/16/comments", "GET").is_err());
    assert!(router.match_route("/prefix/news/it/16", "GET").is_err());
}

#[test]
fn test_optional_parameter_keeps_slash() {
    let router = news_router();
    assert!(router.match_route("/posts/it/", "GET").is_ok());
    assert!(router.match_route("/posts/it/3", "GET").is_ok());
    assert!(router.match_route("/posts/it", "GET").is_err());
}

#[test]
fn test_not_matched_carries_request() {
    let router = Router::new();
    let err = router.match_route("/nope", "GET").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestNotMatched);
    assert_eq!(err.request_path(), Some("/nope"));
    assert_eq!(err.request_method(), Some("GET"));
    assert_eq!(err.to_string(), "Request not matched: GET /nope");
}

#[test]
fn test_invalid_rule_propagates_from_match() {
    let mut router = Router::new();
    router.get("/bad/{id}", "bad").unwrap().rule("id", "(unclosed");

    let err = router.match_route("/bad/1", "GET").unwrap_err();
    assert!(matches!(err, RouteError::InvalidPattern { ref template, .. } if template == "/bad/{id}"));
    assert!(err.is_invalid_argument());
}

#[test]
fn test_uncompilable_route_stops_scan_before_later_match() {
    let mut router = Router::new();
    router.get("/bad/{id}", "bad").unwrap().rule("id", "(unclosed");
    router.get("/good", "good").unwrap();

    let err = router.match_route("/good", "GET").unwrap_err();
    assert!(matches!(err, RouteError::InvalidPattern { .. }));
}

#[test]
fn test_method_filter_skips_uncompilable_routes() {
    let mut router = Router::new();
    router.post("/bad/{id}", "bad").unwrap().rule("id", "(unclosed");
    router.get("/bad/{id}", "good").unwrap();

    assert!(router.match_route("/bad/1", "GET").is_ok());
}

// ============================================================================
// Named Routes
// ============================================================================

#[test]
fn test_route_by_name() {
    let router = news_router();
    assert_eq!(
        router.route_by_name("blog.show").unwrap().template(),
        "/blog/{section}/{id}"
    );
}

#[test]
fn test_route_by_name_missing() {
    let router = news_router();
    let err = router.route_by_name("missing").unwrap_err();

    assert!(matches!(err, RouteError::RouteNotDefined(ref name) if name == "missing"));
    assert!(err.is_invalid_argument());
}

#[test]
fn test_duplicate_names_resolve_to_first_registered() {
    let mut router = Router::new();
    router.get("/one", "one").unwrap().name("dup");
    router.get("/two", "two").unwrap().name("dup");

    assert_eq!(router.route_by_name("dup").unwrap().template(), "/one");
}

#[test]
fn test_url_for() {
    let router = news_router();

    let mut params = HashMap::new();
    params.insert("section".to_string(), "it".to_string());
    params.insert("id".to_string(), "16".to_string());

    assert_eq!(router.url_for("blog.show", &params).unwrap(), "/blog/it/16");
}

#[rstest]
#[case::optional_given(&[("section", "it"), ("page", "2")], "/posts/it/2")]
#[case::optional_omitted(&[("section", "it")], "/posts/it/")]
fn test_url_for_params_optional(#[case] params: &[(&str, &str)], #[case] expected: &str) {
    let router = news_router();
    assert_eq!(router.url_for_params("posts.index", params).unwrap(), expected);
}

#[test]
fn test_url_for_missing_required() {
    let router = news_router();
    let err = router.url_for_params("blog.show", &[("id", "16")]).unwrap_err();

    assert_eq!(err.to_string(), "Missing required parameter [section]");
    assert!(err.is_invalid_argument());
}

#[test]
fn test_url_for_unknown_name() {
    let router = news_router();
    assert!(matches!(
        router.url_for_params("nope", &[]),
        Err(RouteError::RouteNotDefined(_))
    ));
}
