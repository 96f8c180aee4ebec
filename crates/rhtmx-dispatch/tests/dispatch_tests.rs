//! Integration tests for handler invocation
//!
//! Controllers, functions and actions are driven through `Route::execute` and
//! `Router::dispatch`, checking binding by name, defaults, dependencies and errors.

use pretty_assertions::assert_eq;
use rhtmx_dispatch::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct ForTest;

impl ForTest {
    fn my_method(&self, args: BoundArguments) -> anyhow::Result<serde_json::Value> {
        Ok(json!(format!(
            "{}/{}/{}",
            args.text("folder")?,
            args.text("section")?,
            args.text("id")?
        )))
    }
}

#[derive(Default)]
struct Mailer {
    from: String,
}

fn handlers() -> HandlerRegistry {
    let mut handlers = HandlerRegistry::new();
    handlers
        .controller::<ForTest>("ForTest")
        .method(
            "myMethod",
            Signature::of(["folder", "section", "id"]),
            ForTest::my_method,
        );
    handlers.function("home", Signature::new(), |_| Ok(json!("home")));
    handlers
}

#[test]
fn test_action_binds_by_name_not_order() {
    let action = Action::new(Signature::of(["id", "section"]), |args| {
        Ok(json!([args.text("id")?, args.text("section")?]))
    });
    let route = Route::get("/news/{section}/{id}", action)
        .unwrap()
        .with_rule("id", "[0-9]+");

    let output = route
        .execute("/news/development/86", &HandlerRegistry::new())
        .unwrap();
    assert_eq!(output, json!(["86", "development"]));
}

#[test]
fn test_controller_method_reference() {
    let route = Route::get("/{folder}/{section}/{id}", "ForTest@myMethod").unwrap();
    let output = route.execute("/catalog/phones/6", &handlers()).unwrap();
    assert_eq!(output, json!("catalog/phones/6"));
}

#[test]
fn test_function_reference() {
    let mut router = Router::new();
    router.get("/", "home").unwrap();

    assert_eq!(router.dispatch("/", "GET", &handlers()).unwrap(), json!("home"));
}

#[test]
fn test_dispatch_not_matched() {
    let router = Router::new();
    let err = router.dispatch("/nope", "GET", &handlers()).unwrap_err();
    assert!(err.is_not_matched());
}

#[test]
fn test_default_value_fills_missing_optional() {
    let action = Action::new(
        Signature::new().param("section").param_or("page", 1),
        |args| Ok(json!({ "section": args.text("section")?, "page": args.value("page")? })),
    );

    let mut router = Router::new();
    router.get("/posts/{section}/{page?}", action).unwrap();

    let handlers = HandlerRegistry::new();
    assert_eq!(
        router.dispatch("/posts/it/", "GET", &handlers).unwrap(),
        json!({ "section": "it", "page": 1 })
    );
    assert_eq!(
        router.dispatch("/posts/it/4", "GET", &handlers).unwrap(),
        json!({ "section": "it", "page": "4" })
    );
}

#[test]
fn test_dependency_constructed_for_each_call() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    let mut handlers = HandlerRegistry::new();
    handlers.dependency_with(|| {
        BUILT.fetch_add(1, Ordering::SeqCst);
        Mailer {
            from: "news@example.com".to_string(),
        }
    });
    handlers.function(
        "notify",
        Signature::new().inject::<Mailer>("mailer").param("id"),
        |args| {
            let mailer: Arc<Mailer> = args.dependency("mailer")?;
            Ok(json!({ "from": mailer.from.clone(), "id": args.text("id")? }))
        },
    );

    let mut router = Router::new();
    router.post("/notify/{id}", "notify").unwrap();

    for _ in 0..2 {
        let output = router.dispatch("/notify/5", "POST", &handlers).unwrap();
        assert_eq!(output, json!({ "from": "news@example.com", "id": "5" }));
    }
    assert_eq!(BUILT.load(Ordering::SeqCst), 2);
}

#[test]
fn test_path_value_wins_over_dependency() {
    let mut handlers = HandlerRegistry::new();
    handlers.dependency::<Mailer>();

    let action = Action::new(Signature::new().inject::<Mailer>("mailer"), |args| {
        Ok(json!(args.text("mailer")?))
    });
    let route = Route::get("/mail/{mailer}", action).unwrap();

    assert_eq!(route.execute("/mail/smtp", &handlers).unwrap(), json!("smtp"));
}

#[test]
fn test_unbound_parameter_is_error() {
    let action = Action::new(Signature::of(["section", "missing"]), |_| Ok(json!(null)));
    let route = Route::get("/news/{section}", action).unwrap();

    let err = route.execute("/news/it", &HandlerRegistry::new()).unwrap_err();
    assert!(matches!(
        err,
        RouteError::UnboundArgument { position: 1, ref name } if name == "missing"
    ));
    assert!(err.is_invalid_argument());
}

#[test]
fn test_unknown_function() {
    let route = Route::get("/x", "nowhere").unwrap();
    let err = route.execute("/x", &handlers()).unwrap_err();
    assert!(matches!(err, RouteError::FunctionNotFound(ref name) if name == "nowhere"));
}

#[test]
fn test_unknown_controller() {
    let route = Route::get("/x", "Missing@index").unwrap();
    let err = route.execute("/x", &handlers()).unwrap_err();
    assert!(matches!(err, RouteError::ControllerNotFound(ref name) if name == "Missing"));
}

#[test]
fn test_unknown_method() {
    let route = Route::get("/x", "ForTest@other").unwrap();
    let err = route.execute("/x", &handlers()).unwrap_err();
    assert_eq!(err.to_string(), "Method [other] in controller [ForTest] not found");
}

#[test]
fn test_malformed_reference() {
    let route = Route::get("/x", "ForTest@my@Method").unwrap();
    let err = route.execute("/x", &handlers()).unwrap_err();

    assert_eq!(err.to_string(), "Action for route [/x] is not valid");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_handler_error_is_carried() {
    let action = Action::new(Signature::new(), |_| anyhow::bail!("storage unavailable"));
    let route = Route::delete("/items", action).unwrap();

    let err = route.execute("/items", &HandlerRegistry::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Handler);
    assert_eq!(err.to_string(), "storage unavailable");
}
