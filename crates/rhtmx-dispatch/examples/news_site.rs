// File: examples/news_site.rs
// Purpose: Registers a small news site, dispatches a few requests and prints the results

use rhtmx_dispatch::{Action, Config, HandlerRegistry, Router, Signature};
use serde_json::json;

#[derive(Default)]
struct NewsController;

impl NewsController {
    fn show(&self, args: rhtmx_dispatch::BoundArguments) -> anyhow::Result<serde_json::Value> {
        Ok(json!({
            "section": args.text("section")?,
            "id": args.text("id")?,
        }))
    }
}

#[derive(Default)]
struct Clock;

impl Clock {
    fn now(&self) -> &'static str {
        "2024-01-01T00:00:00Z"
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = Config::load_default()?;
    let mut router = Router::with_config(config.routing);

    router
        .get("/news/{section}/{id}", "NewsController@show")?
        .rule("id", "[0-9]+")
        .name("news.show");
    router
        .get("/posts/{section}/{page?}", "posts")?
        .rule("page", "[0-9]+")
        .name("posts.index");
    router.any(
        "/health",
        Action::new(Signature::new().inject::<Clock>("clock"), |args| {
            let clock = args.dependency::<Clock>("clock")?;
            Ok(json!({ "status": "ok", "at": clock.now() }))
        }),
    )?;

    let mut handlers = HandlerRegistry::new();
    handlers
        .controller::<NewsController>("NewsController")
        .method("show", Signature::of(["id", "section"]), NewsController::show);
    handlers
        .function(
            "posts",
            Signature::new().param("section").param_or("page", 1),
            |args| Ok(json!({ "section": args.text("section")?, "page": args.value("page")? })),
        )
        .dependency::<Clock>();

    for (method, path) in [
        ("GET", "/news/development/86"),
        ("GET", "/posts/it/"),
        ("GET", "/posts/it/3"),
        ("HEAD", "/health"),
        ("POST", "/news/development/86"),
    ] {
        match router.dispatch(path, method, &handlers) {
            Ok(output) => println!("{} {} -> {}", method, path, output),
            Err(err) => println!("{} {} -> error: {}", method, path, err),
        }
    }

    let url = router.url_for_params("news.show", &[("section", "it"), ("id", "16")])?;
    println!("news.show -> {}", url);

    Ok(())
}
