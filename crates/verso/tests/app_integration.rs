use std::fs;
use std::path::Path;

use tempfile::TempDir;
use verso::{
    App, AppConfig, ConfigError, Handler, HandlerResult, HookError, Method, Request,
    RequestContext, RouteResult, SetupError, StatusCode, Symbol, Uri,
};

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "views/layout.html", "<main>{{ content }}</main>");
    write(dir.path(), "views/index.html", "<h1>home</h1>");
    write(dir.path(), "views/docs/intro.jinja", "{% include \"partial.txt\" %} intro");
    write(dir.path(), "views/partial.txt", "[partial]");
    write(
        dir.path(),
        "verso.yaml",
        "views:\n  dirs: [views]\n  layout: layout\nplugins:\n  - symbol_views\n",
    );
    dir
}

#[test]
fn test_app_from_config_file() {
    let dir = site();
    let config = AppConfig::load(dir.path().join("verso.yaml")).unwrap();

    let app = App::builder()
        .with_config(&config)
        .unwrap()
        .get("/", |_, _| Ok::<_, anyhow::Error>(Symbol::intern("index")))
        .get("/docs", |_, _| Ok::<_, anyhow::Error>(Symbol::intern("docs/intro")))
        .get("/raw", |_, _| Ok::<_, anyhow::Error>("raw text"))
        .build()
        .unwrap();

    assert_eq!(app.call(&Request::get("/")).body, "<main><h1>home</h1></main>");
    assert_eq!(
        app.call(&Request::get("/docs")).body,
        "<main>[partial] intro</main>"
    );
    // The layout wraps rendered views only.
    assert_eq!(app.call(&Request::get("/raw")).body, "raw text");
}

#[test]
fn test_config_layout_missing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "views/index.html", "home");
    write(dir.path(), "verso.yaml", "views: { dirs: [views], layout: base }\n");

    let config = AppConfig::load(dir.path().join("verso.yaml")).unwrap();
    let err = App::builder()
        .with_config(&config)
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, SetupError::LayoutNotFound(name) if name == "base"));
}

#[test]
fn test_config_unknown_plugin() {
    let config = AppConfig::from_yaml_str("plugins: [sessions]").unwrap();
    let err = App::builder().with_config(&config).err().unwrap();
    assert!(matches!(
        err,
        SetupError::Config(ConfigError::UnknownPlugin(name)) if name == "sessions"
    ));
}

#[test]
fn test_config_missing_view_dir() {
    let config = AppConfig::from_yaml_str("views: { dirs: [/no/such/verso/views] }").unwrap();
    let err = App::builder().with_config(&config).err().unwrap();
    assert!(matches!(err, SetupError::Views(_)));
}

#[test]
fn test_inline_view_shadows_file() {
    let dir = site();
    let app = App::builder()
        .plugin(verso::SymbolViews)
        .view_dir(dir.path().join("views"))
        .unwrap()
        .inline_view("index", "inline home")
        .get("/", |_, _| Ok::<_, anyhow::Error>(Symbol::intern("index")))
        .build()
        .unwrap();

    assert_eq!(app.call(&Request::get("/")).body, "inline home");
}

#[test]
fn test_hooks_run_around_handler() {
    struct User(String);

    let app = App::builder()
        .pre_dispatch(|req, ctx| {
            let user = req
                .header("x-user")
                .ok_or_else(|| HookError::pre_dispatch("missing x-user header"))?;
            ctx.extensions.insert(User(user.to_string()));
            Ok(())
        })
        .post_output(|_ctx, res| Ok(res.with_header("x-powered-by", "verso")))
        .get("/me", |_, ctx| {
            let user = ctx.extensions.get_required::<User>()?;
            Ok::<_, anyhow::Error>(format!("hello {}", user.0))
        })
        .build()
        .unwrap();

    let res = app.call(&Request::get("/me").with_header("x-user", "ana"));
    assert_eq!(res.body, "hello ana");
    assert_eq!(res.header("x-powered-by"), Some("verso"));

    let err = app.dispatch(&Request::get("/me")).unwrap_err();
    assert_eq!(err.to_string(), "hook error (pre-dispatch): missing x-user header");
    assert_eq!(app.call(&Request::get("/me")).status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_struct_handler_and_methods() {
    struct Echo;

    impl Handler for Echo {
        fn handle(&self, req: &Request, ctx: &RequestContext) -> HandlerResult {
            let id = ctx.param_required("id")?;
            Ok(RouteResult::Text(format!("{} {}", req.method, id)))
        }
    }

    let app = App::builder()
        .handler(Method::POST, "/items/:id", Echo)
        .get("/items/:id", |_, _| Ok::<_, anyhow::Error>("get"))
        .build()
        .unwrap();

    assert_eq!(app.call(&Request::post("/items/7")).body, "POST 7");
    assert_eq!(app.call(&Request::get("/items/7?x=1")).body, "get");
    let delete = Request::new(Method::DELETE, Uri::from_static("/items/7"));
    assert_eq!(app.call(&delete).status, StatusCode::NOT_FOUND);
}

#[test]
fn test_handler_error_is_500() {
    let app = App::builder()
        .get("/fail", |_, _| -> Result<String, anyhow::Error> {
            Err(anyhow::anyhow!("database unavailable"))
        })
        .build()
        .unwrap();

    let err = app.dispatch(&Request::get("/fail")).unwrap_err();
    assert_eq!(err.to_string(), "database unavailable");
    assert_eq!(app.call(&Request::get("/fail")).status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_app_is_shared_across_threads() {
    let app = std::sync::Arc::new(
        App::builder()
            .plugin(verso::SymbolViews)
            .inline_view("index", "home")
            .get("/", |_, _| Ok::<_, anyhow::Error>(Symbol::intern("index")))
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let app = app.clone();
            std::thread::spawn(move || app.call(&Request::get("/")).body)
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "home");
    }
}
