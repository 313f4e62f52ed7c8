//! Runs a single request through a demo app and prints the response.
//!
//! ```text
//! verso-demo /                      # :index rendered through the inline view
//! verso-demo /hello/ana
//! verso-demo --views ./views --layout layout /
//! verso-demo --config verso.yaml /about
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use verso::{logging, App, AppBuilder, AppConfig, Method, Request, Symbol, SymbolViews};

#[derive(Parser, Debug)]
#[command(name = "verso-demo", about = "Dispatch one request through a demo verso app")]
struct Cli {
    /// YAML config with view directories, layout and plugins
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extra view directory (repeatable)
    #[arg(long = "views", value_name = "DIR")]
    views: Vec<PathBuf>,

    /// Layout view every rendered view is wrapped in
    #[arg(long, value_name = "NAME")]
    layout: Option<String>,

    #[arg(long, default_value = "GET", value_parser = parse_method)]
    method: Method,

    /// Print response headers too
    #[arg(short = 'i', long)]
    include_headers: bool,

    /// Log filter, overridden by VERSO_LOG
    #[arg(long, default_value = "warn")]
    log: String,

    /// Request path, with an optional query string
    path: String,
}

fn parse_method(s: &str) -> Result<Method, String> {
    Method::from_bytes(s.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid method `{}`", s))
}

fn build_app(cli: &Cli) -> anyhow::Result<App> {
    let mut builder = App::builder().plugin(SymbolViews);

    if let Some(path) = &cli.config {
        let config = AppConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?;
        builder = builder.with_config(&config)?;
    }
    for dir in &cli.views {
        builder = builder.view_dir(dir)?;
    }
    if let Some(layout) = &cli.layout {
        builder = builder.layout(layout.clone());
    }

    Ok(routes(builder).build()?)
}

fn routes(builder: AppBuilder) -> AppBuilder {
    builder
        .inline_view("index", "<h1>verso</h1>\n<p>This page is the :index view.</p>\n")
        .get("/", |_, _| Ok::<_, anyhow::Error>(Symbol::intern("index")))
        .get("/string", |_, _| Ok::<_, anyhow::Error>("string"))
        .get("/hello/:name", |_, ctx| {
            let name = ctx.param_required("name")?;
            Ok::<_, anyhow::Error>(format!("hello {}", name))
        })
        .get("/view/:name", |_, ctx| {
            Ok::<_, anyhow::Error>(Symbol::lookup(ctx.param_required("name")?))
        })
        .get("/api/status", |req, _| {
            Ok::<_, anyhow::Error>(json!({
                "status": "ok",
                "query": req.query(),
            }))
        })
        .post("/echo", |req, _| {
            Ok::<_, anyhow::Error>(format!("{} {}", req.method, req.path()))
        })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let app = build_app(&cli)?;
    tracing::debug!(?app, "demo app ready");

    let request = Request::parse(cli.method.clone(), &cli.path)
        .with_context(|| format!("invalid request path `{}`", cli.path))?;
    let response = app.call(&request);

    println!("{}", response.status);
    if cli.include_headers {
        for (name, value) in &response.headers {
            println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
    }
    println!();
    print!("{}", response.body);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
