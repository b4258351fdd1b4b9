//! A small app driven in-process.
//!
//! Run with `RUST_LOG=gweb_core=debug cargo run --example basic` to see the
//! dispatcher's decisions.

use std::any::Any;

use gweb::prelude::*;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Serialize)]
struct Welcome<'a> {
    name: &'a str,
    message: &'a str,
}

fn ping(c: &mut Context) {
    c.string(StatusCode::OK, "pong");
}

fn hello(c: &mut Context) {
    let name = c.param("name").unwrap_or_default().to_owned();
    let welcome = Welcome {
        name: &name,
        message: "welcome to gweb!",
    };
    if let Err(err) = c.json(StatusCode::OK, &welcome) {
        tracing::error!(%err, "failed to render welcome");
    }
}

fn remember(c: &mut Context) {
    let seen = c.cookie("seen").is_some();
    c.set_cookie(&Cookie::new("seen", "yes").max_age(60));
    let welcome = Welcome {
        name: "xml",
        message: if seen { "welcome back" } else { "first visit" },
    };
    if let Err(err) = c.xml(StatusCode::OK, &welcome) {
        tracing::error!(%err, "failed to render welcome");
    }
}

fn query(c: &mut Context) {
    let name = c.default_query("name", "anonymous").into_owned();
    c.string(StatusCode::OK, &name);
}

fn post_form(c: &mut Context) {
    let name = c.post_form("name").unwrap_or_default().into_owned();
    c.string(StatusCode::OK, &name);
}

fn timing(c: &mut Context) {
    let started = std::time::Instant::now();
    c.next();
    tracing::info!(
        path = %c.path(),
        status = c.response().status().as_u16(),
        elapsed_us = started.elapsed().as_micros(),
        "request served"
    );
}

fn boom(_c: &mut Context) {
    panic!("something went wrong");
}

fn panic_handler(c: &mut Context, payload: &(dyn Any + Send)) {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .unwrap_or("unknown panic");
    tracing::error!(message, "panic message");
    c.string(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gweb_core=debug,basic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = App::builder()
        .global(handlers![timing])
        .get("/ping", handlers![ping])
        .get("/hello/:name", handlers![hello])
        .get("/remember", handlers![remember])
        .group("/gweb", handlers![], |g| {
            g.get("/query", handlers![query]);
            g.post("/post", handlers![post_form]);
        })
        .get("/boom", handlers![boom])
        .option(AppOption::name("basic"))
        .option(AppOption::panic_handler(panic_handler))
        .build()?;

    let client = TestClient::new(app);
    let requests = [
        client.get("/ping"),
        client.get("/hello/gopher"),
        client.get("/remember").header("Cookie", "seen=yes"),
        client.get("/gweb/query?name=rustacean"),
        client.post("/gweb/post").form("name=ferris"),
        client.get("/PING/"),
        client.delete("/ping"),
        client.options("/ping"),
        client.get("/boom"),
        client.get("/missing"),
    ];

    for request in requests {
        let resp = request.send();
        println!(
            "{} location={:?} allow={:?} body={:?}",
            resp.status(),
            resp.header("Location"),
            resp.header("Allow"),
            resp.text()
        );
    }
    Ok(())
}
