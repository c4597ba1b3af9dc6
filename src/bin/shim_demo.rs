//! Wires the shim against the in-memory loopback host and walks the
//! synthesized surface end to end.

use anyhow::{Context, Result};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use extshim::transport::loopback::LoopbackHost;
use extshim::{
    Arg, BootstrapConfig, Bridge, ContextCapabilities, Dispatch, HostPrimitives, Listener,
    PageGlobals,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")?;
    let local = tokio::task::LocalSet::new();
    runtime.block_on(local.run_until(run()))
}

async fn run() -> Result<()> {
    let host = LoopbackHost::new();
    host.handle("tabs.create", |args| {
        Ok(json!({ "id": 7, "options": args.first().cloned() }))
    });

    let page = PageGlobals::new();
    let root = Bridge::bootstrap(
        &page,
        ContextCapabilities {
            primitives: Some(HostPrimitives {
                call: host.clone(),
                events: host.clone(),
            }),
            config: BootstrapConfig {
                extension_id: Some("demo".into()),
                manifest: json!({
                    "name": "shim demo",
                    "browser_action": { "default_title": "demo" },
                }),
                debug: true,
            },
        },
    )
    .context("bootstrap page context")?;

    println!("installed namespaces: {:?}", root.names());

    let tabs = root
        .namespace("tabs")
        .context("read tabs slot")?
        .context("tabs namespace missing")?;

    if let Dispatch::Future(fut) =
        tabs.call("create", vec![Arg::Value(json!({ "url": "https://example.com" }))])?
    {
        println!("tabs.create -> {:?}", fut.await);
    }

    let on_created = tabs.event("onCreated")?;
    on_created.add_listener(Listener::new(|payload| {
        println!("tabs.onCreated -> {payload}");
    }));
    host.emit("tabs.onCreated", json!({ "id": 7, "url": "https://example.com" }));

    Ok(())
}
