//! Run the overlay against a page fixture.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use promptassist_core::{Overlay, OverlayHandle, OverlayOptions, OverlayRunLoop, text_io};
use promptassist_dom::{Document, EventKind, PageFixture};
use promptassist_protocols::HostSignal;

use crate::context::AppContext;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What to do with the page once the overlay has attached.
pub(crate) struct AttachActions {
    pub type_text: Option<String>,
    pub click: bool,
    pub json: bool,
}

pub(crate) async fn attach(
    ctx: &AppContext,
    page: &Path,
    actions: AttachActions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = PageFixture::load(page)?.into_document()?;
    info!("Loaded {} ({})", page.display(), doc.url());

    let registry = ctx.registry();
    let overlay = Overlay::for_page(&registry, &doc, OverlayOptions::from(&ctx.config.overlay))?;
    match overlay.site() {
        Some(site) => info!("Matched site {}", site.display_name()),
        None => println!("No site matches {}; the overlay stays inactive.", doc.url()),
    }

    let credentials = ctx.credential_store().await?;
    let rewriter = ctx.rewriter(credentials.clone())?;
    let (run_loop, handle, mut signals) =
        OverlayRunLoop::new(doc, overlay, Arc::new(rewriter), credentials);
    let task = tokio::spawn(run_loop.run());

    let first = handle
        .inspect(|_, overlay| {
            overlay
                .bindings()
                .first()
                .map(|b| (b.input(), b.kind(), b.button()))
        })
        .await?;

    if let Some((input, kind, button)) = first {
        if let Some(text) = actions.type_text {
            handle
                .edit(move |doc| text_io::adapter(kind).write(doc, input, &text))
                .await??;
        }
        if actions.click {
            handle
                .edit(move |doc| doc.dispatch_event(button, EventKind::Click))
                .await?;
            let timeout = Duration::from_secs(ctx.config.provider.timeout_secs + 5);
            wait_until_idle(&handle, timeout).await?;
        }
    } else if actions.type_text.is_some() || actions.click {
        warn!("No input was bound; skipping page actions");
    }

    while let Ok(signal) = signals.try_recv() {
        match signal {
            HostSignal::ShowCredentialSurface => {
                eprintln!("An API key is required. Run `promptassist key set <KEY>` to add one.");
            }
        }
    }

    let mut summary = handle.inspect(summarize).await?;
    handle.shutdown();
    let doc = task.await??;

    if actions.json {
        summary["markup"] = json!(doc.to_markup(doc.body()));
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        println!();
        println!("{}", doc.to_markup(doc.body()));
    }
    Ok(())
}

/// Poll until no binding has a rewrite in flight.
async fn wait_until_idle(
    handle: &OverlayHandle,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let pending = handle
            .inspect(|_, overlay| overlay.bindings().iter().any(|b| b.has_pending_request()))
            .await?;
        if !pending {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err("timed out waiting for the rewrite".into());
        }
        debug!("Rewrite in flight");
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn summarize(doc: &Document, overlay: &Overlay) -> serde_json::Value {
    let bindings: Vec<_> = overlay
        .bindings()
        .iter()
        .map(|b| {
            let text = text_io::adapter(b.kind()).read(doc, b.input());
            json!({
                "id": b.id().to_string(),
                "kind": b.kind().name(),
                "container": b.strategy().name(),
                "state": b.state().name(),
                "tooltip": b.state().tooltip(),
                "text": text,
            })
        })
        .collect();
    json!({
        "url": doc.url().as_str(),
        "site": overlay.site().map(|s| s.display_name().to_string()),
        "bindings": bindings,
    })
}

fn print_summary(summary: &serde_json::Value) {
    let site = summary["site"].as_str().unwrap_or("(none)");
    println!("Page: {}", summary["url"].as_str().unwrap_or_default());
    println!("Site: {}", site);

    let bindings = summary["bindings"].as_array().cloned().unwrap_or_default();
    println!("Bindings: {}", bindings.len());
    for b in &bindings {
        println!(
            "  [{}] {} via {}: {} ({})",
            b["id"].as_str().unwrap_or_default(),
            b["kind"].as_str().unwrap_or_default(),
            b["container"].as_str().unwrap_or_default(),
            b["state"].as_str().unwrap_or_default(),
            b["tooltip"].as_str().unwrap_or_default(),
        );
        println!("      text: {:?}", b["text"].as_str().unwrap_or_default());
    }
}
