//! Long-lived context that redraws on cross-context changes.

use outcast_storefront::render::text_table;

use super::Page;

/// Print the cart, then reprint it after every change until interrupted.
pub async fn run(page: &Page) {
    let key = page.state.store().key().to_string();
    let watcher = page
        .storage
        .spawn_watcher(&key, page.state.config().sync_poll_interval);
    let listener = page.state.start_sync();
    let mut changes = page.state.cart().subscribe();

    tracing::info!(dir = %page.storage.dir().display(), "Watching cart, press Ctrl+C to stop");
    print!("{}", text_table(&page.state.view()));

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                println!();
                print!("{}", text_table(&page.state.view()));
            }
            () = &mut shutdown => break,
        }
    }

    listener.stop();
    watcher.abort();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Stopping watch");
}
