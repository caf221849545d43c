use crate::context::AppPaths;
use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the command socket and the config watcher on a tokio runtime in a
/// side thread. The app itself stays on the calling thread.
pub fn start_background_services(tx: Sender<AppEvent>, paths: &AppPaths) {
    let socket = paths.socket.clone();
    let watched = paths.watched_files();

    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx, socket).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx, watched).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
