//! # Scene Hot-Reloading
//!
//! Watches the scene file's directory with [`notify`] and posts a message on
//! a channel whenever the scene file itself is created or modified. The
//! watcher runs on `notify`'s own thread; the main loop drains the channel
//! between frames.

use std::ffi::OsString;
use std::path::Path;
use std::sync::mpsc::Sender;

use anyhow::{anyhow, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tracing::{debug, error, info};

fn is_scene_file(path: &Path, file_name: &OsString) -> bool {
    path.file_name() == Some(file_name.as_os_str())
}

/// Starts watching `scene`. The returned watcher must be kept alive for
/// notifications to keep arriving.
///
/// # Errors
///
/// Fails if the path has no file name or the directory cannot be watched.
pub fn start(scene: &Path, reloads: Sender<()>) -> Result<RecommendedWatcher> {
    let file_name = scene
        .file_name()
        .map(ToOwned::to_owned)
        .ok_or_else(|| anyhow!("scene path {} has no file name", scene.display()))?;
    let directory = scene
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if (event.kind.is_modify() || event.kind.is_create())
                && event.paths.iter().any(|path| is_scene_file(path, &file_name))
            {
                debug!(kind = ?event.kind, "scene file changed");
                // The receiver is gone once the main loop has exited.
                let _ = reloads.send(());
            }
        }
        Err(e) => error!("Error watching scene file: {e:?}"),
    })?;

    watcher.watch(directory, RecursiveMode::NonRecursive)?;
    info!(path = %scene.display(), "watching scene file for changes");
    Ok(watcher)
}
