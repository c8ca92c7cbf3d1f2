//! Re-rendering on changes of the input file.

use std::{
    ffi::OsStr,
    fs, io,
    path::Path,
    sync::mpsc,
};

use log::{debug, info, trace, warn};
use notify::{Event, EventKind, RecursiveMode, Watcher, recommended_watcher};

use archgraph::{ArchGraphError, render::Renderer, storage::Storage, sync::SyncDriver};

use crate::{report_error, report_outcome};

/// Feeds every saved version of `input` to the driver until the watcher stops.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by replacing the file are followed. Versions that fail to parse
/// are reported and the last rendered graph is kept.
///
/// # Errors
///
/// Returns an error when the watcher cannot be set up.
pub fn watch_input<S, R>(driver: &mut SyncDriver<S, R>, input: &Path) -> Result<(), ArchGraphError>
where
    S: Storage,
    R: Renderer,
{
    let file_name = input.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot watch `{}`: not a file path", input.display()),
        )
    })?;
    let dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = recommended_watcher(tx).map_err(watch_error)?;
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .map_err(watch_error)?;
    info!(path = input.display().to_string(); "Watching for changes");

    for res in rx {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                warn!(err:%; "File watcher reported an error");
                continue;
            }
        };
        if !is_change_of(&event, file_name) {
            continue;
        }

        let source = match fs::read_to_string(input) {
            Ok(source) => source,
            Err(err) => {
                // editors replacing the file leave short gaps
                debug!(err:%; "Input not readable yet");
                continue;
            }
        };
        if source == driver.source() {
            trace!("Input unchanged");
            continue;
        }

        match driver.on_source_changed(&source) {
            Ok(outcome) => report_outcome(&outcome, &source),
            Err(err) => {
                report_error(&err);
                warn!("Keeping the last rendered graph");
            }
        }
    }

    Ok(())
}

/// Returns `true` if `event` creates or modifies a file named `file_name`.
fn is_change_of(event: &Event, file_name: &OsStr) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name))
}

fn watch_error(err: notify::Error) -> ArchGraphError {
    ArchGraphError::Io(io::Error::other(err))
}
