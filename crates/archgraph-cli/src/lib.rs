//! CLI logic for the archgraph tool.
//!
//! The binary hosts a [`SyncDriver`] backed by a directory store and a JSON
//! file renderer: it renders the stored description, then the input file, and
//! with `--watch` keeps re-rendering as the input is saved.

pub mod error_adapter;

mod args;
mod config;
mod watch;

pub use args::Args;

use std::{fs, path::Path};

use log::{debug, error, info, warn};
use miette::GraphicalReportHandler;

use archgraph::{
    ArchGraphError,
    render::JsonFileRenderer,
    storage::FileStorage,
    sync::{SyncDriver, SyncOutcome},
};

use error_adapter::{Reportable, to_reportables, warnings_to_reportables};

/// Run the archgraph CLI application
///
/// This function loads the stored description, processes the input file
/// through the synchronization driver, and writes the resulting graph to the
/// output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ArchGraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors (outside watch mode)
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), ArchGraphError> {
    info!(
        input_path:? = args.input,
        output_path = args.output;
        "Processing architecture description"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.strict {
        app_config = app_config.with_strict(true);
    }
    let store = config::store_dir(args.store.as_ref(), &app_config);
    debug!(store = store.display().to_string(); "Using store directory");

    let mut driver = SyncDriver::new(
        app_config,
        FileStorage::new(store),
        JsonFileRenderer::new(&args.output),
    );

    match driver.initialize() {
        Ok(_) => {}
        Err(err) if args.input.is_some() => {
            report_error(&err);
            warn!("Stored description could not be rendered, continuing with the input");
        }
        Err(err) => return Err(err),
    }

    let Some(input) = args.input.as_deref() else {
        info!(output_file = args.output; "Stored description rendered");
        return Ok(());
    };
    let input = Path::new(input);

    let source = fs::read_to_string(input)?;
    match driver.on_source_changed(&source) {
        Ok(outcome) => report_outcome(&outcome, &source),
        Err(err) if args.watch => report_error(&err),
        Err(err) => return Err(err),
    }

    if args.watch {
        watch::watch_input(&mut driver, input)?;
    }

    info!(output_file = args.output; "Graph exported successfully");
    Ok(())
}

/// Render every part of `err` with source snippets and log it.
pub fn report_error(err: &ArchGraphError) {
    for reportable in to_reportables(err) {
        error!("{}", render(&reportable));
    }
}

/// Log what an accepted change produced, rendering any skipped problems.
pub(crate) fn report_outcome(outcome: &SyncOutcome, source: &str) {
    for reportable in warnings_to_reportables(outcome.warnings(), source) {
        warn!("{}", render(&reportable));
    }
    if outcome.missing_root() {
        warn!("Description has no `context` key, rendered an empty graph");
    }
    if !outcome.persisted() {
        warn!("Description was rendered but not stored");
    }
    info!(
        nodes_count = outcome.nodes_count(),
        edges_count = outcome.edges_count(),
        dangling_count = outcome.dangling_count();
        "Graph updated"
    );
}

fn render(reportable: &Reportable<'_>) -> String {
    let mut writer = String::new();
    match GraphicalReportHandler::new().render_report(&mut writer, reportable) {
        Ok(()) => writer,
        Err(_) => reportable.to_string(),
    }
}
