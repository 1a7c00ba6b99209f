//! Command handlers grouped per entity.
//!
//! Every handler drives the same session types the interactive views use;
//! the CLI adds only argument parsing and rendering on top.

pub(crate) mod blood_pressure;
pub(crate) mod points;
pub(crate) mod preferences;
pub(crate) mod users;
pub(crate) mod weight;

use clap::Args;
use serde_json::Value;

use healthpoints_models::EntityRecord;
use healthpoints_store::paging::{SortOrder, SortSpec};
use healthpoints_store::sessions::{DeleteSession, DetailSession, EditMode, EditSession, ListSession, Nav};

use crate::client::{AppContext, CliResult, store_error, submit_error};
use crate::output::{OutputFormat, render_record, render_records};

/// Shared flags for list and search commands.
#[derive(Args, Default)]
pub(crate) struct ListArgs {
    #[arg(long, help = "Field to order the collection by")]
    pub(crate) sort: Option<String>,
    #[arg(long, help = "Reverse the ordering")]
    pub(crate) desc: bool,
    #[arg(
        long,
        help = "Follow pagination links until the collection is exhausted"
    )]
    pub(crate) all: bool,
}

/// Positional record identifier shared by get/update/delete.
#[derive(Args)]
pub(crate) struct IdArg {
    #[arg(help = "Record identifier")]
    pub(crate) id: i64,
}

/// Search needle plus the shared list flags.
#[derive(Args)]
pub(crate) struct SearchArgs {
    #[arg(help = "Search query")]
    pub(crate) query: String,
    #[command(flatten)]
    pub(crate) list: ListArgs,
}

/// Append a form field when the flag was provided.
pub(crate) fn push_field<T: Into<Value>>(
    fields: &mut Vec<(&'static str, Value)>,
    name: &'static str,
    value: Option<T>,
) {
    if let Some(value) = value {
        fields.push((name, value.into()));
    }
}

/// Fetch and render one page (or, with `--all`, every page) of an entity's
/// collection, optionally restricted to search results.
pub(crate) async fn run_list<E: EntityRecord>(
    ctx: &AppContext,
    args: &ListArgs,
    query: Option<&str>,
    output: OutputFormat,
    columns: &[&str],
) -> CliResult<()> {
    let mut store = ctx.store::<E>();
    let mut session = ListSession::new();
    if args.sort.is_some() || args.desc {
        let mut sort = SortSpec::by(args.sort.clone().unwrap_or_else(|| "id".to_string()));
        if args.desc {
            sort.order = SortOrder::Desc;
        }
        session = session.with_sort(sort);
    }

    match query {
        Some(needle) => session.search(&mut store, needle).await,
        None => session.activate(&mut store).await,
    }
    .map_err(store_error)?;

    if args.all {
        while session.has_more(&store) {
            session.load_more(&mut store, 1).await.map_err(store_error)?;
        }
    }

    tracing::debug!(
        entity = E::NAME,
        fetched = store.entities().len(),
        total = store.total_items(),
        "listed records"
    );
    render_records(store.entities(), output, columns)
}

/// Fetch and render one record.
pub(crate) async fn run_get<E: EntityRecord>(
    ctx: &AppContext,
    id: i64,
    output: OutputFormat,
) -> CliResult<()> {
    let mut store = ctx.store::<E>();
    DetailSession::new(id)
        .activate(&mut store)
        .await
        .map_err(store_error)?;
    render_record(store.entity(), output)
}

/// Create or update a record from raw field values, then render the
/// server-confirmed copy.
pub(crate) async fn run_submit<E: EntityRecord>(
    ctx: &AppContext,
    mode: EditMode,
    fields: Vec<(&'static str, Value)>,
    output: OutputFormat,
) -> CliResult<()> {
    let mut store = ctx.store::<E>();
    let mut session = EditSession::new(mode);
    session
        .activate(&mut store, &ctx.directory())
        .await
        .map_err(store_error)?;
    for (name, value) in fields {
        session.set_field(name, value);
    }
    match session.submit(&mut store).await.map_err(submit_error)? {
        Nav::BackToList => render_record(store.entity(), output),
        Nav::Stay => Ok(()),
    }
}

/// Delete a record after confirming it exists.
pub(crate) async fn run_delete<E: EntityRecord>(ctx: &AppContext, id: i64) -> CliResult<()> {
    let mut store = ctx.store::<E>();
    let mut session = DeleteSession::new(id);
    session.activate(&mut store).await.map_err(store_error)?;
    match session.confirm(&mut store).await.map_err(store_error)? {
        Nav::BackToList => println!("Deleted {} {id}.", E::NAME),
        Nav::Stay => {}
    }
    Ok(())
}
