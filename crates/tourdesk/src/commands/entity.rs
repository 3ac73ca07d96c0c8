//! Generic list/get/create/update/delete handlers.
//!
//! Mutations go through `EntityView` so the CLI reports outcomes the same
//! way the dashboard does: server message first, generic text otherwise.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tourdesk_core::{
    CoreError, EntityView, ListParams, Operation, SearchMode, SortOrder,
};
use tracing::debug;

use crate::cli::{EntityCommand, GlobalOpts, ListArgs, OutputFormat, SortArg, WriteArgs};
use crate::config::Session;
use crate::error::CliError;
use crate::output::{self, StderrNotifier};

use super::forms::{self, Form, FormInput};
use super::rows::Listing;
use super::util;

pub async fn handle<T: Listing + Form>(
    session: &Session,
    command: EntityCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        EntityCommand::List(args) => list::<T>(session, &args, &[], global).await,
        EntityCommand::Get { id } => get::<T>(session, &id, global).await,
        EntityCommand::Create(write) => create::<T>(session, &write, global).await,
        EntityCommand::Update { id, write } => update::<T>(session, &id, &write, global).await,
        EntityCommand::Delete { id } => delete::<T>(session, &id, global).await,
    }
}

fn notifier(global: &GlobalOpts) -> StderrNotifier {
    StderrNotifier::new(global.quiet, global.color)
}

/// Point not-found errors at the right list command.
fn located<T: Listing>(err: CoreError) -> CliError {
    match err {
        CoreError::NotFound { .. } => CliError::not_found(err.user_message(), T::LIST_COMMAND),
        other => other.into(),
    }
}

// ── List ────────────────────────────────────────────────────────────

pub fn list_params<T: Listing>(
    args: &ListArgs,
    page_size: u32,
    filters: &[(&str, String)],
) -> Result<ListParams, CliError> {
    let limit = args.limit.unwrap_or(page_size);
    if limit == 0 {
        return Err(CliError::Validation {
            field: "limit".into(),
            reason: "must be at least 1".into(),
        });
    }
    if args.page == 0 {
        return Err(CliError::Validation {
            field: "page".into(),
            reason: "pages start at 1".into(),
        });
    }

    let mut params = ListParams::new(args.page, limit);
    if T::SEARCH == SearchMode::Server {
        if let Some(ref term) = args.search {
            params = params.with_search(term);
        }
    }
    if let Some(ref field) = args.sort_by {
        let order = match args.sort_order {
            Some(SortArg::Desc) => SortOrder::Desc,
            Some(SortArg::Asc) | None => SortOrder::Asc,
        };
        params = params.with_sort(field.clone(), order);
    }
    for (key, value) in filters {
        params = params.with_filter(*key, value.clone());
    }
    Ok(params)
}

pub async fn list<T: Listing>(
    session: &Session,
    args: &ListArgs,
    filters: &[(&str, String)],
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let params = list_params::<T>(args, session.page_size, filters)?;
    let first = session.client.list::<T>(&params).await.map_err(located::<T>)?;
    let meta = first.meta;
    let stats = first.stats;
    let mut rows: Vec<T> = first.data.clone();

    if args.all && meta.total_pages > params.page {
        let bar = progress(global, u64::from(meta.total_pages - params.page));
        for page in params.page + 1..=meta.total_pages {
            let next = ListParams {
                page,
                ..params.clone()
            };
            let loaded = session.client.list::<T>(&next).await.map_err(located::<T>)?;
            rows.extend(loaded.data.iter().cloned());
            bar.inc(1);
        }
        bar.finish_and_clear();
    }

    // Client-search entities filter what was loaded; no search request.
    if T::SEARCH == SearchMode::Client {
        if let Some(ref term) = args.search {
            rows.retain(|r| r.matches(term));
        }
    }
    debug!(rows = rows.len(), total = meta.total, "listed");

    let out = output::render_list(global.output, &rows, T::row, |r| r.id().to_owned())?;
    output::print_output(&out, global.quiet);
    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        if !args.all {
            eprintln!(
                "{}",
                output::page_footer(meta.page, meta.total_pages, meta.total)
            );
        }
        if let Some(ref stats) = stats {
            eprintln!("{}", output::stats_footer(stats));
        }
    }
    Ok(())
}

fn progress(global: &GlobalOpts, len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if global.quiet {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::with_template("{spinner} fetching pages {pos}/{len}") {
        bar.set_style(style);
    }
    bar
}

// ── Get ─────────────────────────────────────────────────────────────

pub async fn get<T: Listing>(
    session: &Session,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let record = session.client.get::<T>(id).await.map_err(located::<T>)?;
    let out = output::render_single(global.output, &*record, T::detail, |r| r.id().to_owned())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Create / update ─────────────────────────────────────────────────

pub async fn create<T: Listing + Form>(
    session: &Session,
    write: &WriteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !T::RESOURCE.supports(Operation::Create) {
        return Err(unsupported::<T>(Operation::Create));
    }

    let draft: T::Draft = match write.data {
        Some(ref source) => serde_json::from_value(util::read_json(source)?)?,
        None => T::Draft::default(),
    };
    let uploads = util::stage_uploads::<T>(write).await?;

    let mut view = EntityView::<T, _>::new(session.client.clone(), notifier(global));
    view.open_add()?;
    let prepared = T::prepare(
        draft,
        FormInput {
            uploads,
            geocoder: &session.geocoder,
            coords: util::coordinates(write),
        },
    )
    .await;
    let saved = view.submit(prepared).await?;

    let out = output::render_single(global.output, &saved.data, T::detail, |r| {
        r.id().to_owned()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn update<T: Listing + Form>(
    session: &Session,
    id: &str,
    write: &WriteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !T::RESOURCE.supports(Operation::Update) {
        return Err(unsupported::<T>(Operation::Update));
    }

    let current = session.client.get::<T>(id).await.map_err(located::<T>)?;

    // Fields not in --data keep their current value.
    let mut fields = serde_json::to_value(T::Draft::from(&*current))?;
    if let Some(ref source) = write.data {
        forms::merge(&mut fields, util::read_json(source)?);
    }
    let draft: T::Draft = serde_json::from_value(fields)?;
    let uploads = util::stage_uploads::<T>(write).await?;

    let mut view = EntityView::<T, _>::new(session.client.clone(), notifier(global));
    view.open_edit((*current).clone())?;
    let prepared = T::prepare(
        draft,
        FormInput {
            uploads,
            geocoder: &session.geocoder,
            coords: util::coordinates(write),
        },
    )
    .await;
    let saved = view.submit(prepared).await?;

    let out = output::render_single(global.output, &saved.data, T::detail, |r| {
        r.id().to_owned()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Delete ──────────────────────────────────────────────────────────

pub async fn delete<T: Listing>(
    session: &Session,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !T::RESOURCE.supports(Operation::Delete) {
        return Err(unsupported::<T>(Operation::Delete));
    }

    let record = session.client.get::<T>(id).await.map_err(located::<T>)?;
    let mut view = EntityView::<T, _>::new(session.client.clone(), notifier(global));
    view.request_delete(&record)?;

    if !util::confirm(&format!("Delete '{}'?", record.title()), global.yes)? {
        view.cancel_delete();
        return Ok(());
    }
    view.confirm_delete().await?;
    Ok(())
}

fn unsupported<T: Listing>(op: Operation) -> CliError {
    CliError::Unsupported {
        resource: T::RESOURCE.label().into(),
        operation: op.to_string(),
    }
}
