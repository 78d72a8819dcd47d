//! Profile command handlers.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use profiled_core::{
    NewProfile, Profile, ProfileFields, ProfileListing, ProfilePatch, ProfileSnapshot,
};

use crate::cli::{
    CreateArgs, DeleteArgs, EditArgs, ListArgs, OutputFormat, PatchArgs, RenameArgs, ShowArgs,
};
use crate::commands::Context;
use crate::commands::util;
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "CONFIG")]
    config: usize,
    #[tabled(rename = "DEVICES")]
    devices: usize,
}

fn profile_row(p: &Profile) -> ProfileRow {
    ProfileRow {
        name: p.name.clone(),
        description: p.fields.description.clone(),
        config: p.fields.config.len(),
        devices: p.fields.devices.len(),
    }
}

/// Serializes as the bare URI string.
#[derive(Clone, Serialize, Tabled)]
#[serde(transparent)]
struct UriRow {
    #[tabled(rename = "URI")]
    uri: String,
}

/// Result of create and rename.
#[derive(Serialize)]
struct Location {
    name: String,
    location: String,
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail(snapshot: &ProfileSnapshot) -> String {
    let p = &snapshot.profile;
    let mut out = String::new();
    let _ = writeln!(out, "Name:        {}", p.name);
    let _ = writeln!(out, "Namespace:   {}", p.namespace);
    let _ = writeln!(out, "Description: {}", p.fields.description);
    let _ = writeln!(out, "ETag:        {}", snapshot.etag);

    let _ = writeln!(out, "Config:");
    if p.fields.config.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (key, value) in &p.fields.config {
        let _ = writeln!(out, "  {key} = {value}");
    }

    let _ = writeln!(out, "Devices:");
    if p.fields.devices.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (name, attrs) in &p.fields.devices {
        let _ = writeln!(out, "  {name}:");
        for (key, value) in attrs {
            let _ = writeln!(out, "    {key} = {value}");
        }
    }
    out.trim_end().to_owned()
}

fn print_snapshot(ctx: &Context, snapshot: &ProfileSnapshot) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, snapshot, detail, |s| s.etag.to_string())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

fn print_location(ctx: &Context, verb: &str, name: &str, uri: String) -> Result<(), CliError> {
    let location = Location {
        name: name.to_owned(),
        location: uri,
    };
    let out = output::render_single(
        ctx.output,
        &location,
        |l| format!("Profile '{}' {verb} ({})", l.name, l.location),
        |l| l.location.clone(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(ctx: &Context, args: &ListArgs) -> Result<(), CliError> {
    // Tables always show full rows; structured output mirrors the listing mode.
    let recursive = args.recursive || ctx.output == OutputFormat::Table;
    let out = match ctx.service.list(&ctx.project, recursive)? {
        ProfileListing::Full(profiles) => {
            output::render_list(ctx.output, &profiles, profile_row, |p| p.name.clone())?
        }
        ProfileListing::Uris(uris) => {
            let rows: Vec<UriRow> = uris.into_iter().map(|uri| UriRow { uri }).collect();
            output::render_list(ctx.output, &rows, UriRow::clone, |r| r.uri.clone())?
        }
    };
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub fn show(ctx: &Context, args: &ShowArgs) -> Result<(), CliError> {
    let snapshot = ctx.service.get(&ctx.project, &args.name)?;
    print_snapshot(ctx, &snapshot)
}

pub async fn create(ctx: &Context, args: CreateArgs) -> Result<(), CliError> {
    let doc = util::field_document(&args.fields)?;
    let fields: ProfileFields = serde_json::from_value(Value::Object(doc))?;
    let uri = ctx
        .service
        .create(
            &ctx.project,
            NewProfile {
                name: args.name.clone(),
                fields,
            },
        )
        .await?;
    print_location(ctx, "created", &args.name, uri)
}

pub async fn edit(ctx: &Context, args: EditArgs) -> Result<(), CliError> {
    let etag = util::parse_etag(args.etag.as_deref())?;
    let fields: ProfileFields = serde_json::from_value(util::read_json_file(&args.from_file)?)?;
    let snapshot = ctx
        .service
        .replace(&ctx.project, &args.name, fields, etag.as_ref())
        .await?;
    print_snapshot(ctx, &snapshot)
}

pub async fn patch(ctx: &Context, args: PatchArgs) -> Result<(), CliError> {
    let etag = util::parse_etag(args.etag.as_deref())?;
    let doc = util::field_document(&args.fields)?;
    let patch = ProfilePatch::from_json(&Value::Object(doc))?;
    let snapshot = ctx
        .service
        .patch(&ctx.project, &args.name, patch, etag.as_ref())
        .await?;
    print_snapshot(ctx, &snapshot)
}

pub async fn rename(ctx: &Context, args: RenameArgs) -> Result<(), CliError> {
    let etag = util::parse_etag(args.etag.as_deref())?;
    let uri = ctx
        .service
        .rename(&ctx.project, &args.name, &args.new_name, etag.as_ref())
        .await?;
    print_location(ctx, "renamed", &args.new_name, uri)
}

pub async fn delete(ctx: &Context, args: DeleteArgs) -> Result<(), CliError> {
    let etag = util::parse_etag(args.etag.as_deref())?;
    if !util::confirm(&format!("Delete profile '{}'?", args.name), ctx.yes)? {
        return Err(CliError::Aborted);
    }
    ctx.service
        .delete(&ctx.project, &args.name, etag.as_ref())
        .await?;
    if !ctx.quiet {
        eprintln!("Profile '{}' deleted", args.name);
    }
    Ok(())
}
