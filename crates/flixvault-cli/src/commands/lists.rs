use super::{titled_table, Session};
use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use std::path::PathBuf;
use watchlist_core::WatchlistError;
use watchlist_models::{Category, ItemRecord, ListCollection, RemoveTarget};

pub async fn run_register(session: &Session, output: &Output) -> Result<()> {
    let account = session.service.register(&session.identity).await?;

    if output.is_human() {
        let since = account
            .created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        output.success(format!(
            "Lists ready for {} ({} movies, account since {})",
            account.identity,
            account.lists.len(),
            since
        ));
    } else {
        output.json(&json!({
            "identity": account.identity,
            "createdAt": account.created_at,
            "counts": counts(&account.lists),
        }));
    }
    Ok(())
}

pub async fn run_list(session: &Session, category: Option<String>, output: &Output) -> Result<()> {
    let category = category
        .map(|c| c.parse::<Category>().map_err(WatchlistError::from))
        .transpose()?;
    let lists = session.service.list_all(&session.identity).await?;

    let categories: Vec<Category> = match category {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    if !output.is_human() {
        let mut body = serde_json::Map::new();
        for category in &categories {
            body.insert(category.to_string(), serde_json::to_value(lists.get(*category))?);
        }
        output.json(&Value::Object(body));
        return Ok(());
    }

    for category in categories {
        let items = lists.get(category);
        if items.is_empty() {
            output.println(format!("{} {}", category.as_str().bold(), "(empty)".dimmed()));
            continue;
        }
        output.println(item_table(category, items).to_string());
    }
    Ok(())
}

pub async fn run_add(
    session: &Session,
    category: &str,
    json_arg: Option<String>,
    file: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let payload = read_payload(json_arg, file)?;
    let previous = match payload_identifier(&payload) {
        Some(id) => session.service.category_of(&session.identity, &id).await?,
        None => None,
    };

    let lists = session
        .service
        .list_upsert(&session.identity, category, &payload)
        .await?;
    let category: Category = category.parse().map_err(WatchlistError::from)?;
    let item = lists.get(category).first();

    if output.is_human() {
        if let Some(item) = item {
            match previous {
                Some(from) if from != category => output.success(format!(
                    "Moved {} ({}) from {} to {}",
                    item.title, item.imdb_id, from, category
                )),
                Some(_) => output.success(format!("Updated {} ({}) in {}", item.title, item.imdb_id, category)),
                None => output.success(format!("Added {} ({}) to {}", item.title, item.imdb_id, category)),
            }
        }
    } else {
        output.json(&json!({
            "category": category,
            "movedFrom": previous.filter(|from| *from != category),
            "item": item,
            "counts": counts(&lists),
        }));
    }
    Ok(())
}

pub async fn run_remove(session: &Session, target: &str, imdb_id: &str, output: &Output) -> Result<()> {
    let parsed: RemoveTarget = target.parse().map_err(WatchlistError::from)?;
    let before = session.service.category_of(&session.identity, imdb_id).await?;

    let lists = session
        .service
        .list_remove(&session.identity, target, imdb_id)
        .await?;
    let removed_from = before.filter(|category| match parsed {
        RemoveTarget::All => true,
        RemoveTarget::Only(only) => only == *category,
    });

    if output.is_human() {
        match removed_from {
            Some(category) => output.success(format!("Removed {} from {}", imdb_id.trim(), category)),
            None => output.info(format!("{} is not in {}, nothing to remove", imdb_id.trim(), parsed)),
        }
    } else {
        output.json(&json!({
            "imdbId": imdb_id.trim(),
            "target": parsed.to_string(),
            "removedFrom": removed_from,
            "counts": counts(&lists),
        }));
    }
    Ok(())
}

pub async fn run_status(session: &Session, imdb_id: &str, output: &Output) -> Result<()> {
    let category = session.service.category_of(&session.identity, imdb_id).await?;

    if output.is_human() {
        match category {
            Some(category) => output.info(format!("{} is in {}", imdb_id.trim(), category.as_str().green())),
            None => output.info(format!("{} is not in any list", imdb_id.trim())),
        }
    } else {
        output.json(&json!({
            "imdbId": imdb_id.trim(),
            "tracked": category.is_some(),
            "category": category,
        }));
    }
    Ok(())
}

fn read_payload(json_arg: Option<String>, file: Option<PathBuf>) -> Result<Value> {
    let raw = match (json_arg, file) {
        (Some(raw), _) => raw,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read payload from {}", path.display()))?,
        (None, None) => return Err(color_eyre::eyre::eyre!("Provide a payload with --json or --file")),
    };
    serde_json::from_str(&raw).wrap_err("Payload is not valid JSON")
}

/// The id the normalizer would pick, used to report moves
fn payload_identifier(payload: &Value) -> Option<String> {
    watchlist_core::normalize_payload(payload)
        .ok()
        .map(|item| item.imdb_id)
}

fn counts(lists: &ListCollection) -> Value {
    let mut body = serde_json::Map::new();
    for category in Category::ALL {
        body.insert(category.to_string(), json!(lists.get(category).len()));
    }
    Value::Object(body)
}

fn item_table(category: Category, items: &[ItemRecord]) -> comfy_table::Table {
    let mut table = titled_table(&format!("{} ({})", category, items.len()));
    table.add_row(vec![
        Cell::new("IMDb ID").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Released").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Rating").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Runtime").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Added").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for item in items {
        table.add_row(vec![
            Cell::new(&item.imdb_id),
            Cell::new(&item.title),
            Cell::new(&item.release_date),
            Cell::new(item.rating.map(|r| format!("{:.1}", r)).unwrap_or_default()),
            Cell::new(&item.runtime),
            Cell::new(item.added_at.map(|at| at.format("%Y-%m-%d").to_string()).unwrap_or_default()),
        ]);
    }
    table
}
