// Command handlers. Each verb is one lookup in the freshly fetched lists
// followed by at most a few service calls. Handlers are generic over the
// service so the whole flow can run against an in-memory fake in tests.

use crate::cli::Commands;
use crate::config::{ConfigStore, Credentials};
use crate::error::CliError;
use crate::models::{names_match, Category, Item, NewItem, ShoppingList};
use crate::output::{ItemView, ListRef, Output};
use crate::service::{ServiceError, Session, ShoppingService};
use crate::ui;
use anyhow::{Context as _, Result};
use serde_json::json;
use std::io::Write;

/// Everything a command needs besides the service itself.
pub struct Context<'a, W: Write> {
    pub store: ConfigStore,
    /// Credentials from the environment, if both variables were set.
    pub env: Option<Credentials>,
    pub output: &'a mut Output<W>,
    /// Whether missing input may be prompted for.
    pub interactive: bool,
    /// Whether to show spinners on stderr.
    pub progress: bool,
}

/// Runs one command. `connect` builds an unauthenticated service client; it
/// is only called by commands that talk to the service.
pub fn dispatch<S, W, F>(command: Commands, ctx: &mut Context<'_, W>, connect: F) -> Result<()>
where
    S: ShoppingService,
    W: Write,
    F: FnOnce() -> Result<S, ServiceError>,
{
    match command {
        Commands::Auth { email, password } => auth(ctx, email, password, connect),
        Commands::Logout => logout(ctx),
        Commands::Whoami => whoami(ctx),
        Commands::Categories => categories(ctx.output),
        Commands::Add { list, item, quantity, category, notes } => {
            // Validate before any network traffic.
            let category = category.as_deref().map(parse_category).transpose()?;
            let new_item = NewItem {
                name: clean_item_name(&item)?,
                quantity,
                details: notes,
                category_match_id: category.map(|c| c.id().to_string()),
            };
            let session = open_session(ctx, connect)?;
            add(&session, ctx.output, &list, new_item)
        }
        Commands::Lists => lists(&open_session(ctx, connect)?, ctx.output),
        Commands::Items { list, unchecked } => {
            items(&open_session(ctx, connect)?, ctx.output, &list, unchecked)
        }
        Commands::Check { list, item } => {
            set_checked(&open_session(ctx, connect)?, ctx.output, &list, &item, true)
        }
        Commands::Uncheck { list, item } => {
            set_checked(&open_session(ctx, connect)?, ctx.output, &list, &item, false)
        }
        Commands::Remove { list, item } => {
            remove(&open_session(ctx, connect)?, ctx.output, &list, &item)
        }
        Commands::Clear { list } => clear(&open_session(ctx, connect)?, ctx.output, &list),
    }
}

pub fn parse_category(name: &str) -> Result<Category, CliError> {
    name.parse::<Category>().map_err(|e| {
        CliError::Usage(format!("{}. Valid categories: {}", e, Category::names().join(", ")))
    })
}

/// Trimmed item name; blank names are a usage error.
pub fn clean_item_name(raw: &str) -> Result<String, CliError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CliError::Usage("Item name must not be empty".into()));
    }
    Ok(name.to_string())
}

/// Resolves stored credentials and logs in.
pub fn open_session<S, W, F>(ctx: &Context<'_, W>, connect: F) -> Result<Session<S>>
where
    S: ShoppingService,
    W: Write,
    F: FnOnce() -> Result<S, ServiceError>,
{
    let (creds, source) = ctx
        .store
        .resolve(ctx.env.clone())?
        .ok_or_else(CliError::not_logged_in)?;
    tracing::debug!(email = %creds.email, %source, "using credentials");
    let service = connect().context("Failed to set up the service client")?;
    let session = ui::with_spinner(ctx.progress, "Logging in...", || Session::open(service, &creds))?;
    Ok(session)
}

pub fn find_list<'a>(lists: &'a [ShoppingList], name: &str) -> Result<&'a ShoppingList, CliError> {
    lists
        .iter()
        .find(|l| names_match(&l.name, name))
        .ok_or_else(|| CliError::NotFound(format!("List \"{}\" not found", name)))
}

pub fn find_item<'a>(list: &'a ShoppingList, name: &str) -> Result<&'a Item, CliError> {
    list.items
        .iter()
        .find(|i| names_match(&i.name, name))
        .ok_or_else(|| CliError::NotFound(format!("Item \"{}\" not found in \"{}\"", name, list.name)))
}

/// Fetches all lists and returns the one named `name`.
pub fn fetch_list<S: ShoppingService>(session: &Session<S>, name: &str) -> Result<ShoppingList> {
    let lists = session.service().lists().context("Failed to fetch lists")?;
    tracing::debug!(count = lists.len(), query = name, "looking up list");
    let found = find_list(&lists, name)?.clone();
    Ok(found)
}

fn auth<S, W, F>(
    ctx: &mut Context<'_, W>,
    email: Option<String>,
    password: Option<String>,
    connect: F,
) -> Result<()>
where
    S: ShoppingService,
    W: Write,
    F: FnOnce() -> Result<S, ServiceError>,
{
    let email = match email {
        Some(e) => e,
        None if ctx.interactive => ui::prompt_email()?,
        None => return Err(CliError::Usage("--email is required when not running in a terminal".into()).into()),
    };
    let password = match password {
        Some(p) => p,
        None if ctx.interactive => ui::prompt_password()?,
        None => {
            return Err(CliError::Usage("--password is required when not running in a terminal".into()).into())
        }
    };
    let email = email.trim().to_string();
    if email.is_empty() || password.is_empty() {
        return Err(CliError::Usage("Email and password must not be empty".into()).into());
    }
    let creds = Credentials { email, password };

    let service = connect().context("Failed to set up the service client")?;
    let session = ui::with_spinner(ctx.progress, "Logging in...", || Session::open(service, &creds))?;
    drop(session);

    ctx.store.save(&creds)?;
    ctx.output.success(
        &format!("Logged in as {}", creds.email),
        json!({ "email": creds.email, "config": ctx.store.path().display().to_string() }),
    )?;
    Ok(())
}

fn logout<W: Write>(ctx: &mut Context<'_, W>) -> Result<()> {
    let removed = ctx.store.delete()?;
    let message = if removed { "Logged out." } else { "Not logged in; nothing to remove." };
    let env_active = ctx.env.is_some();
    ctx.output.success(message, json!({ "removed": removed, "env_credentials_active": env_active }))?;
    if env_active {
        ctx.output.line("Note: ANYLIST_EMAIL and ANYLIST_PASSWORD are still set.")?;
    }
    Ok(())
}

fn whoami<W: Write>(ctx: &mut Context<'_, W>) -> Result<()> {
    let (creds, source) = ctx
        .store
        .resolve(ctx.env.clone())?
        .ok_or_else(CliError::not_logged_in)?;
    ctx.output.line(&format!("{} (from {})", creds.email, source))?;
    ctx.output.json(&json!({ "email": creds.email, "source": source }))?;
    Ok(())
}

fn categories<W: Write>(output: &mut Output<W>) -> Result<()> {
    for c in Category::ALL {
        output.line(&format!("{:<14} {}", c.name(), c.id()))?;
    }
    let all: Vec<_> = Category::ALL
        .iter()
        .map(|c| json!({ "name": c.name(), "id": c.id() }))
        .collect();
    output.json(&all)?;
    Ok(())
}

pub fn lists<S: ShoppingService, W: Write>(session: &Session<S>, output: &mut Output<W>) -> Result<()> {
    let lists = session.service().lists().context("Failed to fetch lists")?;
    if lists.is_empty() {
        output.line("No lists found.")?;
    }
    for list in &lists {
        output.line(&format!(
            "{}  ({} unchecked, {} total)",
            list.name,
            list.unchecked_count(),
            list.items.len()
        ))?;
    }
    let views: Vec<_> = lists
        .iter()
        .map(|l| {
            json!({
                "id": l.identifier,
                "name": l.name,
                "unchecked": l.unchecked_count(),
                "total": l.items.len(),
            })
        })
        .collect();
    output.json(&views)?;
    Ok(())
}

pub fn items<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    list_name: &str,
    unchecked_only: bool,
) -> Result<()> {
    let list = fetch_list(session, list_name)?;
    let shown: Vec<&Item> = list.items.iter().filter(|i| !(unchecked_only && i.checked)).collect();

    output.heading(&list.name)?;
    if shown.is_empty() {
        output.line("(no items)")?;
    }
    for item in &shown {
        output.item_line(item)?;
    }
    let views: Vec<ItemView> = shown.iter().map(|i| ItemView::from(*i)).collect();
    output.json(&json!({ "list": ListRef::from(&list), "items": views }))?;
    Ok(())
}

pub fn add<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    list_name: &str,
    mut new_item: NewItem,
) -> Result<()> {
    new_item.name = clean_item_name(&new_item.name)?;
    let list = fetch_list(session, list_name)?;
    let existing = list.items.iter().find(|i| names_match(&i.name, &new_item.name)).cloned();

    let (action, item) = match existing {
        Some(mut item) => {
            item.checked = false;
            if new_item.quantity.is_some() {
                item.quantity = new_item.quantity;
            }
            if new_item.details.is_some() {
                item.details = new_item.details;
            }
            if new_item.category_match_id.is_some() {
                item.category_match_id = new_item.category_match_id;
            }
            session
                .service()
                .save_item(&list.identifier, &item)
                .with_context(|| format!("Failed to save \"{}\"", item.name))?;
            ("updated", item)
        }
        None => {
            let created = session
                .service()
                .add_item(&list.identifier, &new_item)
                .with_context(|| format!("Failed to add \"{}\"", new_item.name))?;
            ("added", created)
        }
    };

    let message = match action {
        "added" => format!("Added \"{}\" to {}", item.name, list.name),
        _ => format!("Updated \"{}\" on {}", item.name, list.name),
    };
    output.success(
        &message,
        json!({ "action": action, "list": ListRef::from(&list), "item": ItemView::from(&item) }),
    )?;
    Ok(())
}

pub fn set_checked<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    list_name: &str,
    item_name: &str,
    checked: bool,
) -> Result<()> {
    let list = fetch_list(session, list_name)?;
    let item = find_item(&list, item_name)?.clone();
    check_item(session, output, &list, item, checked)
}

/// Sets the checked flag on an item already picked from `list`.
pub fn check_item<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    list: &ShoppingList,
    mut item: Item,
    checked: bool,
) -> Result<()> {
    item.checked = checked;
    session
        .service()
        .save_item(&list.identifier, &item)
        .with_context(|| format!("Failed to save \"{}\"", item.name))?;

    let action = if checked { "checked" } else { "unchecked" };
    output.success(
        &format!("{} \"{}\" on {}", if checked { "Checked" } else { "Unchecked" }, item.name, list.name),
        json!({ "action": action, "list": ListRef::from(list), "item": ItemView::from(&item) }),
    )?;
    Ok(())
}

pub fn remove<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    list_name: &str,
    item_name: &str,
) -> Result<()> {
    let list = fetch_list(session, list_name)?;
    let item = find_item(&list, item_name)?;
    remove_item(session, output, &list, item)
}

/// Deletes an item already picked from `list`.
pub fn remove_item<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    list: &ShoppingList,
    item: &Item,
) -> Result<()> {
    session
        .service()
        .remove_item(&list.identifier, &item.identifier)
        .with_context(|| format!("Failed to remove \"{}\"", item.name))?;
    output.success(
        &format!("Removed \"{}\" from {}", item.name, list.name),
        json!({ "action": "removed", "list": ListRef::from(list), "item": ItemView::from(item) }),
    )?;
    Ok(())
}

pub fn clear<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    list_name: &str,
) -> Result<()> {
    let list = fetch_list(session, list_name)?;
    let checked: Vec<&Item> = list.items.iter().filter(|i| i.checked).collect();
    for item in &checked {
        session
            .service()
            .remove_item(&list.identifier, &item.identifier)
            .with_context(|| format!("Failed to remove \"{}\"", item.name))?;
    }
    let names: Vec<&str> = checked.iter().map(|i| i.name.as_str()).collect();
    let message = match checked.len() {
        0 => format!("No checked items on {}", list.name),
        1 => format!("Removed 1 checked item from {}", list.name),
        n => format!("Removed {} checked items from {}", n, list.name),
    };
    output.success(
        &message,
        json!({ "action": "cleared", "list": ListRef::from(&list), "removed": checked.len(), "items": names }),
    )?;
    Ok(())
}
