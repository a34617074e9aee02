// UI layer: prompts, spinners and the interactive menu, all built on
// `dialoguer` and `indicatif`. Everything here expects a terminal; the
// scripted paths in `commands` never call into it unless told they may.

use crate::commands;
use crate::models::{Category, Item, NewItem, ShoppingList};
use crate::output::{format_item, Output};
use crate::service::{Session, ShoppingService};
use anyhow::Result;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Runs `f` while a spinner with `message` turns on stderr. With `enabled`
/// false this is just `f()`.
pub fn with_spinner<T>(enabled: bool, message: &str, f: impl FnOnce() -> T) -> T {
    if !enabled {
        return f();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}

pub fn prompt_email() -> Result<String> {
    Ok(Input::new().with_prompt("Email").interact_text()?)
}

/// `Password` hides input in the terminal.
pub fn prompt_password() -> Result<String> {
    Ok(Password::new().with_prompt("Password").interact()?)
}

/// Main interactive menu: pick a list, then act on it, until "Exit".
///
/// `Select::interact()` is keyboard-driven: arrow keys and Enter.
pub fn main_menu<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    progress: bool,
) -> Result<()> {
    loop {
        let lists = with_spinner(progress, "Fetching lists...", || session.service().lists())?;
        if lists.is_empty() {
            output.line("No lists found.")?;
            return Ok(());
        }
        let mut labels: Vec<String> = lists
            .iter()
            .map(|l| format!("{} ({} unchecked)", l.name, l.unchecked_count()))
            .collect();
        labels.push("Exit".into());

        let selection = Select::new().with_prompt("Choose a list").items(&labels).default(0).interact()?;
        if selection >= lists.len() {
            break;
        }
        list_menu(session, output, progress, &lists[selection].name)?;
    }
    Ok(())
}

fn list_menu<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    progress: bool,
    list_name: &str,
) -> Result<()> {
    let actions = [
        "Show items",
        "Check / uncheck an item",
        "Add an item",
        "Remove an item",
        "Clear checked items",
        "Back",
    ];
    loop {
        let selection = Select::new().with_prompt(list_name).items(&actions).default(0).interact()?;
        let result = match selection {
            0 => commands::items(session, output, list_name, false),
            1 => toggle_item(session, output, progress, list_name),
            2 => add_item(session, output, list_name),
            3 => remove_item(session, output, progress, list_name),
            4 => commands::clear(session, output, list_name),
            _ => break,
        };
        // A failed action should not end the menu; report and carry on.
        if let Err(e) = result {
            eprintln!("Error: {:#}", e);
        }
    }
    Ok(())
}

/// Lets the user pick one item of the list. `None` when the list is empty.
/// The chosen item is returned as fetched so later actions hit that exact
/// entry even when another item shares its name.
fn pick_item<S: ShoppingService>(
    session: &Session<S>,
    progress: bool,
    list_name: &str,
    prompt: &str,
) -> Result<Option<(ShoppingList, Item)>> {
    let list = with_spinner(progress, "Fetching items...", || commands::fetch_list(session, list_name))?;
    if list.items.is_empty() {
        println!("(no items)");
        return Ok(None);
    }
    let labels: Vec<String> = list.items.iter().map(format_item).collect();
    let selection = Select::new().with_prompt(prompt).items(&labels).default(0).interact()?;
    let item = list.items[selection].clone();
    Ok(Some((list, item)))
}

fn toggle_item<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    progress: bool,
    list_name: &str,
) -> Result<()> {
    if let Some((list, item)) = pick_item(session, progress, list_name, "Toggle which item?")? {
        let checked = !item.checked;
        commands::check_item(session, output, &list, item, checked)?;
    }
    Ok(())
}

fn add_item<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    list_name: &str,
) -> Result<()> {
    let name: String = Input::new().with_prompt("Item").interact_text()?;
    let quantity: String = Input::new().with_prompt("Quantity (optional)").allow_empty(true).interact_text()?;
    let notes: String = Input::new().with_prompt("Notes (optional)").allow_empty(true).interact_text()?;

    let mut choices = vec!["(none)"];
    choices.extend(Category::names());
    let picked = Select::new().with_prompt("Category").items(&choices).default(0).interact()?;
    let category = picked.checked_sub(1).map(|i| Category::ALL[i]);

    let new_item = NewItem {
        name,
        quantity: Some(quantity).filter(|q| !q.trim().is_empty()),
        details: Some(notes).filter(|n| !n.trim().is_empty()),
        category_match_id: category.map(|c| c.id().to_string()),
    };
    commands::add(session, output, list_name, new_item)
}

fn remove_item<S: ShoppingService, W: Write>(
    session: &Session<S>,
    output: &mut Output<W>,
    progress: bool,
    list_name: &str,
) -> Result<()> {
    if let Some((list, item)) = pick_item(session, progress, list_name, "Remove which item?")? {
        let sure = Confirm::new()
            .with_prompt(format!("Remove \"{}\"?", item.name))
            .default(false)
            .interact()?;
        if sure {
            commands::remove_item(session, output, &list, &item)?;
        }
    }
    Ok(())
}
