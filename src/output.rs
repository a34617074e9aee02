//! Output formatting for CLI commands

use crate::models::{Item, ShoppingList};
use crossterm::style::{style, Stylize};
use serde::Serialize;
use std::ffi::OsStr;
use std::io::{self, IsTerminal, Write};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Whether text output should be coloured, given the flags, `NO_COLOR` and
/// whether stdout is a terminal.
pub fn color_enabled(format: OutputFormat, no_color_flag: bool) -> bool {
    let no_color_env = std::env::var_os("NO_COLOR");
    color_enabled_for(format, no_color_flag, no_color_env.as_deref(), io::stdout().is_terminal())
}

/// Colour only for text on a terminal, and only when neither `--no-color`
/// nor a non-empty `NO_COLOR` asks otherwise.
pub fn color_enabled_for(
    format: OutputFormat,
    no_color_flag: bool,
    no_color_env: Option<&OsStr>,
    stdout_tty: bool,
) -> bool {
    let no_color_env = no_color_env.map(|v| !v.is_empty()).unwrap_or(false);
    format == OutputFormat::Text && !no_color_flag && !no_color_env && stdout_tty
}

/// Writes command results either as text or as a single JSON document.
pub struct Output<W: Write> {
    out: W,
    format: OutputFormat,
    color: bool,
}

impl Output<io::Stdout> {
    pub fn stdout(format: OutputFormat, color: bool) -> Self {
        Output::new(io::stdout(), format, color)
    }
}

impl<W: Write> Output<W> {
    pub fn new(out: W, format: OutputFormat, color: bool) -> Self {
        Self { out, format, color }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints a text line (ignored in JSON mode).
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        if self.is_json() {
            return Ok(());
        }
        writeln!(self.out, "{}", text)
    }

    /// Prints structured data (ignored in text mode).
    pub fn json<T: Serialize>(&mut self, data: &T) -> io::Result<()> {
        if !self.is_json() {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
        writeln!(self.out, "{}", json)
    }

    /// Prints a success message, or `{"success": true, ...}` with the extra
    /// fields merged in.
    pub fn success(&mut self, message: &str, extra: serde_json::Value) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let text = if self.color { style(message).green().to_string() } else { message.to_string() };
                writeln!(self.out, "{}", text)
            }
            OutputFormat::Json => {
                let mut doc = serde_json::json!({ "success": true, "message": message });
                if let (Some(doc), serde_json::Value::Object(extra)) = (doc.as_object_mut(), extra) {
                    doc.extend(extra);
                }
                self.json(&doc)
            }
        }
    }

    pub fn heading(&mut self, text: &str) -> io::Result<()> {
        let text = if self.color { style(text).bold().to_string() } else { text.to_string() };
        self.line(&text)
    }

    /// One text line per item: `[x] Milk (2) - dairy - organic`.
    pub fn item_line(&mut self, item: &Item) -> io::Result<()> {
        let line = format_item(item);
        let line = match (self.color, item.checked) {
            (true, true) => style(line).dark_grey().to_string(),
            _ => line,
        };
        self.line(&line)
    }
}

pub fn format_item(item: &Item) -> String {
    let mut line = format!("[{}] {}", if item.checked { "x" } else { " " }, item.name);
    if let Some(q) = item.quantity.as_deref().filter(|q| !q.is_empty()) {
        line.push_str(&format!(" ({})", q));
    }
    if let Some(cat) = item.category_label() {
        line.push_str(&format!(" - {}", cat));
    }
    if let Some(notes) = item.details.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(&format!(" - {}", notes));
    }
    line
}

/// Prints an error to stderr in the requested format.
pub fn print_error(format: OutputFormat, message: &str, code: u8) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => eprintln!(
            "{}",
            serde_json::json!({ "success": false, "error": message, "code": code })
        ),
    }
}

/// JSON view of an item, shared by every command that reports items.
#[derive(Serialize, Debug)]
pub struct ItemView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub quantity: Option<&'a str>,
    pub checked: bool,
    pub category: Option<String>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a Item> for ItemView<'a> {
    fn from(item: &'a Item) -> Self {
        ItemView {
            id: &item.identifier,
            name: &item.name,
            quantity: item.quantity.as_deref(),
            checked: item.checked,
            category: item.category_label(),
            notes: item.details.as_deref(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ListRef<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

impl<'a> From<&'a ShoppingList> for ListRef<'a> {
    fn from(list: &'a ShoppingList) -> Self {
        ListRef { id: &list.identifier, name: &list.name }
    }
}
