use std::{cell::Cell, collections::HashMap, io};

use crate::{
    page::{Page, SubmitEvent, LINK_INPUT_ID, SHORTLINK_INPUT_ID},
    request::LinkSummary,
};

/// The shorten form filled in from the command line.
///
/// Alerts go to stderr. A reload is only recorded, the caller renders the
/// refreshed link list afterwards.
#[derive(Debug, Default)]
pub struct TerminalPage {
    inputs: HashMap<&'static str, String>,
    reload_requested: Cell<bool>,
}

impl TerminalPage {
    pub fn new(link: &str, shortlink: &str) -> Self {
        Self {
            inputs: HashMap::from([
                (LINK_INPUT_ID, link.to_string()),
                (SHORTLINK_INPUT_ID, shortlink.to_string()),
            ]),
            reload_requested: Cell::new(false),
        }
    }

    pub fn reload_requested(&self) -> bool {
        self.reload_requested.get()
    }
}

impl Page for TerminalPage {
    fn input_value(&self, id: &str) -> Option<String> {
        self.inputs.get(id).cloned()
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn reload(&self) {
        self.reload_requested.set(true);
    }
}

/// A submission from the command line. There is no default action to suppress.
#[derive(Debug, Clone, Copy)]
pub struct CommandLineSubmit;

impl SubmitEvent for CommandLineSubmit {
    fn prevent_default(&self) {}
}

/// Prints links the way the dashboard's "Your Links" table shows them.
pub fn render_links(links: &[LinkSummary], out: &mut impl io::Write) -> io::Result<()> {
    if links.is_empty() {
        return writeln!(out, "You have no links yet.");
    }

    let width = links
        .iter()
        .map(|link| link.url.chars().count())
        .chain(std::iter::once("URL".len()))
        .max()
        .unwrap_or_default();

    writeln!(out, "{:<width$}  Short link", "URL")?;
    for link in links {
        writeln!(out, "{:<width$}  {}", link.url, link.shortcuts.join(", "))?;
    }

    Ok(())
}
