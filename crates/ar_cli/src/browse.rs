use ar_core::{ArticleStatus, FilterCriteria};
use ar_views::{ActiveView, HistoryNavigator, ViewShell};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::render::{render_detail, render_list};

const HELP: &str = "\
Commands:
  n | next              next page
  p | prev              previous page
  page N                jump to page N
  search TEXT           filter the current page by title (empty clears)
  status original|ai_updated|all
  open INDEX|ID         open an article from the list, or by id
  back                  return to the previous view
  r | reload            retry the current request
  h | help              show this help
  q | quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Page(u32),
    Search(String),
    Status(Option<ArticleStatus>),
    Open(String),
    Back,
    Reload,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "n" | "next" => Ok(Command::Next),
        "p" | "prev" => Ok(Command::Prev),
        "page" => rest
            .parse::<u32>()
            .map(Command::Page)
            .map_err(|_| format!("Invalid page number: {:?}", rest)),
        "search" | "/" => Ok(Command::Search(rest.to_string())),
        "status" => match rest.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Command::Status(None)),
            other => other.parse::<ArticleStatus>().map(|s| Command::Status(Some(s))),
        },
        "open" | "o" if !rest.is_empty() => Ok(Command::Open(rest.to_string())),
        "open" | "o" => Err("Usage: open INDEX|ID".to_string()),
        "back" | "b" => Ok(Command::Back),
        "r" | "reload" => Ok(Command::Reload),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "" => Err("Type h for help".to_string()),
        other => Err(format!("Unknown command: {}", other)),
    }
}

/// A 1-based index into the visible cards, or else the argument as an id.
fn resolve_open(shell: &ViewShell<HistoryNavigator>, target: &str) -> String {
    if let (Ok(index), Some(list)) = (target.parse::<usize>(), shell.list()) {
        if let Some(article) = index.checked_sub(1).and_then(|i| list.visible().get(i)) {
            return article.id.clone();
        }
    }
    target.to_string()
}

pub fn render(shell: &ViewShell<HistoryNavigator>, color: bool) -> String {
    match shell.view() {
        Some(ActiveView::List(list)) => render_list(&list.snapshot(), color),
        Some(ActiveView::Detail(detail)) => render_detail(&detail.snapshot(), color),
        None => String::new(),
    }
}

fn redraw(shell: &ViewShell<HistoryNavigator>, color: bool) {
    println!("{}", render(shell, color));
}

/// Apply one command. Returns false when the session should end.
fn apply(shell: &mut ViewShell<HistoryNavigator>, command: Command) -> ar_core::Result<bool> {
    debug!("⌨️ {:?}", command);
    match command {
        Command::Next => {
            if !shell.next_page()? {
                println!("Already on the last page.");
            }
        }
        Command::Prev => {
            if !shell.prev_page()? {
                println!("Already on the first page.");
            }
        }
        Command::Page(page) => shell.set_page(page)?,
        Command::Search(term) => {
            let status = shell.list().and_then(|list| list.filter().status);
            if !shell.set_filter(FilterCriteria::new(term, status)) {
                println!("Search only applies to the article list.");
            }
        }
        Command::Status(status) => {
            let term = shell
                .list()
                .map(|list| list.filter().search_term.clone())
                .unwrap_or_default();
            if !shell.set_filter(FilterCriteria::new(term, status)) {
                println!("Status filter only applies to the article list.");
            }
        }
        Command::Open(target) => {
            let id = resolve_open(shell, &target);
            shell.open_article(&id)?;
        }
        Command::Back => {
            if !shell.back_or_list()? {
                println!("Already on the first page of articles.");
            }
        }
        Command::Reload => shell.reload()?,
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Interactive session: redraws after every command and every resolved fetch.
pub async fn run(shell: &mut ViewShell<HistoryNavigator>, color: bool) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    redraw(shell, color);

    loop {
        tokio::select! {
            settled = shell.settle(), if shell.in_flight() > 0 => {
                if settled? {
                    redraw(shell, color);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(command) => match apply(shell, command) {
                        Ok(true) => redraw(shell, color),
                        Ok(false) => break,
                        Err(e) => {
                            warn!("Command failed: {}", e);
                            println!("{}", e);
                        }
                    },
                    Err(msg) => println!("{}", msg),
                }
            }
        }
    }
    Ok(())
}
