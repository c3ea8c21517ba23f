use blockhost_core::{Msg, Page};

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Apply,
    List,
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  list            show sources and their state
  toggle <id>     enable or disable a source
  apply           download enabled sources and write the hosts file
  home | hosts    switch page
  help            show this text
  quit            exit";

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for '{verb}'"));
    }

    let command = match (verb.to_ascii_lowercase().as_str(), arg) {
        ("toggle" | "t", Some(id)) => Command::Dispatch(Msg::SourceToggled { id: id.to_string() }),
        ("toggle" | "t", None) => return Err("usage: toggle <id>".to_string()),
        ("apply" | "a", None) => Command::Apply,
        ("list" | "ls", None) => Command::List,
        ("home", None) => Command::Dispatch(Msg::Navigate(Page::Home)),
        ("hosts", None) => Command::Dispatch(Msg::Navigate(Page::Hosts)),
        ("help" | "?", None) => Command::Help,
        ("quit" | "exit" | "q", None) => Command::Quit,
        (_, Some(_)) if is_known(verb) => return Err(format!("'{verb}' takes no argument")),
        _ => return Err(format!("unknown command '{verb}', type 'help'")),
    };
    Ok(Some(command))
}

fn is_known(verb: &str) -> bool {
    matches!(
        verb.to_ascii_lowercase().as_str(),
        "apply" | "a" | "list" | "ls" | "home" | "hosts" | "help" | "?" | "quit" | "exit" | "q"
    )
}
