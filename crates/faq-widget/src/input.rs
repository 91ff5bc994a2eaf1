use std::borrow::Cow;

use tracing::warn;

use crate::controller::UiEvent;

pub const HELP: &str = "\
Type to search (each line replaces the search box and is filtered after a short pause).
  /submit [text]   search now and ask for a generated answer
  /toggle <slug>   expand or collapse a question
  #<slug>          navigate to a deep link (a bare # clears it)
  /help            show this help
  /quit            exit";

/// What one line of terminal input means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Event(UiEvent),
    Help,
    Quit,
    Ignore,
}

/// Turns terminal lines into widget events, remembering the search box contents so
/// a bare `/submit` confirms whatever was typed last.
#[derive(Debug, Default)]
pub struct InputTracker {
    search_box: String,
}

impl InputTracker {
    /// Raw bytes of one line, newline included or not. Invalid UTF-8 is replaced
    /// rather than rejected.
    pub fn parse_bytes(&mut self, raw: &[u8]) -> HostCommand {
        let line = String::from_utf8_lossy(raw);
        if matches!(line, Cow::Owned(_)) {
            warn!("input line is not valid UTF-8, replacing invalid bytes");
        }
        self.parse(&line)
    }

    pub fn parse(&mut self, line: &str) -> HostCommand {
        let line = line.trim_end_matches(['\r', '\n']);

        if line.starts_with('#') {
            return HostCommand::Event(UiEvent::FragmentChanged(Some(line.to_string())));
        }

        let Some(command) = line.strip_prefix('/') else {
            self.search_box = line.to_string();
            return HostCommand::Event(UiEvent::Input(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "quit" | "q" => HostCommand::Quit,
            "help" | "h" => HostCommand::Help,
            "submit" | "s" => {
                if !arg.is_empty() {
                    self.search_box = arg.to_string();
                }
                HostCommand::Event(UiEvent::Submit(self.search_box.clone()))
            }
            "toggle" | "t" if !arg.is_empty() => {
                HostCommand::Event(UiEvent::Toggle(arg.trim_start_matches('#').to_string()))
            }
            _ => {
                warn!(line, "unrecognized command, try /help");
                HostCommand::Ignore
            }
        }
    }
}
