/// One line typed at the session prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    ListSites,
    RefreshSites,
    Save,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let Some(name) = trimmed.strip_prefix(':') else {
        return Command::Submit(trimmed.to_string());
    };
    match name.trim().to_ascii_lowercase().as_str() {
        "sites" | "s" => Command::ListSites,
        "refresh" => Command::RefreshSites,
        "save" | "download" | "d" => Command::Save,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
