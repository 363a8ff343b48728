/// One interactive command, parsed from a single whitespace-free token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Load(String),
    Save(String),
    /// `None` when no epoch count was given.
    Train(Option<usize>),
    /// `None` when no record count was given.
    Auc(Option<usize>),
    Predict(usize),
    View(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("no file path")]
    MissingPath,
    #[error("invalid epochs: {0}")]
    InvalidEpochs(String),
    #[error("invalid count: {0}")]
    InvalidCount(String),
    #[error("missing index")]
    MissingIndex,
    #[error("invalid index: {0}")]
    InvalidIndex(String),
}

impl Command {
    /// Parses a token such as `train:3`, `load/tmp/m.txt`, `p12` or `42`.
    /// The `:` between a command and its argument is optional.
    pub fn parse(token: &str) -> Result<Command, CommandError> {
        match token {
            "" | "?" | "h" | "help" => return Ok(Command::Help),
            "q" | "quit" | "exit" => return Ok(Command::Quit),
            _ => {}
        }

        if let Some(rest) = token.strip_prefix("load") {
            return path_arg(rest).map(Command::Load);
        }
        if let Some(rest) = token.strip_prefix("save") {
            return path_arg(rest).map(Command::Save);
        }
        if let Some(rest) = token.strip_prefix("train") {
            return optional_number(argument(rest))
                .map(Command::Train)
                .map_err(CommandError::InvalidEpochs);
        }
        if let Some(rest) = token.strip_prefix("auc") {
            return optional_number(argument(rest))
                .map(Command::Auc)
                .map_err(CommandError::InvalidCount);
        }
        if let Some(rest) = token.strip_prefix('p') {
            return match optional_number(argument(rest)) {
                Ok(Some(index)) => Ok(Command::Predict(index)),
                Ok(None) => Err(CommandError::MissingIndex),
                Err(text) => Err(CommandError::InvalidIndex(text)),
            };
        }

        number(token)
            .map(Command::View)
            .ok_or_else(|| CommandError::InvalidIndex(token.to_string()))
    }
}

fn argument(rest: &str) -> &str {
    rest.strip_prefix(':').unwrap_or(rest)
}

fn path_arg(rest: &str) -> Result<String, CommandError> {
    match argument(rest) {
        "" => Err(CommandError::MissingPath),
        path => Ok(path.to_string()),
    }
}

/// Digits only; `None` for anything else, overflow included.
fn number(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn optional_number(text: &str) -> Result<Option<usize>, String> {
    if text.is_empty() {
        return Ok(None);
    }
    number(text).map(Some).ok_or_else(|| text.to_string())
}
