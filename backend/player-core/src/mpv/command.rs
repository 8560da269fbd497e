/// What a caller hands to [`MpvClient::send`](crate::mpv::MpvClient::send).
///
/// A `Line` is split on whitespace; `Tokens` go on the wire untouched, so a
/// file path containing spaces must be passed as a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandInput {
    Line(String),
    Tokens(Vec<String>),
}

impl CommandInput {
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            CommandInput::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            CommandInput::Tokens(tokens) => tokens,
        }
    }
}

impl From<&str> for CommandInput {
    fn from(line: &str) -> Self {
        CommandInput::Line(line.to_string())
    }
}

impl From<String> for CommandInput {
    fn from(line: String) -> Self {
        CommandInput::Line(line)
    }
}

impl From<Vec<String>> for CommandInput {
    fn from(tokens: Vec<String>) -> Self {
        CommandInput::Tokens(tokens)
    }
}

impl From<Vec<&str>> for CommandInput {
    fn from(tokens: Vec<&str>) -> Self {
        CommandInput::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for CommandInput {
    fn from(tokens: [&str; N]) -> Self {
        CommandInput::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}
