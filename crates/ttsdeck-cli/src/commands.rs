//! Parsing of interactive prompt commands.

/// One command entered at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Speak the given text.
    Speak(String),
    /// Pause playback.
    Pause,
    /// Resume playback.
    Resume,
    /// Stop playback.
    Stop,
    /// Re-enumerate and list the voice catalog.
    Voices,
    /// Select a voice by 1-based catalog index, or the default.
    Voice(Option<usize>),
    /// Set the rate multiplier.
    Rate(f32),
    /// Set the pitch multiplier.
    Pitch(f32),
    /// Speak a canned sample by 1-based index.
    Sample(usize),
    /// Report character-count feedback for the given text.
    Count(String),
    /// Show the command list.
    Help,
    /// Leave the program.
    Quit,
}

/// Errors produced by [`parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The first word is not a known command.
    Unknown(String),
    /// The command needs an argument it did not get, or got a bad one.
    BadArgument(&'static str),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(word) => write!(f, "unknown command '{word}' (try 'help')"),
            Self::BadArgument(usage) => write!(f, "usage: {usage}"),
        }
    }
}

/// Parse one prompt line. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<Result<ReplCommand, ParseError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match word {
        // The argument of speak is everything after the command word;
        // its validation (empty input) belongs to the session.
        "speak" | "s" => Ok(ReplCommand::Speak(rest.to_string())),
        "pause" | "p" => Ok(ReplCommand::Pause),
        "resume" | "r" => Ok(ReplCommand::Resume),
        "stop" => Ok(ReplCommand::Stop),
        "voices" => Ok(ReplCommand::Voices),
        "voice" => match rest {
            "default" | "" => Ok(ReplCommand::Voice(None)),
            n => n
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .map(|n| ReplCommand::Voice(Some(n - 1)))
                .ok_or(ParseError::BadArgument("voice <number|default>")),
        },
        "rate" => rest
            .parse::<f32>()
            .map(ReplCommand::Rate)
            .map_err(|_| ParseError::BadArgument("rate <multiplier>")),
        "pitch" => rest
            .parse::<f32>()
            .map(ReplCommand::Pitch)
            .map_err(|_| ParseError::BadArgument("pitch <multiplier>")),
        "sample" => rest
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| ReplCommand::Sample(n - 1))
            .ok_or(ParseError::BadArgument("sample <number>")),
        "count" => Ok(ReplCommand::Count(rest.to_string())),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    };

    Some(command)
}
