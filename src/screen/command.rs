//! Parsing for the list screen's `:` command line.

/// A recognised command-line entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Jump to an absolute feed number.
    Jump(usize),
    /// `tag <name>`
    Tag(String),
    /// `goto <text>`
    Goto(String),
}

/// Split a command line the way a shell would, keeping `"quoted text"`
/// together. `None` for an unterminated quote.
pub fn tokenize(text: &str) -> Option<Vec<String>> {
    shlex::split(text)
}

/// Leading decimal digits of `token`, if any.
fn leading_number(token: &str) -> Option<&str> {
    let end = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(token.len(), |(i, _)| i);
    (end > 0).then(|| &token[..end])
}

/// Parse one command line. `Ok(None)` for blank input, `Err(text)` for
/// anything unrecognised.
///
/// A line starting with a number jumps to that feed; whatever follows the
/// digits is ignored. `goto` searches for its first argument only.
pub fn parse(text: &str) -> Result<Option<Command>, String> {
    let unknown = || text.trim().to_string();
    let tokens = tokenize(text).ok_or_else(unknown)?;
    let Some(first) = tokens.first() else {
        return Ok(None);
    };

    if let Some(digits) = leading_number(first) {
        return digits
            .parse::<usize>()
            .map(|n| Some(Command::Jump(n)))
            .map_err(|_| unknown());
    }

    match (first.as_str(), tokens.get(1)) {
        ("tag", Some(name)) => Ok(Some(Command::Tag(name.clone()))),
        ("goto", Some(needle)) if needle.trim().is_empty() => Ok(None),
        ("goto", Some(needle)) => Ok(Some(Command::Goto(needle.clone()))),
        _ => Err(unknown()),
    }
}
