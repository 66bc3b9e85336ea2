//! Command grammar: a verb, then free-form arguments.
//!
//! Input is parsed once into a [`Command`]; per-verb argument shapes are
//! parsed from its `args` by the `*Args` types below.

use strsim::jaro_winkler;

use crate::error::{ArgError, ParseError};

/// Minimum similarity for a "did you mean" suggestion (0.0-1.0).
const SUGGEST_THRESHOLD: f64 = 0.8;

/// The commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Add one or more options.
    Add,
    /// Remove an option.
    Remove,
    /// List options, optionally by tag.
    List,
    /// Draw an option.
    Spin,
    /// Show usage.
    Help,
    /// Tag an option.
    Tag,
    /// Reset options, weights, or tags.
    Reset,
}

/// Whether a verb needs an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// Arguments are optional.
    Optional,
    /// An empty argument is rejected before the store is touched.
    Required,
}

impl Verb {
    /// Every verb, in the order they are listed to users.
    pub const ALL: [Verb; 7] = [
        Verb::Add,
        Verb::Remove,
        Verb::List,
        Verb::Spin,
        Verb::Tag,
        Verb::Reset,
        Verb::Help,
    ];

    /// The verb as typed.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::List => "list",
            Self::Spin => "spin",
            Self::Help => "help",
            Self::Tag => "tag",
            Self::Reset => "reset",
        }
    }

    /// Argument requirement for this verb.
    pub fn arg_shape(self) -> ArgShape {
        match self {
            Self::Add | Self::Remove | Self::Tag | Self::Reset => ArgShape::Required,
            Self::List | Self::Spin | Self::Help => ArgShape::Optional,
        }
    }

    /// Resolve a leading token to a verb.
    ///
    /// An exact name wins (case-insensitive). Otherwise the token must be a
    /// prefix of exactly one verb, so `sp` means `spin` but `re` is rejected.
    pub fn resolve(token: &str) -> Option<Self> {
        let token = token.to_lowercase();
        if token.is_empty() {
            return None;
        }
        if let Some(verb) = Self::ALL.into_iter().find(|v| v.name() == token) {
            return Some(verb);
        }
        let mut matches = Self::ALL
            .into_iter()
            .filter(|v| v.name().starts_with(token.as_str()));
        match (matches.next(), matches.next()) {
            (Some(verb), None) => Some(verb),
            _ => None,
        }
    }

    /// The verb closest to a mistyped token, if any is close enough.
    pub fn suggest(token: &str) -> Option<Self> {
        let token = token.to_lowercase();
        Self::ALL
            .into_iter()
            .map(|v| (v, jaro_winkler(&token, v.name())))
            .filter(|(_, score)| *score >= SUGGEST_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(v, _)| v)
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed command: the verb and the trimmed remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    /// Which command.
    pub verb: Verb,
    /// Everything after the verb, trimmed. Empty when absent.
    pub args: &'a str,
}

/// Remove the command prefix (e.g. `$wheel`) if the input starts with it.
pub fn strip_prefix<'a>(input: &'a str, prefix: &str) -> &'a str {
    let trimmed = input.trim();
    if prefix.is_empty() {
        return trimmed;
    }
    match trimmed.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => trimmed,
    }
}

/// Split prefix-stripped input into verb and arguments.
///
/// A bare verb parses with empty arguments.
pub fn parse(input: &str) -> Result<Command<'_>, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    let (token, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let verb = Verb::resolve(token).ok_or_else(|| ParseError::UnknownVerb(token.to_string()))?;
    Ok(Command {
        verb,
        args: rest.trim(),
    })
}

/// Split a comma-separated list, trimming each entry.
pub fn split_list(input: &str) -> Vec<&str> {
    input.split(',').map(str::trim).collect()
}

/// Arguments to `spin`: `[tag,tag...] [debug]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpinArgs {
    /// Required tags; empty means no filter.
    pub tags: Vec<String>,
    /// Draw without updating weights.
    pub debug: bool,
}

impl SpinArgs {
    /// Parse spin arguments. `debug` may appear anywhere, either as its own
    /// word or as an entry of the tag list.
    pub fn parse(args: &str) -> Self {
        let mut debug = false;
        let mut rest = Vec::new();
        for word in args.split_whitespace() {
            if word.eq_ignore_ascii_case("debug") {
                debug = true;
            } else {
                rest.push(word);
            }
        }
        let mut tags = Vec::new();
        for tag in split_list(&rest.join(" ")) {
            if tag.eq_ignore_ascii_case("debug") {
                debug = true;
            } else if !tag.is_empty() {
                tags.push(tag.to_string());
            }
        }
        Self { tags, debug }
    }
}

/// Arguments to `tag`: `<tag,tag...> <item>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagArgs<'a> {
    /// Tags to apply.
    pub tags: Vec<&'a str>,
    /// Option to tag.
    pub item: &'a str,
}

impl<'a> TagArgs<'a> {
    /// Parse tag arguments. Exactly two whitespace-separated tokens are
    /// required, and no tag in the list may be blank.
    pub fn parse(args: &'a str) -> Result<Self, ArgError> {
        let mut words = args.split_whitespace();
        let (Some(tags), Some(item), None) = (words.next(), words.next(), words.next()) else {
            return Err(ArgError::Usage);
        };
        let tags = split_list(tags);
        if tags.iter().any(|t| t.is_empty()) {
            return Err(ArgError::EmptyTag);
        }
        Ok(Self { tags, item })
    }
}

/// What `reset` should clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTarget {
    /// Remove every option.
    Options,
    /// Set every weight to 1.
    Weights,
    /// Remove every tag.
    Tags,
    /// Show usage.
    Help,
}

impl ResetTarget {
    /// Parse the reset subcommand. Unknown subcommands yield `None`.
    pub fn parse(args: &str) -> Option<Self> {
        match args.trim().to_lowercase().as_str() {
            "options" => Some(Self::Options),
            "weights" => Some(Self::Weights),
            "tags" => Some(Self::Tags),
            "" | "help" => Some(Self::Help),
            _ => None,
        }
    }
}
