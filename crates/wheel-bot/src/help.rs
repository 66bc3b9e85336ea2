//! Usage text.

use crate::command::Verb;

/// One-paragraph summary of every command.
pub fn summary(prefix: &str) -> String {
    let verbs: Vec<String> = Verb::ALL.iter().map(|v| format!("`{v}`")).collect();
    format!(
        "{prefix} - command module for spinning the wheel of fate\n\tCommands: {}\n\tUse `{prefix} help <command>` for details.",
        verbs.join(", ")
    )
}

/// Usage text for one verb, written with the configured command prefix.
pub fn usage(verb: Verb, prefix: &str) -> String {
    match verb {
        Verb::Add => format!(
            "Usage:\n\t`{prefix} add <item>` - Adds an item to the wheel.\n\t`{prefix} add <item1>,<item2>,...` - Adds multiple items to the wheel."
        ),
        Verb::Remove => {
            format!("Usage:\n\t`{prefix} remove <item>` - Removes an item from the wheel.")
        }
        Verb::List => format!(
            "Usage:\n\t`{prefix} list` - Lists all items currently on the wheel.\n\t`{prefix} list <tag>` - Lists only items with that tag."
        ),
        Verb::Spin => format!(
            "Usage:\n\t`{prefix} spin` - Spins the wheel and randomly selects an item.\n\t`{prefix} spin <tag1>,<tag2>,...` - Spins only among items carrying every listed tag.\n\t`{prefix} spin [tags] debug` - Spins without changing any weights. `debug` may also be given as an entry of the tag list."
        ),
        Verb::Tag => format!(
            "Usage:\n\t`{prefix} tag <tag1>,<tag2>,... <item>` - Adds tags to an item on the wheel."
        ),
        Verb::Reset => format!(
            "Usage:\n\t`{prefix} reset options` - Removes every item from the wheel.\n\t`{prefix} reset weights` - Sets every weight back to 1.\n\t`{prefix} reset tags` - Removes every tag."
        ),
        Verb::Help => format!(
            "Usage:\n\t`{prefix} help` - Lists all commands.\n\t`{prefix} help <command>` - Shows usage for a command."
        ),
    }
}

/// Reply for a required argument that was left out.
pub fn missing_argument(verb: Verb, prefix: &str) -> String {
    match verb {
        Verb::Add => "Please specify a new item to add.".to_string(),
        Verb::Remove => "Please specify an item to remove.".to_string(),
        other => usage(other, prefix),
    }
}

/// Reply for an unrecognized command.
pub fn unknown_command(suggestion: Option<Verb>) -> String {
    let mut names: Vec<String> = Verb::ALL.iter().map(|v| format!("`{v}`")).collect();
    let last = names.pop().unwrap_or_default();
    let mut out = format!("Unknown command. Please use {}, or {last}.", names.join(", "));
    if let Some(verb) = suggestion {
        out.push_str(&format!(" Did you mean `{verb}`?"));
    }
    out
}

/// Verbs whose names appear anywhere in a help topic, in listing order.
pub fn matching_topics(topic: &str) -> Vec<Verb> {
    let topic = topic.to_lowercase();
    Verb::ALL
        .into_iter()
        .filter(|v| topic.contains(v.name()))
        .collect()
}
