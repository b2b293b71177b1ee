use crate::coordinate::Suggestion;
use crate::error::{Error, Unresolved};

/// ANSI bold, for headings.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Print markdown to stderr with headings in bold.
fn print_markdown(md: &str) {
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    print_markdown(&render_error(e));
}

/// Render a degraded resolution and print to stderr.
pub fn print_unresolved(reason: &Unresolved, consumed: usize, candidates: &[Suggestion]) {
    print_markdown(&render_unresolved(reason, consumed, candidates));
}

/// Render an error as a markdown block: what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::ConfigNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.

## Fix

Pass the platform configuration export with `--platform`, and recorded
payloads with `--responses`.
", path.display()),

        Error::Fetch { reason, url } => format!("\
# Error: Fetch Failed

`{url}`: {reason}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::Json(e) => format!("\
# Error: Invalid JSON

{e}
"),

        Error::InvalidMarkers { reason } => format!("\
# Error: Invalid Markers

{reason}

## Fix

Every marker in the `[markers]` table of `.hyperref.toml` needs at least
one character:

    [markers]
    symbol = \"&\"
    start = \"(\"
    end = \")\"
    separator = \".\"
"),

        Error::Superseded(e) => format!("\
# Error: Superseded

{e}
"),

        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}
"),
    }
}

/// Candidate whose text equals `name` ignoring case.
pub(crate) fn find_closest_suggestion<'a>(name: &str, candidates: &'a [Suggestion]) -> Option<&'a Suggestion> {
    let lowered = name.to_lowercase();
    candidates.iter().find(|c| c.text.to_lowercase() == lowered)
}

/// The name a degraded stage failed to find, if it looked one up.
fn looked_up(reason: &Unresolved) -> Option<&str> {
    match reason {
        Unresolved::UnknownElement { name }
        | Unresolved::UnknownOrganization { name }
        | Unresolved::UnknownRecord { name, .. }
        | Unresolved::UnknownSection { name, .. }
        | Unresolved::UnknownWidget { name, .. } => Some(name),
        Unresolved::ForwardTooDeep { .. } => None,
    }
}

/// Render why a resolution stopped short. `candidates` are the names the
/// stopping stage would have accepted.
pub fn render_unresolved(reason: &Unresolved, consumed: usize, candidates: &[Suggestion]) -> String {
    let best = looked_up(reason).and_then(|name| find_closest_suggestion(name, candidates));
    let hint = best.map_or_else(
        || render_available(candidates),
        |best| format!("\n## Did you mean `{}`?\n\nNames match case-sensitively.\n", best.text),
    );
    format!("\
# Unresolved: {reason}

Resolution stopped after {consumed} token(s).
{hint}")
}

/// Bullet list of candidate names, or nothing when there are none.
fn render_available(candidates: &[Suggestion]) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let listed: String = candidates.iter().map(|c| format!("- `{}`\n", c.text)).collect();
    format!("\n## Available\n\n{listed}")
}
