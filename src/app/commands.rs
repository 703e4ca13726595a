// ApiLog - app/commands.rs
//
// Parsing of lines typed at the interactive prompt.
// Validation happens here so the store only ever sees well-typed values.

use crate::core::export::ExportFormat;
use crate::core::filter::FilterPredicates;
use crate::util::error::CommandError;
use std::path::PathBuf;

const VIEW_USAGE: &str = "view <line_number>";
const EDIT_USAGE: &str = "edit <line_number>";
const FILTER_USAGE: &str = "filter <level|method|status|thread|service|search> <value>";
const EXPORT_USAGE: &str = "export <output_path> [raw|csv|json]";
const LIST_USAGE: &str = "list [limit]";
const SAVE_USAGE: &str = "save [output_path]";

/// One prompt command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Summary,
    /// `None` uses the configured default limit.
    List { limit: Option<usize> },
    View { line_number: u64 },
    /// A single predicate, layered over the active ones by the shell.
    Filter(FilterPredicates),
    Clear,
    /// The replacement text is prompted for separately.
    Edit { line_number: u64 },
    /// `None` saves back to the source file.
    Save { path: Option<PathBuf> },
    Export { path: PathBuf, format: ExportFormat },
    Reload,
    Quit,
}

/// Parse one prompt line. Blank input yields `Ok(None)`.
///
/// The command word is case-insensitive; arguments are kept as typed.
pub fn parse_command(input: &str) -> Result<Option<Command>, CommandError> {
    let input = input.trim();
    let Some((word, rest)) = split_word(input) else {
        return Ok(None);
    };

    let command = match word.to_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "summary" | "stats" => Command::Summary,
        "clear" => Command::Clear,
        "reload" => Command::Reload,
        "quit" | "exit" | "q" => Command::Quit,
        "list" => Command::List {
            limit: match single_arg(rest, LIST_USAGE)? {
                Some(value) => Some(parse_number(value, "limit")?),
                None => None,
            },
        },
        "view" => Command::View {
            line_number: required_line_number(rest, VIEW_USAGE)?,
        },
        "edit" => Command::Edit {
            line_number: required_line_number(rest, EDIT_USAGE)?,
        },
        "filter" => Command::Filter(parse_filter(rest)?),
        "save" => Command::Save {
            path: single_arg(rest, SAVE_USAGE)?.map(PathBuf::from),
        },
        "export" => parse_export(rest)?,
        other => {
            return Err(CommandError::Unknown {
                command: other.to_string(),
            })
        }
    };

    Ok(Some(command))
}

/// Split off the first whitespace-delimited word. `None` for blank input.
fn split_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(idx) => Some((&input[..idx], input[idx..].trim())),
        None => Some((input, "")),
    }
}

/// At most one argument.
fn single_arg<'a>(rest: &'a str, usage: &'static str) -> Result<Option<&'a str>, CommandError> {
    let mut parts = rest.split_whitespace();
    let first = parts.next();
    if parts.next().is_some() {
        return Err(CommandError::Usage { usage });
    }
    Ok(first)
}

fn required_line_number(rest: &str, usage: &'static str) -> Result<u64, CommandError> {
    match single_arg(rest, usage)? {
        Some(value) => parse_number(value, "line number"),
        None => Err(CommandError::Usage { usage }),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// `filter <kind> <value...>`; the value may contain spaces.
fn parse_filter(rest: &str) -> Result<FilterPredicates, CommandError> {
    let Some((kind, value)) = split_word(rest) else {
        return Err(CommandError::Usage {
            usage: FILTER_USAGE,
        });
    };
    if value.is_empty() {
        return Err(CommandError::Usage {
            usage: FILTER_USAGE,
        });
    }

    let mut predicates = FilterPredicates::default();
    match kind.to_lowercase().as_str() {
        "level" => predicates.level = Some(value.to_string()),
        "method" => predicates.method = Some(value.to_string()),
        "status" | "status_code" => predicates.status_code = Some(parse_number(value, "status")?),
        "thread" => predicates.thread = Some(value.to_string()),
        "service" => predicates.service = Some(value.to_string()),
        "search" => predicates.search = Some(value.to_string()),
        other => {
            return Err(CommandError::UnknownFilter {
                kind: other.to_string(),
            })
        }
    }
    Ok(predicates)
}

fn parse_export(rest: &str) -> Result<Command, CommandError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let (path, format) = match parts.as_slice() {
        [path] => (*path, ExportFormat::default()),
        [path, format] => {
            let format = ExportFormat::from_name(format).ok_or_else(|| {
                CommandError::UnknownFormat {
                    format: format.to_string(),
                }
            })?;
            (*path, format)
        }
        _ => {
            return Err(CommandError::Usage {
                usage: EXPORT_USAGE,
            })
        }
    };
    Ok(Command::Export {
        path: PathBuf::from(path),
        format,
    })
}
