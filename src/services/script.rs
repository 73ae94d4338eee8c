//! Line-oriented command language for driving a workspace from text, one
//! command per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! root home Home
//! connect home right inbox Inbox
//! nav left
//! goto 1 0 0
//! focus inbox
//! index 0
//! activate home
//! remove 1 0 0
//! back
//! forward
//! ```

use std::str::FromStr;

use tracing::{debug, warn};

use crate::core::errors::{Error, Result};
use crate::models::layer::{LayerDefinition, LayerId};
use crate::models::position::{Direction, NavDirection, Position};
use crate::services::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Root {
        id: LayerId,
        title: String,
    },
    Connect {
        from: LayerId,
        direction: Direction,
        id: LayerId,
        title: String,
    },
    Navigate(NavDirection),
    Goto(Position),
    Focus(LayerId),
    Index(usize),
    Activate(LayerId),
    Remove(Position),
    Back,
    Forward,
}

impl Command {
    /// Parses one script line. Blank lines and `#` comments yield `None`.
    pub fn parse(text: &str) -> Result<Option<Command>> {
        Self::parse_at(1, text)
    }

    /// Like [`Command::parse`], reporting failures against script line `line`.
    pub fn parse_at(line: usize, text: &str) -> Result<Option<Command>> {
        parse_words(text).map_err(|message| Error::Script { line, message })
    }

    /// Applies the command. Returns whether the active layer changed.
    pub fn apply<C: Default>(&self, workspace: &mut Workspace<C>) -> Result<bool> {
        let before = workspace.active().map(|node| node.id.clone());
        match self {
            Command::Root { id, title } => {
                let definition = LayerDefinition::new(title.clone(), C::default());
                workspace.add_root(definition.with_id(id.clone()))?;
            }
            Command::Connect {
                from,
                direction,
                id,
                title,
            } => {
                let definition = LayerDefinition::new(title.clone(), C::default());
                workspace.connect(from, *direction, definition.with_id(id.clone()))?;
            }
            Command::Navigate(direction) => {
                workspace.navigate(*direction);
            }
            Command::Goto(position) => {
                workspace.navigate_to_position(*position);
            }
            Command::Focus(id) => {
                workspace.navigate_to_id(id)?;
            }
            Command::Index(index) => {
                workspace.navigate_to_index(*index);
            }
            Command::Activate(id) => workspace.set_active(id)?,
            Command::Remove(position) => {
                workspace.remove_at(*position);
            }
            Command::Back => {
                workspace.back();
            }
            Command::Forward => {
                workspace.forward();
            }
        }
        let after = workspace.active().map(|node| &node.id);
        Ok(before.as_ref() != after)
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        Command::parse(line)?.ok_or_else(|| Error::Script {
            line: 1,
            message: "empty command".to_string(),
        })
    }
}

fn parse_words(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match keyword {
        "root" => {
            let (id, title) = id_and_title(&args)?;
            Command::Root { id, title }
        }
        "connect" => {
            let [from, direction, rest @ ..] = args.as_slice() else {
                return Err("usage: connect <from> <direction> <id> [title]".to_string());
            };
            let direction = direction.parse::<Direction>().map_err(|e| e.to_string())?;
            let (id, title) = id_and_title(rest)?;
            Command::Connect {
                from: LayerId::from(*from),
                direction,
                id,
                title,
            }
        }
        "nav" => {
            let [direction] = args.as_slice() else {
                return Err("usage: nav <direction>".to_string());
            };
            Command::Navigate(direction.parse::<NavDirection>().map_err(|e| e.to_string())?)
        }
        "goto" => Command::Goto(position(&args)?),
        "remove" => Command::Remove(position(&args)?),
        "focus" => Command::Focus(single_id(keyword, &args)?),
        "activate" => Command::Activate(single_id(keyword, &args)?),
        "index" => {
            let [index] = args.as_slice() else {
                return Err("usage: index <n>".to_string());
            };
            Command::Index(number(index)?)
        }
        "back" if args.is_empty() => Command::Back,
        "forward" if args.is_empty() => Command::Forward,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}

fn id_and_title(args: &[&str]) -> std::result::Result<(LayerId, String), String> {
    let [id, title @ ..] = args else {
        return Err("missing layer id".to_string());
    };
    let title = if title.is_empty() {
        id.to_string()
    } else {
        title.join(" ")
    };
    Ok((LayerId::from(*id), title))
}

fn single_id(keyword: &str, args: &[&str]) -> std::result::Result<LayerId, String> {
    match args {
        [id] => Ok(LayerId::from(*id)),
        _ => Err(format!("usage: {keyword} <id>")),
    }
}

fn position(args: &[&str]) -> std::result::Result<Position, String> {
    let [x, y, z] = args else {
        return Err("expected three coordinates: <x> <y> <z>".to_string());
    };
    Ok(Position::new(number(x)?, number(y)?, number(z)?))
}

fn number<T: FromStr>(raw: &str) -> std::result::Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("'{raw}' is not a valid number"))
}

/// Outcome of [`run_script`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub applied: usize,
    pub moved: usize,
    /// `(line, message)` for every command that was skipped.
    pub failed: Vec<(usize, String)>,
}

/// Runs every line of `script` against `workspace`. In strict mode the first
/// failing line aborts the run. Otherwise malformed lines and rejected
/// commands are logged and skipped; any other failure still aborts.
pub fn run_script<C: Default>(
    workspace: &mut Workspace<C>,
    script: &str,
    strict: bool,
) -> Result<ScriptReport> {
    let mut report = ScriptReport::default();
    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let command = match Command::parse_at(line, raw) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) if strict => return Err(err),
            Err(err) => {
                warn!(line, error = %err, "skipping malformed script line");
                report.failed.push((line, err.to_string()));
                continue;
            }
        };
        match command.apply(workspace) {
            Ok(moved) => {
                report.applied += 1;
                if moved {
                    report.moved += 1;
                }
                debug!(line, moved, "script command applied");
            }
            Err(err) if !strict && err.is_caller_error() => {
                warn!(line, error = %err, "skipping script command");
                report.failed.push((line, err.to_string()));
            }
            Err(err) => {
                return Err(Error::Script {
                    line,
                    message: err.to_string(),
                })
            }
        }
    }
    Ok(report)
}
