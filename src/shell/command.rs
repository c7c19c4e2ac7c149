// Shell command parsing.

use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  get <key>            print the value stored under key
  set <key> <value>    store value (JSON; anything else is stored as a string)
  ttl <key> <seconds>  expire key after seconds
  del <key>            remove key
  help                 show this help
  quit                 leave the shell";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get { key: String },
    Set { key: String, value: Value },
    Ttl { key: String, seconds: u64 },
    Remove { key: String },
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid ttl {0:?}: expected whole seconds")]
    InvalidTtl(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "get" => single_key(rest, "get").map(|key| Command::Get { key }),
            "del" | "remove" => single_key(rest, "del").map(|key| Command::Remove { key }),
            "set" => {
                let (key, raw) = rest.split_once(char::is_whitespace).ok_or(CommandError::Usage {
                    command: "set",
                    expected: "<key> <value>",
                })?;
                let raw = raw.trim();
                let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
                Ok(Command::Set {
                    key: key.to_string(),
                    value,
                })
            }
            "ttl" => {
                let mut args = rest.split_whitespace();
                let (Some(key), Some(seconds), None) = (args.next(), args.next(), args.next()) else {
                    return Err(CommandError::Usage {
                        command: "ttl",
                        expected: "<key> <seconds>",
                    });
                };
                let seconds = seconds
                    .parse()
                    .map_err(|_| CommandError::InvalidTtl(seconds.to_string()))?;
                Ok(Command::Ttl {
                    key: key.to_string(),
                    seconds,
                })
            }
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn single_key(rest: &str, command: &'static str) -> Result<String, CommandError> {
    let mut args = rest.split_whitespace();
    match (args.next(), args.next()) {
        (Some(key), None) => Ok(key.to_string()),
        _ => Err(CommandError::Usage {
            command,
            expected: "<key>",
        }),
    }
}
