use thiserror::Error;

use crate::{
    domain::{ItemId, Settings},
    pipeline::Command,
};

use super::types::HostInput;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command: /{0}")]
    UnknownCommand(String),
    #[error("/{command} needs an argument")]
    MissingArgument { command: &'static str },
    #[error("invalid settings json: {0}")]
    InvalidSettings(String),
    #[error("invalid item id: {0}")]
    InvalidItemId(String),
}

/// Plain lines are comments; lines starting with `/` are commands.
pub fn parse_line(line: &str) -> Result<Option<HostInput>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(HostInput::Comment(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "ping" => Command::Ping,
        "rescan" => Command::Rescan,
        "status" => Command::Status,
        "settings" => {
            if arg.is_empty() {
                return Err(InputError::MissingArgument { command: "settings" });
            }
            let settings: Settings = serde_json::from_str(arg)
                .map_err(|err| InputError::InvalidSettings(err.to_string()))?;
            Command::SettingsUpdated(settings)
        }
        "navigate" => {
            if arg.is_empty() {
                return Err(InputError::MissingArgument { command: "navigate" });
            }
            Command::Navigate(arg.to_string())
        }
        "toggle" => {
            let id = arg
                .parse::<u64>()
                .map_err(|_| InputError::InvalidItemId(arg.to_string()))?;
            Command::Toggle(ItemId(id))
        }
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(HostInput::Command(command)))
}
