use pictograph::PictographData;
use std::path::PathBuf;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};

/// Everything the host reacts to, whether it comes from the UI, the command
/// socket or the config watcher.
#[derive(Debug, Clone)]
pub enum AppEvent {
    AddBeat(Box<PictographData>),
    SelectBeat(u32),
    DeleteSelectedBeat,
    UpdatePictograph(Box<PictographData>),
    SwapColors,
    Revert,
    ToggleFavorite(PathBuf),
    LoadCurrentSequence,
    SaveCurrentSequence,
    ConfigReload,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
enum LineCommand {
    Add,
    Select,
    Delete,
    Update,
    #[strum(serialize = "swap_colors", serialize = "swap")]
    SwapColors,
    Revert,
    #[strum(serialize = "toggle_favorite", serialize = "favorite")]
    ToggleFavorite,
    Load,
    Save,
    Reload,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseEventError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("{0} needs an argument")]
    MissingArgument(String),
    #[error("Bad argument for {command}: {reason}")]
    BadArgument { command: String, reason: String },
}

impl FromStr for AppEvent {
    type Err = ParseEventError;

    /// One command per line: a command word, then an optional argument
    /// (a beat number, a path, or pictograph JSON).
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let command = LineCommand::from_str(word)
            .map_err(|_| ParseEventError::UnknownCommand(word.to_string()))?;

        let argument = || {
            if rest.is_empty() {
                Err(ParseEventError::MissingArgument(command.to_string()))
            } else {
                Ok(rest)
            }
        };
        let bad = |reason: String| ParseEventError::BadArgument {
            command: command.to_string(),
            reason,
        };
        let pictograph = |raw: &str| {
            serde_json::from_str::<PictographData>(raw)
                .map(Box::new)
                .map_err(|e| bad(e.to_string()))
        };

        Ok(match command {
            LineCommand::Add => AppEvent::AddBeat(pictograph(argument()?)?),
            LineCommand::Select => {
                AppEvent::SelectBeat(argument()?.parse().map_err(|e| bad(format!("{e}")))?)
            }
            LineCommand::Delete => AppEvent::DeleteSelectedBeat,
            LineCommand::Update => AppEvent::UpdatePictograph(pictograph(argument()?)?),
            LineCommand::SwapColors => AppEvent::SwapColors,
            LineCommand::Revert => AppEvent::Revert,
            LineCommand::ToggleFavorite => AppEvent::ToggleFavorite(PathBuf::from(argument()?)),
            LineCommand::Load => AppEvent::LoadCurrentSequence,
            LineCommand::Save => AppEvent::SaveCurrentSequence,
            LineCommand::Reload => AppEvent::ConfigReload,
            LineCommand::Quit => AppEvent::Quit,
        })
    }
}
