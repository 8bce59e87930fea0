use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::debug;
use vrv_core::{SessionLifecycle, DEFAULT_SCORE_METADATA};

const HELP_LINES: [&str; 10] = [
    "help - List commands",
    "start - Start a session for the configured game id",
    "score <n:i64> [complete] [metadata...] - Report a score",
    "end - End the active session",
    "retrieve - Retrieve session data (game id and token)",
    "game_id <id> - Change the game id while no session is active",
    "equip - Ask the host for the equipped item",
    "inventory <path> - Parse an inventory payload from a file",
    "status - Print session state",
    "quit - Leave the shell",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Help,
    Start,
    Score {
        score: i64,
        complete: bool,
        metadata: String,
    },
    End,
    Retrieve,
    GameId {
        game_id: String,
    },
    Equip,
    Inventory {
        path: PathBuf,
    },
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandParseError {
    reason: String,
    usage: &'static str,
}

impl CommandParseError {
    fn new(reason: impl Into<String>, usage: &'static str) -> Self {
        Self {
            reason: reason.into(),
            usage,
        }
    }
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. usage: {}", self.reason, self.usage)
    }
}

pub(crate) fn parse_command(line: &str) -> Result<ShellCommand, CommandParseError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let Some((name, args)) = tokens.split_first() else {
        return Err(CommandParseError::new("empty command", "help"));
    };

    match name.to_ascii_lowercase().as_str() {
        "help" => no_args(ShellCommand::Help, args, "help"),
        "start" => no_args(ShellCommand::Start, args, "start"),
        "end" => no_args(ShellCommand::End, args, "end"),
        "retrieve" => no_args(ShellCommand::Retrieve, args, "retrieve"),
        "equip" => no_args(ShellCommand::Equip, args, "equip"),
        "status" => no_args(ShellCommand::Status, args, "status"),
        "quit" | "exit" => no_args(ShellCommand::Quit, args, "quit"),
        "score" => parse_score(args),
        "game_id" => match args {
            [game_id] => Ok(ShellCommand::GameId {
                game_id: (*game_id).to_string(),
            }),
            _ => Err(CommandParseError::new(
                "expected exactly one game id",
                "game_id <id>",
            )),
        },
        "inventory" => {
            // The path is the rest of the line so it may contain spaces.
            let path = line.trim_start()[name.len()..].trim();
            if path.is_empty() {
                return Err(CommandParseError::new(
                    "missing file path",
                    "inventory <path>",
                ));
            }
            Ok(ShellCommand::Inventory {
                path: PathBuf::from(path),
            })
        }
        other => Err(CommandParseError::new(
            format!("unknown command '{other}'"),
            "help",
        )),
    }
}

fn no_args(
    command: ShellCommand,
    args: &[&str],
    usage: &'static str,
) -> Result<ShellCommand, CommandParseError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandParseError::new("takes no arguments", usage))
    }
}

fn parse_score(args: &[&str]) -> Result<ShellCommand, CommandParseError> {
    const USAGE: &str = "score <n:i64> [complete] [metadata...]";
    let Some((raw_score, rest)) = args.split_first() else {
        return Err(CommandParseError::new("missing score", USAGE));
    };
    let score = raw_score
        .parse::<i64>()
        .map_err(|_| CommandParseError::new(format!("invalid score '{raw_score}'"), USAGE))?;

    let (complete, metadata_tokens) = match rest.split_first() {
        Some((flag, tail)) if flag.eq_ignore_ascii_case("complete") => (true, tail),
        _ => (false, rest),
    };
    let metadata = if metadata_tokens.is_empty() {
        DEFAULT_SCORE_METADATA.to_string()
    } else {
        metadata_tokens.join(" ")
    };

    Ok(ShellCommand::Score {
        score,
        complete,
        metadata,
    })
}

pub(crate) fn apply_command(lifecycle: &mut SessionLifecycle, command: ShellCommand) {
    // Lifecycle failures are already logged and published as events.
    let result = match command {
        ShellCommand::Help => {
            for line in HELP_LINES {
                eprintln!("{line}");
            }
            Ok(())
        }
        ShellCommand::Start => lifecycle.start_session(),
        ShellCommand::Score {
            score,
            complete,
            metadata,
        } => lifecycle.report_score(score, &metadata, complete),
        ShellCommand::End => lifecycle.end_session(),
        ShellCommand::Retrieve => lifecycle.retrieve_session(),
        ShellCommand::GameId { game_id } => lifecycle.set_game_id(game_id),
        ShellCommand::Equip => lifecycle.request_equipped_item(),
        ShellCommand::Inventory { path } => {
            match fs::read_to_string(&path) {
                Ok(raw) => lifecycle.on_player_inventory(&raw),
                Err(err) => eprintln!("error: read inventory '{}': {err}", path.display()),
            }
            Ok(())
        }
        ShellCommand::Status => {
            eprintln!("{}", status_line(lifecycle));
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    };
    if let Err(err) = result {
        debug!(error = %err, kind = ?err.kind(), "shell_command_rejected");
    }
}

fn status_line(lifecycle: &SessionLifecycle) -> String {
    format!(
        "phase:{} session:{} game_id:{} token:{} boundary:{}",
        lifecycle.phase(),
        lifecycle.current_session_id().unwrap_or("-"),
        lifecycle.game_id(),
        if lifecycle.has_valid_token() {
            "present"
        } else {
            "absent"
        },
        lifecycle.boundary_name()
    )
}
