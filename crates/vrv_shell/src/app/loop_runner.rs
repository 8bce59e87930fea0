use std::io::{self, BufRead};
use std::process::ExitCode;

use tracing::{error, info};
use vrv_core::{dispatch_host_line, DispatchOutcome, SessionLifecycle};

use super::bootstrap::AppWiring;
use super::commands::{apply_command, parse_command, ShellCommand};

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        mut lifecycle,
    } = app;
    info!(host_mode = %config.host_mode, "session_shell_loop_started");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!(error = %err, "stdin_read_failed");
                shutdown(&mut lifecycle);
                return ExitCode::FAILURE;
            }
        };

        if let DispatchOutcome::Passthrough(command_line) =
            dispatch_host_line(&mut lifecycle, &line)
        {
            match parse_command(&command_line) {
                Ok(ShellCommand::Quit) => break,
                Ok(command) => apply_command(&mut lifecycle, command),
                Err(err) => eprintln!("error: {err}"),
            }
        }
    }

    shutdown(&mut lifecycle);
    ExitCode::SUCCESS
}

fn shutdown(lifecycle: &mut SessionLifecycle) {
    if lifecycle.is_session_active() {
        let _ = lifecycle.end_session();
    }
    info!("session_shell_stopped");
}
