use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Runtime control-file commands
// ---------------------------------------------------------------------------

/// Operator command dropped into the control file while the sim runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Re-read the trajectory source and swap in the new samples.
    Reload,
    /// Restart the trajectory clock and clear controller state.
    Reset,
}

impl FromStr for ControlCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RELOAD" => Ok(ControlCommand::Reload),
            "RESET" => Ok(ControlCommand::Reset),
            other => Err(format!("unknown control command {other:?}")),
        }
    }
}

/// Read a pending command and clear the file.
///
/// A missing or blank file means no command. Unknown text is logged and
/// cleared so it does not repeat every tick.
pub fn poll_command_file(path: &Path) -> io::Result<Option<ControlCommand>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    if text.trim().is_empty() {
        return Ok(None);
    }

    fs::write(path, "")?;
    match text.parse::<ControlCommand>() {
        Ok(cmd) => {
            log::info!("control file command: {cmd:?}");
            Ok(Some(cmd))
        }
        Err(msg) => {
            log::warn!("{msg}");
            Ok(None)
        }
    }
}
