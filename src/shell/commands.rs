//! Line commands read from stdin

use super::ShellEvent;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Parse one command line.
///
/// `None` for blank lines. Accepts `q`/`quit` and `move X Y`.
pub fn parse_command(line: &str) -> Option<Result<ShellEvent, String>> {
    let mut words = line.split_whitespace();
    let command = words.next()?;
    let event = match command {
        "q" | "quit" => Ok(ShellEvent::Quit),
        "move" => {
            let args: Vec<&str> = words.by_ref().collect();
            match args.as_slice() {
                [x, y] => match (x.parse::<i32>(), y.parse::<i32>()) {
                    (Ok(x), Ok(y)) => Ok(ShellEvent::Moved { x, y }),
                    _ => Err(format!("Invalid coordinates: {} {}", x, y)),
                },
                _ => Err("Expected format: move X Y".to_string()),
            }
        }
        other => Err(format!("Unknown command: {}", other)),
    };
    Some(event)
}

/// Forward stdin commands as shell events until stdin closes.
///
/// Closing stdin does not quit the overlay.
pub fn spawn_stdin_commands(events: mpsc::UnboundedSender<ShellEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line) {
                    Some(Ok(event)) => {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Some(Err(message)) => log::warn!("{}", message),
                    None => {}
                },
                Ok(None) => {
                    log::debug!("stdin closed, no more commands");
                    break;
                }
                Err(e) => {
                    log::warn!("Failed to read command: {}", e);
                    break;
                }
            }
        }
    });
}
