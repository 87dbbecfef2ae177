//! Line-oriented console frontend.
//!
//! A verification frontend, not the production rendering layer: commands come
//! in on stdin (`deposit <email>`, `pin <digits>`, `reset`, `quit`) and the
//! projection goes out through tracing. The real kiosk display consumes the
//! same [`ScreenView`] contract.

use cubby_app::{Driver, KioskInput, Screen, ScreenView};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Parse one input line into a kiosk intent.
///
/// Returns `Err` with a usage hint for lines that are not a command.
fn parse_command(line: &str) -> Result<KioskInput, String> {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    match (command, rest.trim()) {
        ("deposit", email) if !email.is_empty() => {
            Ok(KioskInput::BeginDeposit { email: email.to_string() })
        },
        ("pin", pin) if !pin.is_empty() => Ok(KioskInput::SubmitPin { pin: pin.to_string() }),
        ("reset", "") => Ok(KioskInput::Reset),
        ("quit" | "exit", "") => Ok(KioskInput::Quit),
        ("", "") => Err("commands: deposit <email> | pin <digits> | reset | quit".to_string()),
        _ => Err(format!("unknown command {line:?}; try: deposit <email> | pin <digits> | reset | quit")),
    }
}

/// Driver reading commands from stdin and rendering through tracing.
pub struct ConsoleDriver {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleDriver {
    /// Create a driver over this process's stdin.
    pub fn new() -> Self {
        Self { lines: BufReader::new(tokio::io::stdin()).lines() }
    }
}

impl Default for ConsoleDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for ConsoleDriver {
    type Error = std::io::Error;

    async fn poll_input(&mut self) -> Result<Option<KioskInput>, Self::Error> {
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };

            match parse_command(&line) {
                Ok(input) => return Ok(Some(input)),
                Err(hint) => tracing::warn!("{hint}"),
            }
        }
    }

    fn render(&mut self, view: &ScreenView) -> Result<(), Self::Error> {
        match view.screen {
            Screen::Idle => {
                tracing::info!("[AVAILABLE] locker free; use: deposit <email>");
            },
            Screen::Open => {
                let flow = if view.is_retrieve_mode { "retrieval" } else { "deposit" };
                tracing::info!(
                    countdown = view.countdown_seconds,
                    object_present = view.object_present,
                    context = %view.context_message,
                    "[OPEN] door open for {flow} ({})",
                    view.email
                );
            },
            Screen::Occupied => {
                tracing::info!("[OCCUPIED] item stored; use: pin <6 digits>");
            },
            Screen::Retrieved => {
                tracing::info!(
                    countdown = view.countdown_seconds,
                    "[RETRIEVED] item taken; returning to idle"
                );
            },
        }

        if let Some(error) = &view.pending_error {
            tracing::warn!("{error}");
        }

        Ok(())
    }
}
