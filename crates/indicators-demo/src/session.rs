//! Interactive session: one command per stdin line.

use std::str::FromStr;

use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use widget_indicators::{Document, FocusChange, Indicators};

use crate::{
    error::{Error, Result},
    terminal::{BLINK, TerminalHost, WIDGET},
};

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Document gains focus.
    Focus,
    /// Document loses focus.
    Blur,
    /// Watched widget gains focus.
    WidgetFocus,
    /// Watched widget loses focus.
    WidgetBlur,
    /// Raise an alert, optionally with blink text. `""` passes empty text.
    Trigger(Option<String>),
    /// Enable the indicators.
    Enable,
    /// Disable the indicators.
    Disable,
    /// Print controller state.
    Status,
    /// End the session.
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        Ok(match word {
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "widget-focus" => Self::WidgetFocus,
            "widget-blur" => Self::WidgetBlur,
            "trigger" => Self::Trigger(match rest {
                "" => None,
                "\"\"" => Some(String::new()),
                text => Some(text.to_string()),
            }),
            "enable" => Self::Enable,
            "disable" => Self::Disable,
            "status" => Self::Status,
            "quit" | "exit" => Self::Quit,
            _ => return Err(Error::UnknownCommand(line.to_string())),
        })
    }
}

/// Apply one command. Returns `false` when the session should end.
pub fn apply(indicators: &Indicators, host: &TerminalHost, command: Command) -> bool {
    match command {
        Command::Focus => host.set_focused(true),
        Command::Blur => host.set_focused(false),
        Command::WidgetFocus => {
            host.fire(WIDGET, FocusChange::Focus);
        }
        Command::WidgetBlur => {
            host.fire(WIDGET, FocusChange::Blur);
        }
        Command::Trigger(text) => {
            let report = indicators.trigger(text.as_deref());
            if let Some(signal) = report.signal() {
                warn!("{signal}");
            }
            println!(
                "title={:?} widget={:?} sound={:?}",
                report.title, report.widget, report.sound
            );
        }
        Command::Enable => indicators.enable(),
        Command::Disable => indicators.disable(),
        Command::Status => println!(
            "enabled={} focused={} widget_focused={} title_blink={} widget_blink={} audio={} {BLINK} class=\"{}\"",
            indicators.is_enabled(),
            host.has_focus(),
            indicators.is_widget_focused(),
            indicators.is_window_blinking(),
            indicators.is_widget_blinking(),
            indicators.has_audio(),
            host.classes_of(BLINK).join(" "),
        ),
        Command::Quit => return false,
    }
    true
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(indicators: &Indicators, host: &TerminalHost) -> Result<()> {
    info!("ready; commands: focus blur widget-focus widget-blur trigger [TEXT] enable disable status quit");
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if !apply(indicators, host, command) {
                    break;
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }
    indicators.disable();
    Ok(())
}
