use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use analyzer_core::{update, AppState, Msg};
use analyzer_logging::{analyzer_debug, analyzer_info};
use anyhow::Context;

use super::config::{self, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging;
use super::ui;
use super::ui::commands::Command;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Input(Command),
    /// Blank line or a line that did not parse; `None` for blank.
    Rejected(Option<String>),
    Engine(Msg),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = config::load(Path::new(CONFIG_FILENAME))?;
    logging::initialize(config.log);
    analyzer_info!("Starting analyzer against {}", config.service_url);

    let (tx, rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.engine_config(), tx.clone())
        .context("failed to start the engine")?;

    thread::spawn(move || read_commands(io::stdin().lock(), tx));

    let mut state = AppState::new();
    let mut pending = 0usize;
    let mut input_closed = false;

    print_lines(&ui::render::render(&state.view(), &timestamp()));
    println!("type help for commands");
    prompt();

    while let Ok(event) = rx.recv() {
        let msg = match event {
            AppEvent::Input(Command::Dispatch(msg)) => msg,
            AppEvent::Input(Command::CsvLink) => {
                println!("CSV export: {}", runner.csv_link());
                prompt();
                continue;
            }
            AppEvent::Input(Command::Help) => {
                println!("{}", ui::commands::HELP);
                prompt();
                continue;
            }
            AppEvent::Input(Command::Quit) => break,
            AppEvent::Rejected(message) => {
                if let Some(message) = message {
                    println!("{message}");
                }
                prompt();
                continue;
            }
            AppEvent::Engine(msg) => {
                pending = pending.saturating_sub(1);
                msg
            }
            AppEvent::InputClosed => {
                input_closed = true;
                if pending == 0 {
                    break;
                }
                continue;
            }
        };

        analyzer_debug!("Dispatch {:?}", msg);
        let (next, effects) = update(std::mem::take(&mut state), msg);
        state = next;
        pending += runner.enqueue(effects);

        if state.consume_dirty() {
            print_lines(&ui::render::render(&state.view(), &timestamp()));
        }
        if input_closed && pending == 0 {
            break;
        }
        if !input_closed {
            prompt();
        }
    }

    analyzer_info!("Analyzer exiting");
    Ok(())
}

/// Forwards parsed lines to the main loop, which owns all terminal output.
fn read_commands(input: impl BufRead, tx: mpsc::Sender<AppEvent>) {
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        let event = match ui::commands::parse_command(&line) {
            Ok(Some(command)) => AppEvent::Input(command),
            Ok(None) => AppEvent::Rejected(None),
            Err(message) => AppEvent::Rejected(Some(message)),
        };
        if tx.send(event).is_err() {
            return;
        }
    }
    let _ = tx.send(AppEvent::InputClosed);
}

fn timestamp() -> String {
    chrono::Local::now()
        .format(ui::constants::TIMESTAMP_FORMAT)
        .to_string()
}

fn print_lines(lines: &[String]) {
    let mut out = io::stdout().lock();
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
}

fn prompt() {
    let mut out = io::stdout().lock();
    let _ = write!(out, "{}", ui::constants::PROMPT);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reader_hands_every_line_to_the_main_loop() {
        let (tx, rx) = mpsc::channel();
        read_commands(Cursor::new("refresh\n\nfrobnicate\n"), tx);

        let events: Vec<AppEvent> = rx.iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            AppEvent::Input(Command::Dispatch(Msg::RefreshClicked))
        ));
        assert!(matches!(events[1], AppEvent::Rejected(None)));
        assert!(
            matches!(&events[2], AppEvent::Rejected(Some(message)) if message.contains("frobnicate"))
        );
        assert!(matches!(events[3], AppEvent::InputClosed));
    }
}
