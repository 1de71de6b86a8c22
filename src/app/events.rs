//! Output events and the sinks that display them

use crossterm::style::Stylize;
use std::io::Write;
use tokio::sync::mpsc;

/// Everything the assistant shows the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Neutral status line
    Info(String),
    /// Canned reply that did not involve the model
    Reply(String),
    /// Raw model answer
    Ai(String),
    /// Commands extracted from the model answer
    Commands(Vec<String>),
    /// A command about to be executed
    Running(String),
    /// Captured standard output
    Stdout(String),
    /// Captured standard error
    Stderr(String),
    Success(String),
    Failure(String),
    Error(String),
    /// Input prompt of the interactive shell
    Prompt(String),
}

/// Destination for output events.
///
/// Implementations must be callable from whichever task handles the
/// instruction; the console itself is only touched by the printer.
pub trait OutputSink: Send + Sync {
    fn emit(&self, event: OutputEvent);
}

/// Writes events straight to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, event: OutputEvent) {
        print_event(&event);
    }
}

/// Forwards events to a printer task
impl OutputSink for mpsc::UnboundedSender<OutputEvent> {
    fn emit(&self, event: OutputEvent) {
        // The printer only goes away on shutdown.
        let _ = self.send(event);
    }
}

/// Drain `rx` onto the terminal until every sender is dropped
pub async fn run_printer(mut rx: mpsc::UnboundedReceiver<OutputEvent>) {
    while let Some(event) = rx.recv().await {
        print_event(&event);
    }
}

pub fn print_event(event: &OutputEvent) {
    match event {
        OutputEvent::Info(text) => println!("{}", text.as_str().yellow()),
        OutputEvent::Reply(text) => println!("{} {}", "whizterm:".green().bold(), text),
        OutputEvent::Ai(text) => println!("{} {}", "AI:".green().bold(), text),
        OutputEvent::Commands(commands) => {
            println!("\n{}", "Extracted commands:".yellow().bold());
            for command in commands {
                println!("  {}", command.as_str().cyan());
            }
        }
        OutputEvent::Running(command) => {
            println!("{} {}", "Running:".blue().bold(), command)
        }
        OutputEvent::Stdout(text) => print!("{}", with_newline(text)),
        OutputEvent::Stderr(text) => {
            eprint!("{} {}", "Error:".red().bold(), with_newline(text))
        }
        OutputEvent::Success(text) => println!("{}", text.as_str().green()),
        OutputEvent::Failure(text) => println!("{}", text.as_str().red()),
        OutputEvent::Error(text) => eprintln!("{}", text.as_str().red().bold()),
        OutputEvent::Prompt(cwd) => {
            print!("{} {} ", cwd.as_str().dark_grey(), ">".magenta().bold());
            let _ = std::io::stdout().flush();
        }
    }
}

fn with_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every event for inspection
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        events: Mutex<Vec<OutputEvent>>,
    }

    impl RecordingSink {
        pub(crate) fn events(&self) -> Vec<OutputEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl OutputSink for RecordingSink {
        fn emit(&self, event: OutputEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn test_channel_sink_preserves_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.emit(OutputEvent::Running("ls".to_string()));
        tx.emit(OutputEvent::Stdout("a\nb\n".to_string()));
        drop(tx);

        assert_eq!(rx.recv().await, Some(OutputEvent::Running("ls".to_string())));
        assert_eq!(rx.recv().await, Some(OutputEvent::Stdout("a\nb\n".to_string())));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_with_newline() {
        assert_eq!(with_newline("x"), "x\n");
        assert_eq!(with_newline("x\n"), "x\n");
    }
}
