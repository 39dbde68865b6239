//! Terminal input/output
//!
//! [`Console`] reads answers line by line and writes menus; it is generic
//! over its streams so scripted sessions can drive it.

use std::io::{self, BufRead, Write};

use crms_client::{Notification, Notifier};

/// Line-oriented prompt over a reader and a writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Write one line
    pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    /// Prompt and read a trimmed line; `None` once input is exhausted
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt with a default used for blank answers
    pub fn ask_with_default(&mut self, prompt: &str, default: &str) -> io::Result<Option<String>> {
        let answer = self.ask(&format!("{prompt} [{default}]: "))?;
        Ok(answer.map(|a| if a.is_empty() { default.to_string() } else { a }))
    }

    /// Yes/no question, "no" unless answered with y/yes
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{prompt} [y/N]: "))?;
        Ok(answer.is_some_and(|a| matches!(a.to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}

/// Prints notifications as toast lines on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, "notification");
        let marker = if notification.is_error() { "✗" } else { "✓" };
        println!("\n  {marker} {notification}\n");
    }
}
