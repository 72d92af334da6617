//! Interactive console prompts
//!
//! Provides:
//! - The `Console` trait the configurator talks to
//! - A terminal implementation backed by dialoguer
//!
//! Prompts render as `label [default]: ` and `label [y/N]`; an empty answer
//! takes the default.

use crate::error::Result;
use dialoguer::theme::SimpleTheme;
use dialoguer::{Confirm, Input};

/// Line-oriented user interaction
pub trait Console {
    /// Print a line
    fn say(&mut self, line: &str) -> Result<()>;

    /// Ask with a bracketed default, returned on empty input
    fn ask(&mut self, label: &str, default: &str) -> Result<String>;

    /// Ask without a default, empty input allowed
    fn ask_plain(&mut self, label: &str) -> Result<String>;

    /// `[y/N]` confirmation
    fn confirm(&mut self, label: &str) -> Result<bool>;
}

/// Console bound to the process terminal
pub struct Terminal {
    theme: SimpleTheme,
}

impl Terminal {
    pub fn new() -> Self {
        Self { theme: SimpleTheme }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Terminal {
    fn say(&mut self, line: &str) -> Result<()> {
        println!("{}", line);
        Ok(())
    }

    fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            return self.ask_plain(label);
        }
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(label)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn ask_plain(&mut self, label: &str) -> Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn confirm(&mut self, label: &str) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(label)
            .default(false)
            .wait_for_newline(true)
            .interact()?;
        Ok(answer)
    }
}
