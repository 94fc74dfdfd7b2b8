use std::future::Future;
use std::time::Duration;

use crossterm::tty::IsTty;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

use super::TERMINAL_STDERR;

#[derive(Debug, Clone)]
pub struct Confirm {
    pub default: Option<bool>,
}

/// Free form single line input.
#[derive(Debug, Clone, Default)]
pub struct Text {
    pub placeholder: Option<String>,
}

pub struct Spinner<F>(F);
impl<F: Future> Spinner<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[derive(Debug, Clone)]
pub struct Dialog<'a, Type> {
    pub message: &'a str,
    pub help_message: Option<&'a str>,
    pub typed: Type,
}

impl Dialog<'_, Confirm> {
    pub async fn prompt(self) -> inquire::error::InquireResult<bool> {
        let message = self.message.to_owned();
        let help_message: Option<String> = self.help_message.map(ToOwned::to_owned);
        let default = self.typed.default;

        tokio::task::spawn_blocking(move || {
            let _stderr_lock = TERMINAL_STDERR.lock();

            let mut dialog = inquire::Confirm::new(&message).with_render_config(storefront_theme());

            if let Some(default) = default {
                dialog = dialog.with_default(default);
            }

            if let Some(ref help_message) = help_message {
                dialog = dialog.with_help_message(help_message);
            }

            dialog.prompt()
        })
        .await
        .map_err(|e| inquire::InquireError::Custom(Box::new(e)))?
    }
}

impl Dialog<'_, Text> {
    pub async fn prompt(self) -> inquire::error::InquireResult<String> {
        let message = self.message.to_owned();
        let help_message: Option<String> = self.help_message.map(ToOwned::to_owned);
        let placeholder = self.typed.placeholder;

        tokio::task::spawn_blocking(move || {
            let _stderr_lock = TERMINAL_STDERR.lock();

            let mut dialog = inquire::Text::new(&message).with_render_config(storefront_theme());

            if let Some(ref placeholder) = placeholder {
                dialog = dialog.with_placeholder(placeholder);
            }

            if let Some(ref help_message) = help_message {
                dialog = dialog.with_help_message(help_message);
            }

            dialog.prompt()
        })
        .await
        .map_err(|e| inquire::InquireError::Custom(Box::new(e)))?
    }
}

impl<F: Future> Dialog<'_, Spinner<F>> {
    /// Await the future, showing a spinner if it takes longer than `start_spinning_after`.
    pub async fn spin_with_delay(self, start_spinning_after: Duration) -> F::Output {
        let future = self.typed.0;
        tokio::pin!(future);

        if let Ok(output) = tokio::time::timeout(start_spinning_after, &mut future).await {
            return output;
        }

        let spinner = if std::io::stderr().is_tty() {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {wide_msg} {prefix:>}") {
                spinner.set_style(style);
            }
            spinner.set_message(self.message.to_string());
            if let Some(help_message) = self.help_message {
                spinner.set_prefix(help_message.to_string())
            }
            spinner.enable_steady_tick(Duration::from_millis(100));
            Some(spinner)
        } else {
            None
        };

        let output = future.await;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        output
    }
}

impl Dialog<'_, ()> {
    /// True if stderr, stdin and stdout are ttys
    pub fn can_prompt() -> bool {
        if std::env::var("_STOREFRONT_NO_PROMPT").is_ok_and(|v| v == "1") {
            return false;
        }
        std::io::stderr().is_tty() && std::io::stdin().is_tty() && std::io::stdout().is_tty()
    }
}

pub fn storefront_theme() -> RenderConfig<'static> {
    let mut render_config = RenderConfig::default_colored();

    let accent = Color::DarkYellow;
    render_config.answered_prompt_prefix = Styled::new(">").with_fg(accent);
    render_config.highlighted_option_prefix = Styled::new(">").with_fg(accent);
    render_config.prompt_prefix = Styled::new("♪").with_fg(accent);
    render_config.prompt = StyleSheet::new().with_attr(Attributes::BOLD);
    render_config.help_message = Styled::new("").with_fg(Color::DarkCyan).style;
    render_config.answer = Styled::new("").with_fg(accent).style;

    render_config
}
