//! Core CLI dispatch and shell context helpers.

use strsim::levenshtein;

use crate::{
    booking::{
        BookingCalendar, BookingWizard, FieldError, LocalReservations, SessionError,
        SubmissionError,
    },
    config::{Config, ConfigManager},
    errors::BookingError,
    listing::Listing,
};

pub use crate::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::notifier::ConsoleNotifier;
use super::output::{self, OutputPreferences};
use super::registry::CommandRegistry;
use super::render::Formatter;
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Pins the booking calendar to a `YYYY-MM-DD` date instead of the local clock.
pub const TODAY_ENV: &str = "VILLA_BOOKING_TODAY";

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script,
        });

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let listing = match config.load_listing() {
            Ok(listing) => listing,
            Err(err) => {
                tracing::warn!(error = %err, "listing file could not be loaded");
                cli_io::print_warning(format!(
                    "Listing file could not be loaded ({}); using the built-in listing.",
                    err
                ));
                Listing::default()
            }
        };
        let calendar = calendar_from_env();
        let wizard = new_wizard(&config, calendar);

        Ok(ShellContext {
            mode,
            registry,
            wizard,
            calendar,
            config_manager,
            config,
            listing,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        if self.wizard.is_open() {
            let step = self.wizard.state().step;
            format!("villa [step {}/4]> ", step.number())
        } else {
            "villa> ".to_string()
        }
    }

    pub(crate) fn formatter(&self) -> Formatter<'_> {
        Formatter::from_config(&self.config)
    }

    /// Starts a booking, replacing a finished wizard with one priced by the
    /// current configuration.
    pub(crate) fn start_booking(&mut self) -> bool {
        if self.wizard.is_open() {
            return false;
        }
        self.wizard = new_wizard(&self.config, self.calendar);
        self.wizard.open();
        true
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Yes/no question; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Session(SessionError::StepGate(gate)) => {
                cli_io::print_error(format!(
                    "Step {} is incomplete. Fix the following before continuing:",
                    gate.step
                ));
                print_violations(gate.violations.iter());
                Ok(())
            }
            CommandError::Session(SessionError::Submission(SubmissionError::Invalid(errors))) => {
                cli_io::print_error("The booking could not be submitted:");
                print_violations(errors.iter());
                cli_io::print_hint("Use `back` to correct the highlighted fields.");
                Ok(())
            }
            CommandError::Session(SessionError::Submission(SubmissionError::Reservation(_))) => {
                cli_io::print_hint("Your booking is still open. Use `submit` to try again.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }
}

fn new_wizard(config: &Config, calendar: BookingCalendar) -> BookingWizard {
    BookingWizard::new(
        config.pricing,
        Box::new(ConsoleNotifier),
        Box::new(LocalReservations::new()),
    )
    .with_calendar(calendar)
}

fn calendar_from_env() -> BookingCalendar {
    let Ok(raw) = std::env::var(TODAY_ENV) else {
        return BookingCalendar::System;
    };
    match chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => BookingCalendar::Fixed(date),
        Err(err) => {
            tracing::warn!(value = %raw, error = %err, "ignoring invalid {}", TODAY_ENV);
            BookingCalendar::System
        }
    }
}

fn print_violations<'a>(violations: impl Iterator<Item = &'a FieldError>) {
    output::lines(violations.map(|violation| {
        format!("  - {}: {}", violation.field.label(), violation.message)
    }));
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Core(#[from] BookingError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    lines: &[&str],
    config_manager: ConfigManager,
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_config_manager(CliMode::Script, config_manager)?;
    app.calendar = BookingCalendar::Fixed(
        chrono::NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid pinned date"),
    );
    app.wizard = new_wizard(&app.config, app.calendar);
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}
