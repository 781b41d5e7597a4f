use crate::{
    booking::{BookingCalendar, BookingWizard},
    config::{Config, ConfigManager},
    listing::Listing,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub wizard: BookingWizard,
    pub calendar: BookingCalendar,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub listing: Listing,
    pub last_command: Option<String>,
    pub running: bool,
}
