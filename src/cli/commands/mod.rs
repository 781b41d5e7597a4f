pub mod booking;
pub mod config;
pub mod listing;
pub mod system;

use crate::cli::registry::CommandRegistry;

/// Registers every shell command in help order.
pub fn register_all(registry: &mut CommandRegistry) {
    for entry in booking::definitions()
        .into_iter()
        .chain(listing::definitions())
        .chain(config::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
