use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::render::percent_label;
use crate::config::Config;

const PRICING_KEYS: [&str; 3] = ["nightly_rate", "cleaning_fee", "service_fee_bps"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change shell preferences and pricing",
        "config [show|set <currency|locale|nightly_rate|cleaning_fee|service_fee_bps|listing_file> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            set_config_value(context, &key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}` (expected show or set)",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!("  currency        : {}", config.currency.as_str()));
    io::print_info(format!("  locale          : {}", config.locale.language_tag));
    io::print_info(format!("  nightly_rate    : {}", config.pricing.nightly_rate));
    io::print_info(format!("  cleaning_fee    : {}", config.pricing.cleaning_fee));
    io::print_info(format!(
        "  service_fee_bps : {} ({}%)",
        config.pricing.service_fee_bps,
        percent_label(config.pricing.service_fee_bps)
    ));
    let listing = config
        .listing_file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(built-in)".into());
    io::print_info(format!("  listing_file    : {}", listing));
    io::print_info(format!(
        "  stored at       : {}",
        context.config_manager.path().display()
    ));
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set_value(key, value)?;
    let listing = if key == "listing_file" {
        Some(updated.load_listing()?)
    } else {
        None
    };

    context.config = updated;
    context.persist_config()?;
    if let Some(listing) = listing {
        context.listing = listing;
    }
    tracing::info!(key, value, "configuration updated");
    io::print_success(format!("Set `{}` to `{}`.", key, value));
    if PRICING_KEYS.contains(&key) && context.wizard.is_open() {
        io::print_hint("Pricing changes apply to the next booking.");
    }
    Ok(())
}
