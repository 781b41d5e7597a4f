use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::render;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "listing",
            "Show the property, amenities and booking card",
            "listing",
            cmd_listing,
        ),
        CommandEntry::new("reviews", "Show guest reviews", "reviews", cmd_reviews),
        CommandEntry::new("host", "Show the host profile", "host", cmd_host),
    ]
}

fn cmd_listing(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section(&context.listing.name);
    output::lines(render::listing_lines(&context.listing).into_iter().skip(1));
    output_section("Booking");
    output::lines(render::booking_card_lines(
        &context.config,
        &context.formatter(),
    ));
    Ok(())
}

fn cmd_reviews(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Reviews");
    output::lines(render::review_lines(&context.listing));
    Ok(())
}

fn cmd_host(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Host");
    output::lines(render::host_lines(&context.listing));
    Ok(())
}
