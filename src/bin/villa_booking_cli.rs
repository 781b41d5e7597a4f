use villa_booking::{cli::run_cli, init, utils::build_info};

fn main() {
    init();
    tracing::debug!(build = %build_info::current().summary(), "starting shell");

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
