#![doc(test(attr(deny(warnings))))]

//! Villa Booking models a single-property reservation flow: a four-step
//! wizard over a booking draft, field validation, stay pricing and
//! submission, plus a command shell that drives it.

pub mod booking;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod listing;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Villa booking tracing initialized.");
    });
}
