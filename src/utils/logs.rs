use std::str::FromStr;
use tracing::Level;
use crate::core::domain::Configuration;

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing(config: &Configuration) {
    let level = Level::from_str(config.log_level.as_str()).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .json()
        .try_init();
}
