//! Human-readable error descriptions and structured JSON error formatting.

use radar_core::BuildError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensor => {
                "What happened: No radar sensor was provided to the scheduler.\nLikely causes: The simulated boards failed to construct or were not wired into the builder.\nHow to fix: Construct the boards and pass them via with_sensor(...).".to_string()
            }
            BuildError::MissingTransport => {
                "What happened: No transport was provided to the scheduler.\nLikely causes: The cellular transport was not wired into the builder.\nHow to fix: Construct the transport and pass it via with_transport(...).".to_string()
            }
            BuildError::MissingAccessToken => {
                "What happened: No access token for report uploads.\nLikely causes: transport.access_token is missing from the config.\nHow to fix: Set transport.access_token in the TOML, then rerun.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/radar_config.toml for a sample."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("failed to read config") || lower.contains("no such file") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong path or missing file.\nHow to fix: Pass --config <FILE> or create etc/radar_config.toml. Original: {msg}"
        );
    }

    if lower.contains("toml") || lower.contains("must be") || lower.contains("must not") {
        return format!(
            "What happened: Configuration is invalid or incomplete.\nLikely causes: A malformed or out-of-range value in the TOML.\nHow to fix: Edit the config file and try again. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}
