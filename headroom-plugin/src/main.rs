//! Plugin entry point.
//!
//! Parses flags, answers the agent once in the mode it requested, and exits.

use std::process::ExitCode;

use clap::Parser;
use headroom_plugin::{
    init_tracing, AutoIncrementPlugin, MySqlSchemaSource, OutputMode, PluginConfig,
    PluginResult, TelemetryConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = PluginConfig::parse();
    if let Err(err) = init_tracing(&TelemetryConfig::default()) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Plugin run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: PluginConfig) -> PluginResult<()> {
    config.validate()?;

    let db_config = config.db_config();
    tracing::debug!(
        endpoint = %db_config.endpoint(),
        database = %db_config.database,
        "Inspecting auto-increment columns"
    );

    let source = MySqlSchemaSource::new(&db_config);
    let mut plugin = AutoIncrementPlugin::new(source, &config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = plugin
        .run(OutputMode::from_env(), &mut out, config.tempfile.as_deref())
        .await;

    if let Err(err) = plugin.close().await {
        tracing::warn!(error = %err, "Failed to close database connection");
    }
    result
}
