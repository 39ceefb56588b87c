// # plugd - DHCP server daemon
//
// This is a thin integration layer. All registry and setup logic lives in
// plugd-core, all packet logic in the plugin crates.
//
// The daemon is responsible for:
// 1. Reading its settings from environment variables
// 2. Initializing logging
// 3. Registering the compiled-in plugins
// 4. Assembling the DHCPv4/DHCPv6 handler chains from the server config
// 5. Waiting for a shutdown signal
//
// ## Configuration
//
// - `PLUGD_CONFIG`: Path to the JSON server configuration (required)
// - `PLUGD_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// ## Example
//
// ```bash
// cat > /etc/plugd/config.json <<'JSON'
// {
//   "server4": { "plugins": [
//     { "name": "router", "args": ["192.168.1.1"] },
//     { "name": "dns", "args": ["192.168.1.1"] }
//   ] }
// }
// JSON
//
// PLUGD_CONFIG=/etc/plugd/config.json plugd
// ```

use anyhow::{Context, Result};
use plugd_core::{PluginRegistry, ServerConfig, ServerHandlers};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
/// - 3: Two compiled-in plugins share a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlugdExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
    /// Duplicate plugin registration
    PluginConflict = 3,
}

impl From<PlugdExitCode> for ExitCode {
    fn from(code: PlugdExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Registration hook of one compiled-in plugin
type RegisterFn = fn(&mut PluginRegistry) -> plugd_core::Result<()>;

/// Plugins linked into this build, selected by Cargo features
fn builtin_plugins() -> Vec<RegisterFn> {
    let mut plugins: Vec<RegisterFn> = Vec::new();
    #[cfg(feature = "dns")]
    plugins.push(plugd_plugin_dns::register);
    #[cfg(feature = "router")]
    plugins.push(plugd_plugin_router::register);
    plugins
}

/// Daemon settings
struct Config {
    config_path: String,
    log_level: String,
}

impl Config {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            config_path: env::var("PLUGD_CONFIG").context(
                "PLUGD_CONFIG is required. \
                Set it via: export PLUGD_CONFIG=/etc/plugd/config.json",
            )?,
            log_level: env::var("PLUGD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the settings
    fn validate(&self) -> Result<()> {
        if self.config_path.trim().is_empty() {
            anyhow::bail!("PLUGD_CONFIG cannot be empty");
        }

        if parse_log_level(&self.log_level).is_none() {
            anyhow::bail!(
                "PLUGD_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Run every registration hook, in order
///
/// A failed registration ends initialization. The returned exit code tells
/// duplicate names (fatal by contract) apart from other failures.
fn register_plugins(hooks: &[RegisterFn]) -> Result<PluginRegistry, PlugdExitCode> {
    let mut registry = PluginRegistry::new();

    for hook in hooks {
        if let Err(e) = hook(&mut registry) {
            error!("Plugin registration failed: {}", e);
            return Err(if e.is_fatal() {
                PlugdExitCode::PluginConflict
            } else {
                PlugdExitCode::ConfigError
            });
        }
    }

    info!(
        "Registered {} plugin(s): {}",
        registry.len(),
        registry.names().join(", ")
    );
    Ok(registry)
}

/// Load the server config and build both handler chains
fn assemble(registry: &PluginRegistry, config_path: &str) -> Result<(ServerConfig, ServerHandlers)> {
    let server_config = ServerConfig::from_file(config_path)
        .with_context(|| format!("failed to load server config from {}", config_path))?;
    let handlers = plugd_core::build_server(registry, &server_config)?;
    Ok((server_config, handlers))
}

fn main() -> ExitCode {
    // Load settings from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return PlugdExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return PlugdExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PlugdExitCode::ConfigError.into();
    }

    info!("Starting plugd");

    // Initialization phase: the registry is only written here
    let registry = match register_plugins(&builtin_plugins()) {
        Ok(registry) => registry.into_shared(),
        Err(code) => return code.into(),
    };

    let (server_config, handlers) = match assemble(&registry, &config.config_path) {
        Ok(assembled) => assembled,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return PlugdExitCode::ConfigError.into();
        }
    };

    if let Some(server4) = &server_config.server4 {
        info!(
            "DHCPv4 chain: {} handler(s), listening on {:?}",
            handlers.handlers4.len(),
            server4.listen
        );
    }
    if let Some(server6) = &server_config.server6 {
        info!(
            "DHCPv6 chain: {} handler(s), listening on {:?}",
            handlers.handlers6.len(),
            server6.listen
        );
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PlugdExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(registry, handlers).await {
            error!("Daemon error: {}", e);
            PlugdExitCode::RuntimeError
        } else {
            PlugdExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Serving phase: hold the frozen registry and chains until shutdown
async fn run_daemon(registry: Arc<PluginRegistry>, handlers: ServerHandlers) -> Result<()> {
    info!("Daemon initialized successfully");

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);
    info!("Shutting down daemon");

    drop(handlers);
    drop(registry);
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
