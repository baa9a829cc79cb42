use anyhow::Context;
use clap::Parser;
use remote_sshkeys::config::cli::{Command, LogFormat};
use remote_sshkeys::utils::error::ErrorSeverity;
use remote_sshkeys::utils::{logger, validation::Validate};
use remote_sshkeys::{CliConfig, HostKey, Settings, SshKeysError, TomlConfig};

async fn run(config: &CliConfig) -> Result<(), SshKeysError> {
    let file = match &config.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            Some(file)
        }
        None => None,
    };

    let settings = Settings::resolve(config, file.as_ref())?;
    match &settings.target {
        Some(target) => tracing::debug!("Target: {}", target),
        None => tracing::debug!("Target: local machine"),
    }

    let client = settings.build_client();
    let os = settings.resolve_os(client.as_ref()).await?;

    match &config.command {
        Command::HostKeys { host, port, json } => {
            let keys = os.get_host_keys(client.as_ref(), host, *port).await?;
            if *json {
                let parsed: Vec<serde_json::Value> = keys
                    .iter()
                    .map(|line| match HostKey::parse(line) {
                        Some(key) => serde_json::json!(key),
                        None => serde_json::json!({ "raw": line }),
                    })
                    .collect();
                let out = serde_json::to_string_pretty(&parsed)?;
                println!("{}", out);
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
        Command::CopyId { user, .. } => {
            let key = config.public_key()?.ok_or_else(|| SshKeysError::MissingConfigError {
                field: "key".to_string(),
            })?;
            os.copy_id(client.as_ref(), user, &key).await?;
            println!("✅ Key installed for {}", user);
        }
        Command::KeysPath { user } => {
            let path = os.get_keys_path(client.as_ref(), user).await?;
            println!("{}", path);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let runtime_result = run(&config).await;

    if let Err(e) = runtime_result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    std::io::Write::flush(&mut std::io::stdout()).context("failed to flush stdout")?;
    Ok(())
}
