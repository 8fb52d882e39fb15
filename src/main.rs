use clap::Parser;
use medalizer_setup::app::steps::{dev_server, provisioning_sequence};
use medalizer_setup::config::toml_config::SetupManifest;
use medalizer_setup::utils::{logger, validation::Validate};
use medalizer_setup::{CliConfig, HttpHealthProbe, SetupEngine, TokioProcessRunner};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting medalizer-setup");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 套用 TOML 覆寫
    if let Some(path) = config.config.clone() {
        match SetupManifest::from_file(&path) {
            Ok(manifest) => {
                tracing::info!("Applying overrides from {}", path);
                config = config.with_overrides(manifest);
            }
            Err(e) => {
                tracing::error!("❌ Failed to load config file {}: {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 組裝執行器與開發伺服器
    let runner: Arc<TokioProcessRunner> = Arc::new(TokioProcessRunner::new());
    let sequence = provisioning_sequence(&config, runner.clone(), config.monitor);
    let mut engine = SetupEngine::new(sequence);
    if !config.provision_only {
        let probe = Arc::new(HttpHealthProbe::new());
        engine = engine.with_server(Box::new(dev_server(&config, runner, probe)));
    }

    match engine.run().await {
        Ok(outcome) => {
            tracing::info!("✅ Setup completed successfully!");
            println!("✅ Setup completed successfully!");
            if let Some(status) = outcome.server_exit {
                tracing::info!("Server exited with status {}", status);
                if status != 0 {
                    std::process::exit(status);
                }
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Setup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                medalizer_setup::utils::error::ErrorSeverity::Low => 0,
                medalizer_setup::utils::error::ErrorSeverity::Medium => 2,
                medalizer_setup::utils::error::ErrorSeverity::High => 1,
                medalizer_setup::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
