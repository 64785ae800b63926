use clap::Parser;
use gift_lane::utils::{logger, validation::Validate};
use gift_lane::{CliArgs, CurationPipeline, OpenAiGenerator};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🎁 Starting gift-lane");

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let generator = OpenAiGenerator::from_config(&config.generation)?;
    let partners = config.affiliate_table();
    tracing::info!(
        model = %config.generation.model,
        link_policy = ?config.sanitizer.link_policy,
        partners = partners.partners().len(),
        "Pipeline configured"
    );

    let pipeline = CurationPipeline::new(
        Arc::new(generator),
        partners,
        config.sanitizer.link_policy,
    );

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 gift-lane listening on http://{}", addr);

    gift_lane::server::serve(listener, pipeline).await?;
    Ok(())
}
