use std::env;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use service::claim::granter::LoggingGranter;
use service::claim::service::{ClaimConfig, ClaimService};
use service::claim_log::ClaimLog;
use service::command::{mock::AllowAll, ClaimCommandHandler};
use service::ledger::RewardLedger;
use service::messages::MessageCatalog;

const USAGE: &str = "usage: claimd <claim <user-id> | grant <user-id> <amount> | list>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = configs::load_or_init(&config_path)?;
    service::runtime::ensure_env(&cfg.data.dir).await?;

    let (ledger, _) = RewardLedger::open(cfg.rewards_path()).await?;
    let (log, _) = ClaimLog::open(cfg.claims_path()).await?;
    info!(
        pending = ledger.entries().await.len(),
        claims = log.len().await,
        "stores opened"
    );

    match command {
        "claim" => {
            let user_id = args.get(1).context(USAGE)?;
            let service = Arc::new(ClaimService::new(
                ledger,
                log,
                Arc::new(LoggingGranter),
                ClaimConfig {
                    reward_item: cfg.reward.reward_item.clone(),
                    reward_skin_id: cfg.reward.reward_skin_id,
                },
            ));
            // authorization belongs to the embedding host; the operator
            // invoking this binary already holds it
            let handler =
                ClaimCommandHandler::new(service, Arc::new(AllowAll), MessageCatalog::new());
            let reply = handler.handle_claim(user_id).await?;
            println!("{}", reply.message);
        }
        "grant" => {
            let user_id = args.get(1).context(USAGE)?;
            let amount: u32 = args
                .get(2)
                .context(USAGE)?
                .parse()
                .context("amount must be a non-negative integer")?;
            ledger.set_reward(user_id, amount).await?;
            println!("granted {amount} pending {} to {user_id}", cfg.reward.reward_item);
        }
        "list" => {
            for entry in ledger.entries().await {
                println!("{}\t{}", entry.user_id, entry.amount);
            }
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
    Ok(())
}
