//! Shell entry points for one-off pipeline runs and outreach drafting.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use pulse_ai::{generate_outreach, OutreachLead};
use pulse_pipeline::{run_pipeline, PipelineDeps, PipelineKind};

#[derive(Debug, Parser)]
#[command(name = "pulse-cli")]
#[command(about = "Pulse pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one pipeline to completion, same as the trigger endpoint.
    Run {
        /// Pipeline to run: content, comments, or post_history.
        #[arg(long)]
        pipeline: PipelineKind,
    },
    /// Draft outreach openers for leads that have none yet.
    Outreach {
        /// Leads drafted per invocation.
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = pulse_core::load_app_config()?;
    let pool_config = pulse_db::PoolConfig::from_app_config(&config);
    let pool = pulse_db::connect_pool(&config.database_url, pool_config).await?;
    let deps = Arc::new(PipelineDeps::new(pool, config)?);

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { pipeline } => run_one(deps, pipeline).await,
        Commands::Outreach { limit } => draft_outreach(&deps, limit).await,
    }
}

async fn run_one(deps: Arc<PipelineDeps>, kind: PipelineKind) -> anyhow::Result<()> {
    match run_pipeline(deps, kind).await? {
        Some(summary) => {
            println!(
                "{kind} run finished: scraped {}, scored {}, errors {}",
                summary.scraped, summary.scored, summary.errors
            );
            Ok(())
        }
        None => {
            println!("{kind} run skipped: another run is already in flight");
            Ok(())
        }
    }
}

async fn draft_outreach(deps: &PipelineDeps, limit: i64) -> anyhow::Result<()> {
    let profile = pulse_db::get_advisor_profile(&deps.pool)
        .await?
        .unwrap_or_default();
    let leads = pulse_db::list_leads_without_message(&deps.pool, limit).await?;

    if leads.is_empty() {
        println!("no leads waiting on an outreach message");
        return Ok(());
    }

    let mut drafted = 0usize;
    let mut failed = 0usize;
    for lead in leads {
        let input = OutreachLead {
            name: lead.name.clone(),
            title: lead.title.clone(),
            company: lead.company.clone(),
            interaction_text: lead.interaction_text.clone(),
        };
        match generate_outreach(
            &deps.claude,
            &deps.config.generation_model,
            &input,
            &profile,
        )
        .await
        {
            Ok(message) => {
                pulse_db::set_suggested_message(&deps.pool, lead.id, &message).await?;
                drafted += 1;
            }
            Err(error) => {
                failed += 1;
                tracing::warn!(lead_id = lead.id, %error, "outreach drafting failed");
            }
        }
    }

    println!("outreach drafting finished: {drafted} drafted, {failed} failed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_subcommand_parses_pipeline_kind() {
        let cli = Cli::try_parse_from(["pulse-cli", "run", "--pipeline", "post_history"])
            .expect("parse run command");
        match cli.command {
            Commands::Run { pipeline } => assert_eq!(pipeline, PipelineKind::PostHistory),
            Commands::Outreach { .. } => panic!("parsed wrong subcommand"),
        }
    }

    #[test]
    fn run_subcommand_rejects_unknown_pipeline() {
        assert!(Cli::try_parse_from(["pulse-cli", "run", "--pipeline", "newsletters"]).is_err());
    }

    #[test]
    fn outreach_limit_defaults_to_twenty() {
        let cli = Cli::try_parse_from(["pulse-cli", "outreach"]).expect("parse outreach command");
        match cli.command {
            Commands::Outreach { limit } => assert_eq!(limit, 20),
            Commands::Run { .. } => panic!("parsed wrong subcommand"),
        }
    }
}
