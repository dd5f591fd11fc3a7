use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use habita::cli;
use habita_plan::PlanSession;
use habita_shared::{api::PreviewRequest, plan::Member};

/// habita - Fair household chore plans
#[derive(Parser)]
#[command(name = "habita")]
#[command(about = "Review, edit and apply household chore plans", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Household {
    /// Household member as id:name[:adult|teen|child], repeatable
    #[arg(long = "member", value_parser = cli::parse_member)]
    members: Vec<Member>,

    /// Name of an existing household task, repeatable
    #[arg(long = "task")]
    tasks: Vec<String>,

    /// Plan window in days (overrides config file)
    #[arg(long)]
    days: Option<u8>,

    /// First day of the plan, yyyy-mm-dd
    #[arg(long)]
    start_date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive plan session
    Shell(Household),
    /// Generate a plan once and print it
    Preview(Household),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = habita::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    habita::observability::init_observability(
        "habita",
        env!("CARGO_PKG_VERSION"),
        &config.logging.level,
    )?;

    let api = cli::http_api(&config)?;

    match cli.command {
        Commands::Shell(household) => {
            let request = preview_request(&config, &household);
            let mut session = PlanSession::new(
                api,
                cli::session_options(&config, household.members, household.tasks),
            );

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            println!("{}", cli::shell::HELP);
            cli::shell::run(&mut session, request, stdin, &mut std::io::stdout()).await
        }
        Commands::Preview(household) => {
            let request = preview_request(&config, &household);
            let mut session = PlanSession::new(
                api,
                cli::session_options(&config, household.members, household.tasks),
            );

            cli::preview::run(&mut session, request, &mut std::io::stdout()).await
        }
    }
}

fn preview_request(config: &habita::Config, household: &Household) -> PreviewRequest {
    PreviewRequest {
        duration_days: household.days.unwrap_or(config.plan.duration_days),
        start_date: household.start_date.to_owned(),
    }
}
