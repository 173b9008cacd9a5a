use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tally_core::{time::today_in, RecordError};
use tally_finance::{Ledger, Summary};
use tally_store::CsvStore;
use tracing_subscriber::EnvFilter;

mod config;
mod server;
mod state;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Log spending in plain words and track savings goals")]
struct Cli {
    /// Data directory (overrides config.toml)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a transaction, e.g. `tally add spent $40 on groceries`
    Add {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Show how text would be classified without recording it
    Classify {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,

        /// Print JSON instead of a one-line summary
        #[arg(long)]
        json: bool,
    },

    /// Income, expenses and savings-goal pace
    Summary {
        #[arg(long)]
        json: bool,

        /// Reference date (YYYY-MM-DD); defaults to today in the configured timezone
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Savings goal commands
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Budget commands
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Write default goals, budgets and an opening paycheck
    Seed {
        /// Deadline for every default goal (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },

    /// Clear all transactions and restore default goals and budgets
    Reset {
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },

    /// Serve the JSON API
    Serve {
        /// Bind address (default from config.toml)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// List goals and their balances
    List,

    /// Add a signed amount to a goal's balance
    Update {
        name: String,

        #[arg(allow_hyphen_values = true)]
        amount: f64,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// List budgets
    List,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.tally/config.toml
    Init,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => cfg.data_dir()?,
    };
    let open_ledger = || -> Result<Ledger<CsvStore>> {
        let store = CsvStore::open(&data_dir)
            .with_context(|| format!("opening data directory {}", data_dir.display()))?;
        Ok(Ledger::new(store))
    };
    let today = today_in(&cfg.clock.timezone)?;

    match cli.command {
        Command::Add { text } => {
            let ledger = open_ledger()?;
            let text = text.join(" ");
            let recorded = match ledger.record(&text, today) {
                Ok(r) => r,
                Err(RecordError::Rejected(e)) => bail!("Could not process the input: {e}"),
                Err(RecordError::Ledger(e)) => return Err(e.into()),
            };
            let t = &recorded.transaction;
            println!(
                "Recorded {} | {:+.2} | {} | {}",
                t.date, t.amount, t.category, t.description
            );
            match (&recorded.goal_name, recorded.goal_balance) {
                (Some(goal), Some(balance)) => println!("Goal {goal}: now ${balance:.2}"),
                (Some(goal), None) => println!("Goal {goal}: not tracked"),
                _ => {}
            }
        }

        Command::Classify { text, json } => {
            let ledger = open_ledger()?;
            let text = text.join(" ");
            let c = ledger
                .preview(&text)
                .map_err(|e| anyhow::anyhow!("Could not process the input: {e}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&c)?);
            } else {
                println!(
                    "{:+.2} | {} | {} | goal={}",
                    c.amount,
                    c.category,
                    c.description,
                    c.goal_name.as_deref().unwrap_or("-")
                );
            }
        }

        Command::Summary { json, today: at } => {
            let summary = open_ledger()?.summary(at.unwrap_or(today))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }

        Command::Goal { command } => match command {
            GoalCommand::List => {
                let goals = open_ledger()?.goals()?;
                if goals.is_empty() {
                    println!("No goals. Run: tally seed");
                }
                for g in &goals {
                    println!(
                        "- {} | ${:.2} / ${:.2} | due {}",
                        g.name, g.current_amount, g.target_amount, g.deadline
                    );
                }
            }
            GoalCommand::Update { name, amount } => {
                let balance = open_ledger()?.update_goal(&name, amount)?;
                println!("Updated {name} goal successfully (now ${balance:.2})");
            }
        },

        Command::Budget { command } => match command {
            BudgetCommand::List => {
                for b in open_ledger()?.budgets()? {
                    println!("- {} | ${:.2} | {}", b.category, b.amount, b.period);
                }
            }
        },

        Command::Seed { deadline } => {
            tally_store::seed(open_ledger()?.store(), today, deadline)?;
            println!("Data initialized in {}", data_dir.display());
        }

        Command::Reset { deadline } => {
            tally_store::reset(open_ledger()?.store(), deadline)?;
            println!("All data in {} has been reset", data_dir.display());
        }

        Command::Serve { addr } => {
            let addr = match addr {
                Some(a) => a,
                None => cfg
                    .server
                    .addr
                    .parse()
                    .with_context(|| format!("invalid server.addr '{}'", cfg.server.addr))?,
            };
            let state = server::AppState::new(open_ledger()?, cfg.clock.timezone.clone());
            server::serve(state, addr).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

fn print_summary(s: &Summary) {
    println!("# Summary\n");
    println!("Income:   ${:.2}", s.total_income);
    println!("Expenses: ${:.2}", s.total_expenses);
    println!("Net:      ${:.2}", s.net_balance);

    if !s.category_expenses.is_empty() {
        println!("\n## Spending by category\n");
        for (category, total) in &s.category_expenses {
            println!("- {category}: ${total:.2}");
        }
    }

    println!("\n## Savings goals\n");
    if s.savings_goals.is_empty() {
        println!("(no open goals)");
    }
    for p in &s.savings_goals {
        println!(
            "- {} | ${:.2} of ${:.2} | {} days left | ${:.2}/day, ${:.2}/paycheck",
            p.goal,
            p.current_amount,
            p.target_amount,
            p.days_remaining,
            p.daily_savings_needed,
            p.biweekly_savings_needed
        );
    }
}
