//! Habitkit CLI - daily goal logging and progress.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{warn, Level};

use habitkit_core::{Goal, GoalId};
use habitkit_progress::{ProgressAnalytics, ProgressLedger, SystemClock, DEFAULT_TARGET_DAYS};
use habitkit_storage::{GoalStore, JsonGoalStore, JsonKvStore};

#[derive(Parser)]
#[command(name = "habitkit")]
#[command(about = "Daily goal logging and progress", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new goal
    Add {
        /// Goal title
        title: String,
        /// Detailed description
        #[arg(long)]
        detail: Option<String>,
    },
    /// List goals with their progress
    List,
    /// Log today's completion for a goal
    Log {
        /// Goal ID
        id: String,
    },
    /// Delete a goal and its progress record
    Delete {
        /// Goal ID
        id: String,
    },
    /// Show cross-goal progress stats
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    // Open storage
    let data_dir = std::path::PathBuf::from(".habitkit");
    let goal_store = JsonGoalStore::new(data_dir.join("goals")).await?;
    let kv_store = JsonKvStore::new(data_dir.join("progress")).await?;
    let ledger = Arc::new(ProgressLedger::new(
        Arc::new(kv_store),
        Arc::new(SystemClock),
    ));

    match cli.command {
        Commands::Add { title, detail } => {
            let goal = Goal::new(title, detail);
            goal_store.save_goal(&goal).await?;
            println!("Added goal: {} - {}", goal.id, goal.title);
        }
        Commands::List => {
            let goals = goal_store.list_goals().await?;
            let now = ledger.clock().now();

            println!("Goals ({})", goals.len());
            for goal in goals {
                let count = ledger.logged_count(goal.id).await.unwrap_or_else(|e| {
                    warn!(goal = %goal.id, error = %e, "could not read progress");
                    0
                });
                let fraction = ledger
                    .progress(goal.id, DEFAULT_TARGET_DAYS)
                    .await
                    .unwrap_or(0.0);
                let today = ledger.is_logged_today(goal.id).await.unwrap_or(false);
                println!(
                    "  {} | day {} | {} days logged | {:.0}%{} - {}",
                    goal.id,
                    goal.current_day(now),
                    count,
                    fraction * 100.0,
                    if today { " | logged today" } else { "" },
                    goal.title,
                );
            }
        }
        Commands::Log { id } => {
            let goal_id = parse_goal_id(&id)?;
            let Some(goal) = goal_store.load_goal(goal_id).await? else {
                println!("Goal not found");
                return Ok(());
            };

            if ledger.log_today(goal_id).await? {
                let count = ledger.logged_count(goal_id).await.unwrap_or(0);
                println!("Logged '{}' for today ({} days total)", goal.title, count);
            } else {
                println!("'{}' is already logged today", goal.title);
            }
        }
        Commands::Delete { id } => {
            let goal_id = parse_goal_id(&id)?;
            let Some(goal) = goal_store.load_goal(goal_id).await? else {
                println!("Goal not found");
                return Ok(());
            };

            // The ledger does not watch goal lifecycle; clear alongside.
            goal_store.delete_goal(goal_id).await?;
            ledger.clear_logs(goal_id).await?;
            println!("Deleted goal: {}", goal.title);
        }
        Commands::Stats => {
            let goals = goal_store.list_goals().await?;
            let analytics = ProgressAnalytics::new(ledger.clone());
            let snapshot = analytics.snapshot(&goals).await;

            println!("Progress at {}", snapshot.timestamp);
            println!("  Active goals: {}", snapshot.active_goals);
            println!("  Completed goals: {}", snapshot.completed_goals);
            println!(
                "  Average progress: {:.0}%",
                snapshot.average_progress * 100.0
            );
            println!("  Total days logged: {}", snapshot.total_days_logged);
            println!("  Created this week: {}", snapshot.weekly_active);
        }
    }

    Ok(())
}

fn parse_goal_id(s: &str) -> Result<GoalId> {
    s.parse().map_err(|_| anyhow::anyhow!("Invalid goal ID"))
}
