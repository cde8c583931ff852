use clap::{Parser, Subcommand};
use rand::Rng;
use thiserror::Error;

use crate::dates::from_day_id;
use crate::models::{GoalColor, GoalIcon, NewGoal, PaymentOutcome};
use crate::store::AppStore;

#[derive(Parser)]
#[command(name = "goaltrack")]
#[command(about = "Track goals with due dates, photo proof and a Pro subscription")]
#[command(version)]
pub struct Cli {
    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new goal
    Add {
        /// Goal title (at least 3 characters)
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
        /// Icon tag (target, calendar, book, exercise, work, heart, travel)
        #[arg(long, default_value = "target")]
        icon: GoalIcon,
        /// Color tag (blue, green, orange, purple, red)
        #[arg(long, default_value = "blue")]
        color: GoalColor,
    },
    /// Mark a goal completed, optionally attaching photo proof
    Done {
        /// Goal id
        id: String,
        /// Reference to a captured image, e.g. a file path or URI
        #[arg(long)]
        proof: Option<String>,
    },
    /// Remove a goal permanently
    Rm {
        /// Goal id
        id: String,
    },
    /// List goals grouped by due day
    List,
    /// Subscribe to Pro through the simulated payment flow
    Subscribe,
    /// Cancel the Pro subscription
    Unsubscribe,
    /// Show goal counts and subscription status
    Status,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    DateParseError(String),
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Handle the add command
pub fn handle_add(
    title: String,
    due: String,
    icon: GoalIcon,
    color: GoalColor,
    store: &mut AppStore,
) -> Result<(), CliError> {
    let due_date = from_day_id(&due).ok_or_else(|| CliError::DateParseError(due.clone()))?;

    let input = NewGoal {
        title,
        color,
        icon,
        due_date,
    };

    match store.add_goal(input) {
        Some(id) => {
            println!("Goal created successfully (ID: {})", id);
            Ok(())
        }
        None => Err(CliError::Rejected(
            "title must be at least 3 characters".to_string(),
        )),
    }
}

/// Handle the done command
pub fn handle_done(id: String, proof: Option<String>, store: &mut AppStore) -> Result<(), CliError> {
    if store.complete_goal(&id, proof) {
        println!("Goal completed (ID: {})", id);
    } else {
        println!("No goal with ID {}", id);
    }
    Ok(())
}

/// Handle the rm command
pub fn handle_rm(id: String, store: &mut AppStore) -> Result<(), CliError> {
    if store.remove_goal(&id) {
        println!("Goal removed (ID: {})", id);
    } else {
        println!("No goal with ID {}", id);
    }
    Ok(())
}

/// Handle the list command: open goals grouped by due day, then the
/// completed ones.
pub fn handle_list(store: &AppStore) -> Result<(), CliError> {
    if store.goal_count() == 0 {
        println!("No goals yet.");
        return Ok(());
    }

    for (day, goals) in crate::dates::group_by_day(store.uncompleted_goals()) {
        println!("{}", day);
        for goal in goals {
            println!("  [ ] {}  ({}, {})  {}", goal.title, goal.icon, goal.color, goal.id);
        }
    }

    let completed = store.completed_goals();
    if !completed.is_empty() {
        println!("Completed");
        for goal in completed {
            let proof = goal.proof.as_deref().unwrap_or("no proof");
            println!("  [x] {}  ({})  {}", goal.title, proof, goal.id);
        }
    }

    Ok(())
}

/// Handle the subscribe command: run the simulated payment, activate on
/// success and record the outcome marker either way.
pub fn handle_subscribe(store: &mut AppStore) -> Result<(), CliError> {
    if simulate_payment() {
        store.subscribe();
        store.set_payment_result(PaymentOutcome::Success);
        match store.subscription_expires_at() {
            Some(expires) => println!("Payment accepted. Pro active until {}", expires.to_rfc3339()),
            None => println!("Payment accepted. Pro active."),
        }
    } else {
        store.set_payment_result(PaymentOutcome::Error);
        println!("Payment declined. Please try again.");
    }
    Ok(())
}

/// Handle the unsubscribe command
pub fn handle_unsubscribe(store: &mut AppStore) -> Result<(), CliError> {
    store.unsubscribe();
    println!("Subscription cancelled.");
    Ok(())
}

/// Handle the status command
pub fn handle_status(store: &mut AppStore) -> Result<(), CliError> {
    println!(
        "{} goals ({} open, {} completed)",
        store.goal_count(),
        store.uncompleted_goals().len(),
        store.completed_goals().len()
    );

    if store.is_entitled() {
        match store.subscription_expires_at() {
            Some(expires) => println!("Pro: active until {}", expires.to_rfc3339()),
            None => println!("Pro: active"),
        }
    } else {
        println!("Pro: not active");
    }

    // The payment marker is shown once, then cleared.
    if let Some(outcome) = store.payment_result() {
        match outcome {
            PaymentOutcome::Success => println!("Last payment: succeeded"),
            PaymentOutcome::Error => println!("Last payment: failed"),
        }
        store.clear_payment_result();
    }

    Ok(())
}

/// Fake payment processor: resolves locally with a 90% success rate,
/// matching the original payment screen. No card details involved.
fn simulate_payment() -> bool {
    rand::thread_rng().gen_bool(0.9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_parses_icon_and_color_values() {
        let cli = Cli::try_parse_from([
            "goaltrack", "add", "Run 5k", "--due", "2025-09-01", "--icon", "exercise", "--color",
            "red",
        ])
        .unwrap();
        match cli.command {
            Commands::Add { icon, color, .. } => {
                assert_eq!(icon, GoalIcon::Exercise);
                assert_eq!(color, GoalColor::Red);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn add_rejects_unknown_color() {
        let result = Cli::try_parse_from([
            "goaltrack", "add", "Run 5k", "--due", "2025-09-01", "--color", "pink",
        ]);
        assert!(result.is_err());
    }
}
