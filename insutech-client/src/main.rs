//! Insutech headless client entry point.
//!
//! ```text
//! insutech [--config <path>] policies [--sort <field>]
//! insutech [--config <path>] users [term]
//! ```

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use insutech_client::config::ClientConfig;
use insutech_client::error::ClientError;
use insutech_client::logging::init_tracing;
use insutech_client::state::ViewStatus;
use insutech_client::views::{PolicyListController, UserDirectoryController};
use insutech_client::ApiClient;
use insutech_events::FreshnessBus;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;
    if let Err(err) = init_tracing(config.log_json) {
        eprintln!("{}", err);
    }

    let bus = FreshnessBus::new();
    let api = ApiClient::new(&config, bus)?;

    match cli.listing() {
        Command::Policies { sort } => list_policies(&api, sort.as_deref()).await,
        Command::Users { term } => list_users(&api, term.as_deref()).await,
    }
}

async fn list_policies(api: &ApiClient, sort: Option<&str>) -> Result<(), ClientError> {
    let mut controller = PolicyListController::new(api.policies().clone());
    controller.mount().await;
    if let Some(field) = sort {
        controller.sort_by(field);
    }

    let state = controller.state();
    if state.status() == ViewStatus::Error {
        println!("{}", state.error().unwrap_or_default());
    } else if controller.policies().is_empty() {
        println!("No policies found.");
    } else {
        for policy in controller.policies() {
            println!(
                "{:>6}  {:<14} {:<24} {:<14} {:<10} {:>10.2}  {} -> {}",
                policy.id,
                policy.policy_number,
                format!("{} {}", policy.first_name, policy.last_name),
                policy.policy_type.as_wire_str(),
                policy.status.as_wire_str(),
                policy.premium_amount,
                policy.start_date,
                policy.end_date,
            );
        }
    }
    if let Some(updated) = state.last_updated() {
        println!("Last updated: {}", updated.to_rfc3339());
    }

    controller.unmount();
    Ok(())
}

async fn list_users(api: &ApiClient, term: Option<&str>) -> Result<(), ClientError> {
    let mut controller = UserDirectoryController::new(api.users().clone());
    controller.load().await;
    if let Some(term) = term {
        controller.search(term).await;
    }

    if let Some(error) = controller.error() {
        println!("{}", error);
        return Ok(());
    }
    for user in controller.users() {
        println!("{:>6}  {:<20} {:<32} {}", user.id, user.username, user.email, user.role.as_wire_str());
    }
    Ok(())
}
