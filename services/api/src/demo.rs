use crate::infra::{
    seed_submission, FsContractStore, HtmlDocumentRenderer, InMemoryNotificationSink,
    InMemoryPlacementRepository, InMemoryWalletRepository, TracingEmailGateway,
};
use clap::Args;
use std::sync::Arc;
use worklink::config::AppConfig;
use worklink::error::AppError;
use worklink::workflows::placement::{FlightTicketRequest, PlacementService};
use worklink::workflows::wallet::{LedgerError, WalletLedger, WalletOperation};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the wallet ledger portion of the demo.
    #[arg(long)]
    pub(crate) skip_wallet: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    println!("Placement lifecycle demo");

    let repository = Arc::new(InMemoryPlacementRepository::default());
    let notifications = Arc::new(InMemoryNotificationSink::default());
    let mailer = TracingEmailGateway::default();
    let service = Arc::new(PlacementService::new(
        repository.clone(),
        notifications.clone(),
        Box::new(HtmlDocumentRenderer),
        Box::new(FsContractStore::new(&config.platform.storage_dir)),
        Box::new(mailer.clone()),
        config.platform.base_url.clone(),
    ));

    let submission = seed_submission();
    let job_id = submission.job.id.clone();
    let record = match service.submit(submission) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Application {} received -> status {}",
        record.id.0,
        record.status.label()
    );

    let shortlisted = match service.shortlist(&job_id, &record.id) {
        Ok(record) => record,
        Err(err) => {
            println!("  Shortlist failed: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Shortlisted {} for job {} -> status {}",
        shortlisted.employee.full_name(),
        shortlisted.job.title,
        shortlisted.status.label()
    );

    let url = match service.generate_contract(&record.id) {
        Ok(url) => url,
        Err(err) => {
            println!("  Contract generation failed: {}", err);
            return Ok(());
        }
    };
    println!("- Contract generated at {}", url);

    let outcome = match service.dispatch_contract(&record.id) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Contract dispatch failed: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Contract #{} dispatched, application status {}",
        outcome.contract.contract_number,
        outcome.application.status.label()
    );
    for email in mailer.sent() {
        println!("    email -> {} | {}", email.to, email.subject);
    }

    let ticket = match service.record_flight_ticket(FlightTicketRequest {
        contract_id: outcome.contract.id.clone(),
        file_url: "https://cdn.example.com/tickets/WY-0421.pdf".to_string(),
        airline: Some("Oman Air".to_string()),
        flight_number: Some("WY421".to_string()),
        departure_date: None,
        arrival_date: None,
        price: Some(186.0),
    }) {
        Ok(ticket) => ticket,
        Err(err) => {
            println!("  Flight ticket rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Flight ticket {} recorded against contract #{}",
        ticket.id.0, outcome.contract.contract_number
    );

    let events = notifications.notifications();
    if events.is_empty() {
        println!("  Notifications: none recorded");
    } else {
        println!("  Notifications:");
        for event in events {
            println!("    - [{}] {} -> {}", event.kind.label(), event.title, event.user_id.0);
        }
    }

    if args.skip_wallet {
        return Ok(());
    }

    println!("\nWallet ledger demo");
    let wallets = Arc::new(WalletLedger::new(
        Arc::new(InMemoryWalletRepository::default()),
        config.platform.wallet_currency.clone(),
    ));
    let owner = outcome.contract.employee_id.clone();

    let wallet = match wallets.get_or_create(&owner) {
        Ok(wallet) => wallet,
        Err(err) => {
            println!("  Wallet unavailable: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Wallet opened for {} with balance {} {}",
        owner.0, wallet.balance, wallet.currency
    );

    match wallets.apply(&owner, 500, WalletOperation::Credit) {
        Ok(wallet) => println!("- Credited 500 -> balance {}", wallet.balance),
        Err(err) => println!("  Credit failed: {}", err),
    }
    match wallets.apply(&owner, 200, WalletOperation::Debit) {
        Ok(wallet) => println!("- Debited 200 -> balance {}", wallet.balance),
        Err(err) => println!("  Debit failed: {}", err),
    }
    match wallets.apply(&owner, 900, WalletOperation::Debit) {
        Ok(wallet) => println!("- Debited 900 -> balance {}", wallet.balance),
        Err(LedgerError::InsufficientBalance { balance, requested }) => println!(
            "- Debit of {} declined, balance {} untouched",
            requested, balance
        ),
        Err(err) => println!("  Debit failed: {}", err),
    }

    Ok(())
}
