//! Harvest admin CLI
//!
//! Moderates seller listings, buyer requests and user accounts from a
//! terminal, through the same console the admin views use.
//!
//! Usage:
//!   harvest-admin listings --status pending
//!   harvest-admin verify request 12
//!   harvest-admin users --status verified --search perera
//!   harvest-admin user-verify 7

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use harvest_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use harvest_client::{
    ClientConfig, DraftEdit, ModerationConsole, PriceField, StatusFilter, init_json_logger,
    init_logger,
};
use shared::{EntityKind, Price, Record, RecordId, RecordStatus, UserId, UserRecord};

#[derive(Parser, Debug)]
#[command(name = "harvest-admin")]
#[command(about = "Moderate the Harvest produce marketplace")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "HARVEST_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Base URL of uploaded user documents (defaults to the API URL)
    #[arg(long, env = "HARVEST_DOCS_URL")]
    docs_url: Option<String>,

    /// Bearer token
    #[arg(long, env = "HARVEST_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "HARVEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List seller listings
    Listings(ListArgs),
    /// List buyer requests
    Requests(ListArgs),
    /// List user accounts
    Users(UserListArgs),
    /// Verify a pending listing or request
    Verify { kind: Kind, id: RecordId },
    /// Reject a pending listing or request
    Reject { kind: Kind, id: RecordId },
    /// Delete a listing or request
    Delete { kind: Kind, id: RecordId },
    /// Edit fields of a listing or request
    Edit(EditArgs),
    /// Toggle a user between verified and pending
    UserVerify { id: UserId },
    /// Delete a user account
    UserDelete { id: UserId },
    /// Print the URL of a user's uploaded document
    DocUrl { id: UserId },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// All, Pending, Verified or Rejected
    #[arg(long, default_value = "All")]
    status: StatusFilter,

    /// Match on item name, location or area
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Args, Debug)]
struct UserListArgs {
    /// All, Pending, Verified or Rejected
    #[arg(long, default_value = "All")]
    status: StatusFilter,

    /// Match on name or email
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    kind: Kind,
    id: RecordId,
    #[arg(long)]
    item_name: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    area: Option<String>,
    #[arg(long)]
    quantity: Option<f64>,
    /// Harvest date (listings) or required date (requests)
    #[arg(long)]
    date: Option<String>,
    /// Unit price (listings only)
    #[arg(long)]
    unit_price: Option<f64>,
    /// Lower bid (requests only)
    #[arg(long)]
    bid_from: Option<f64>,
    /// Upper bid (requests only)
    #[arg(long)]
    bid_to: Option<f64>,
    /// Raw status value, written as given without moderation checks
    #[arg(long)]
    status: Option<String>,
}

impl EditArgs {
    fn edits(&self) -> Vec<DraftEdit> {
        let mut edits = Vec::new();
        if let Some(v) = &self.item_name {
            edits.push(DraftEdit::ItemName(v.clone()));
        }
        if let Some(v) = &self.location {
            edits.push(DraftEdit::Location(v.clone()));
        }
        if let Some(v) = &self.area {
            edits.push(DraftEdit::Area(v.clone()));
        }
        if let Some(v) = self.quantity {
            edits.push(DraftEdit::Quantity(v));
        }
        if let Some(v) = &self.date {
            edits.push(DraftEdit::Date(v.clone()));
        }
        if let Some(v) = &self.status {
            edits.push(DraftEdit::Status(RecordStatus::parse(v)));
        }
        for (field, value) in [
            (PriceField::UnitPrice, self.unit_price),
            (PriceField::BidFrom, self.bid_from),
            (PriceField::BidTo, self.bid_to),
        ] {
            if value.is_some() {
                edits.push(DraftEdit::Price(field, value));
            }
        }
        edits
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Listing,
    Request,
}

impl From<Kind> for EntityKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Listing => EntityKind::SellerListing,
            Kind::Request => EntityKind::BuyerRequest,
        }
    }
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.api_url).with_timeout(self.timeout);
        if let Some(docs) = &self.docs_url {
            config = config.with_docs_base_url(docs);
        }
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if cli.json_logs {
        init_json_logger(Some(&cli.log_level));
    } else {
        init_logger(Some(&cli.log_level));
    }

    let config = cli.client_config();
    tracing::debug!(api_url = %config.base_url, "Connecting");
    let console = ModerationConsole::connect(&config).context("failed to build HTTP client")?;

    let result = run(&console, cli.command).await;
    console.shutdown().await;
    result
}

async fn run(console: &ModerationConsole<harvest_client::AdminApi>, command: Command) -> Result<()> {
    match command {
        Command::Listings(args) => list(console, EntityKind::SellerListing, args).await,
        Command::Requests(args) => list(console, EntityKind::BuyerRequest, args).await,
        Command::Users(args) => {
            console.load_users().await?;
            console.set_user_search(args.search).await;
            let visible: Vec<UserRecord> = console
                .visible_users()
                .await
                .into_iter()
                .filter(|user| args.status.matches(&user.status))
                .collect();
            for user in &visible {
                print_user(user);
            }
            println!("{} of {} users", visible.len(), console.users().await.len());
            Ok(())
        }
        Command::Verify { kind, id } => {
            let kind: EntityKind = kind.into();
            console.load(kind).await?;
            let ack = console.verify(kind, id).await?;
            report(ack.message, format!("{kind} {id} verified"));
            Ok(())
        }
        Command::Reject { kind, id } => {
            let kind: EntityKind = kind.into();
            console.load(kind).await?;
            let ack = console.reject(kind, id).await?;
            report(ack.message, format!("{kind} {id} rejected"));
            Ok(())
        }
        Command::Delete { kind, id } => {
            let kind: EntityKind = kind.into();
            console.load(kind).await?;
            let ack = console.delete(kind, id).await?;
            report(ack.message, format!("{kind} {id} deleted"));
            Ok(())
        }
        Command::Edit(args) => {
            let edits = args.edits();
            if edits.is_empty() {
                bail!("nothing to change; pass at least one field flag");
            }
            let kind: EntityKind = args.kind.into();
            console.load(kind).await?;
            console.begin_edit(kind, args.id).await?;
            for edit in edits {
                console.edit(edit).await?;
            }
            let ack = console.save_edit().await?;
            report(ack.message, format!("{kind} {} saved", args.id));
            if let Some(record) = console.record(kind, args.id).await {
                print_record(&record);
            }
            Ok(())
        }
        Command::UserVerify { id } => {
            console.load_users().await?;
            let status = console.toggle_user_verification(id).await?;
            println!("user {id} is now {}", status.label());
            Ok(())
        }
        Command::UserDelete { id } => {
            console.load_users().await?;
            let ack = console.delete_user(id).await?;
            report(ack.message, format!("user {id} deleted"));
            Ok(())
        }
        Command::DocUrl { id } => {
            console.load_users().await?;
            match console.document_url(id).await? {
                Some(url) => println!("{url}"),
                None => println!("user {id} has not uploaded a document"),
            }
            Ok(())
        }
    }
}

async fn list(
    console: &ModerationConsole<harvest_client::AdminApi>,
    kind: EntityKind,
    args: ListArgs,
) -> Result<()> {
    console.load(kind).await?;
    console.select_tab(kind).await;
    console.set_status_filter(args.status).await;
    console.set_search(args.search).await;

    let visible = console.visible().await;
    for record in &visible {
        print_record(record);
    }
    println!("{} of {} {}", visible.len(), console.records(kind).await.len(), kind.label());
    Ok(())
}

fn report(message: Option<String>, fallback: String) {
    println!("{}", message.unwrap_or(fallback));
}

fn print_record(record: &Record) {
    let price = match record.price() {
        Price::Unit(price) => format!("{price:.2}/unit"),
        Price::Bid { from, to } => format!("{from:.2}-{to:.2}"),
    };
    println!(
        "{:>5}  {:<24} {:<16} {:<16} {:>8} {:<16} {:<10} {}",
        record.id(),
        record.item_name(),
        record.location(),
        record.area(),
        record.quantity(),
        price,
        record.date(),
        record.status().label(),
    );
}

fn print_user(user: &UserRecord) {
    println!(
        "{:>5}  {:<24} {:<28} {:<8} {:<10} {}",
        user.id,
        user.name.as_deref().unwrap_or("-"),
        user.email.as_deref().unwrap_or("-"),
        user.role.label(),
        user.status.label(),
        user.joined_on()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
    );
}
