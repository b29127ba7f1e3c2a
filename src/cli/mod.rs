use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::application::{LedgerService, TransactionResult};
use crate::domain::{
    TransactionInput, TransactionRecord, TransactionType, format_cents, parse_cents,
};
use crate::io::Exporter;

/// netspend - Personal Finance Tracker
#[derive(Parser)]
#[command(name = "netspend")]
#[command(about = "Record credit and debit transactions and keep a running net balance")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "netspend.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Add a transaction
    Add {
        /// Amount (e.g., "50.00" or "50"), always positive
        amount: String,

        /// credit (money in) or debit (money out)
        #[arg(short = 't', long = "type")]
        transaction_type: String,

        /// Payment method (e.g., Cash, CreditCard, GooglePay)
        #[arg(short, long)]
        payment_method: String,

        /// Category (e.g., groceries, bills, salary)
        #[arg(short, long)]
        category: String,

        /// Description of the transaction
        #[arg(short, long)]
        description: Option<String>,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List transactions with the net amount spent
    List {
        /// Case-insensitive search in descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Only show credits or debits
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// Only show one category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show a single transaction
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit a transaction; omitted fields keep their current value
    Edit {
        /// Transaction ID
        id: String,

        /// New amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New type: credit or debit
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// New payment method
        #[arg(short, long)]
        payment_method: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Show the net amount spent
    Balance,

    /// Verify the net amount against the transaction records
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export
        #[arg(value_enum)]
        export_type: ExportType,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format (default: csv for transactions, json for full)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportType {
    Transactions,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Presentation-side filter for the `list` command.
#[derive(Debug, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, transaction: &TransactionRecord) -> bool {
        if let Some(search) = &self.search {
            if !transaction
                .description
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        if let Some(transaction_type) = self.transaction_type {
            if transaction.transaction_type != transaction_type {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !transaction
                .transaction_category
                .eq_ignore_ascii_case(category)
            {
                return false;
            }
        }
        true
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                transaction_type,
                payment_method,
                category,
                description,
                date,
            } => {
                let service = connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Utc::now().date_naive(),
                };

                let mut input = TransactionInput::new()
                    .with_date(date)
                    .with_amount(amount_cents)
                    .with_payment_method(payment_method)
                    .with_category(category)
                    .with_type(transaction_type);
                input.description = description;

                let result = service.create_transaction(input).await?;
                println!(
                    "Transaction added: {} {} ({})",
                    result.transaction.transaction_type,
                    format_cents(result.transaction.amount_cents),
                    result.transaction.id
                );
                println!("Net amount spent: {}", format_cents(result.net_amount_spent));
            }

            Commands::List {
                search,
                transaction_type,
                category,
            } => {
                let service = connect(&self.database).await?;
                let transaction_type = transaction_type
                    .map(|t| {
                        TransactionType::from_str(&t.to_lowercase())
                            .with_context(|| format!("Unknown transaction type '{}'", t))
                    })
                    .transpose()?;
                let filter = ListFilter {
                    search,
                    transaction_type,
                    category,
                };
                run_list_command(&service, &filter).await?;
            }

            Commands::Show { id } => {
                let service = connect(&self.database).await?;
                let transaction = service.get_transaction(parse_id(&id)?).await?;
                print_transaction(&transaction);
            }

            Commands::Edit {
                id,
                amount,
                transaction_type,
                payment_method,
                category,
                description,
                date,
            } => {
                let service = connect(&self.database).await?;
                let id = parse_id(&id)?;

                // Start from the stored values, like an edit form pre-filled
                let current = service.get_transaction(id).await?;
                let mut input = TransactionInput::from(current.fields());
                if let Some(amount) = amount {
                    input.amount_cents = Some(
                        parse_cents(&amount)
                            .context("Invalid amount format. Use '50.00' or '50'")?,
                    );
                }
                if let Some(date) = date {
                    input.date = Some(parse_date(&date)?);
                }
                if transaction_type.is_some() {
                    input.transaction_type = transaction_type;
                }
                if payment_method.is_some() {
                    input.payment_method = payment_method;
                }
                if category.is_some() {
                    input.transaction_category = category;
                }
                if description.is_some() {
                    input.description = description;
                }

                let result = service.update_transaction(id, input).await?;
                print_result("Transaction updated", &result);
            }

            Commands::Delete { id } => {
                let service = connect(&self.database).await?;
                let id = parse_id(&id)?;
                let net_amount_spent = service.delete_transaction(id).await?;
                println!("Transaction deleted: {}", id);
                println!("Net amount spent: {}", format_cents(net_amount_spent));
            }

            Commands::Balance => {
                let service = connect(&self.database).await?;
                let list = service.list_transactions().await?;
                println!(
                    "Net amount spent: {} ({} transactions)",
                    format_cents(list.net_amount_spent),
                    list.transactions.len()
                );
            }

            Commands::Check => {
                let service = connect(&self.database).await?;
                run_check_command(&service).await?;
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                let service = connect(&self.database).await?;
                run_export_command(&service, export_type, output, format).await?;
            }
        }

        Ok(())
    }
}

async fn connect(database: &str) -> Result<LedgerService> {
    LedgerService::connect(database).await.with_context(|| {
        format!(
            "Could not open database '{}'. Run 'netspend init' first",
            database
        )
    })
}

async fn run_list_command(service: &LedgerService, filter: &ListFilter) -> Result<()> {
    let list = service.list_transactions().await?;
    let shown: Vec<&TransactionRecord> = list
        .transactions
        .iter()
        .filter(|t| filter.matches(t))
        .collect();

    if shown.is_empty() {
        println!("No transactions found.");
    } else {
        println!(
            "{:<36} {:<10} {:>12} {:<12} {:<12} DESCRIPTION",
            "ID", "DATE", "AMOUNT", "METHOD", "CATEGORY"
        );
        println!("{}", "-".repeat(100));
        for transaction in &shown {
            println!(
                "{:<36} {:<10} {:>12} {:<12} {:<12} {}",
                transaction.id,
                transaction.date,
                format_cents(transaction.signed_amount()),
                truncate(&transaction.payment_method, 12),
                truncate(&transaction.transaction_category, 12),
                truncate(&transaction.description, 30)
            );
        }
    }

    println!();
    println!("Net amount spent: {}", format_cents(list.net_amount_spent));
    Ok(())
}

async fn run_check_command(service: &LedgerService) -> Result<()> {
    println!("Checking ledger integrity...\n");

    let report = service.check_integrity().await?;

    println!("Transactions:        {}", report.transaction_count);
    println!("Stored net amount:   {}", format_cents(report.net_amount_spent));
    println!(
        "Computed net amount: {}",
        format_cents(report.recomputed_net_amount)
    );
    if let Some(created) = report.created_at {
        println!("Created:             {}", created.to_rfc3339());
    }
    if let Some(updated) = report.last_updated {
        println!("Last updated:        {}", updated.to_rfc3339());
    }
    println!();

    if report.is_consistent() {
        println!("OK: net amount matches the transactions");
    } else {
        println!(
            "WARNING: net amount is off by {}",
            format_cents(report.drift)
        );
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: ExportType,
    output: Option<String>,
    format: Option<ExportFormat>,
) -> Result<()> {
    let writer: Box<dyn std::io::Write> = match &output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file '{}'", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let exporter = Exporter::new(service);

    let count = match (export_type, format) {
        (ExportType::Transactions, None | Some(ExportFormat::Csv)) => {
            exporter.export_transactions_csv(writer).await?
        }
        (ExportType::Transactions, Some(ExportFormat::Json)) => {
            exporter.export_transactions_json(writer).await?
        }
        (ExportType::Full, None | Some(ExportFormat::Json)) => {
            exporter.export_full_json(writer).await?.transactions.len()
        }
        (ExportType::Full, Some(ExportFormat::Csv)) => {
            anyhow::bail!("Full export is only available as JSON")
        }
    };

    if let Some(path) = output {
        eprintln!("Exported {} transaction(s) to {}", count, path);
    }
    Ok(())
}

fn print_result(heading: &str, result: &TransactionResult) {
    println!("{}:", heading);
    print_transaction(&result.transaction);
    println!("Net amount spent: {}", format_cents(result.net_amount_spent));
}

fn print_transaction(transaction: &TransactionRecord) {
    println!("ID:          {}", transaction.id);
    println!("Date:        {}", transaction.date);
    println!("Type:        {}", transaction.transaction_type);
    println!("Amount:      {}", format_cents(transaction.amount_cents));
    println!("Method:      {}", transaction.payment_method);
    println!("Category:    {}", transaction.transaction_category);
    if !transaction.description.is_empty() {
        println!("Description: {}", transaction.description);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).context("Invalid transaction ID format (expected UUID)")
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}
