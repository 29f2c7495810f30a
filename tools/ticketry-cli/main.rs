use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;
use ticketry::prelude::*;
use ticketry::report::{self, ReportFields, ReportFilter};
use ticketry::schema::structure;
use tracing_subscriber::EnvFilter;

type CliResult = std::result::Result<bool, Box<dyn std::error::Error>>;

/// Inspect ticket type definitions, resolve dependent options and validate form data
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a ticket type definition for structural problems
    Check {
        /// Ticket type JSON, canonical or form-builder format
        schema_path: String,
    },
    /// Show the options a field offers for the given values
    Resolve {
        schema_path: String,
        field_id: String,
        /// A current form value as `field=value`; repeat for more fields
        #[arg(short, long = "value", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },
    /// Validate form data against a ticket type
    Validate {
        schema_path: String,
        /// JSON object mapping field ids to values
        data_path: String,
    },
    /// Print ticket reports for a store snapshot (the bundled fixtures by default)
    Report {
        #[arg(short, long)]
        store: Option<String>,
        /// First creation day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last creation day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        ticket_type: Option<String>,
        #[arg(long)]
        employee: Option<String>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Write the bundled fixture store to a snapshot file
    Seed {
        #[arg(short, long, default_value = "store.json")]
        output: String,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Check { schema_path } => run_check(&schema_path),
        Command::Resolve {
            schema_path,
            field_id,
            values,
        } => run_resolve(&schema_path, &field_id, values),
        Command::Validate {
            schema_path,
            data_path,
        } => run_validate(&schema_path, &data_path),
        Command::Report {
            store,
            from,
            to,
            ticket_type,
            employee,
            json,
        } => {
            let filter = ReportFilter {
                date_start: from,
                date_end: to,
                ticket_type_id: ticket_type,
                employee_name: employee,
            };
            run_report(store.as_deref(), &filter, json)
        }
        Command::Seed { output } => run_seed(&output),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Reads a ticket type in canonical form, falling back to the form-builder format.
fn load_ticket_type(path: &str) -> std::result::Result<TicketType, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read ticket type file '{}': {}", path, e))?;

    match serde_json::from_str::<TicketType>(&json) {
        Ok(ticket_type) => Ok(ticket_type),
        Err(canonical_err) => {
            tracing::debug!(
                error = %canonical_err,
                "not a canonical ticket type, trying builder format"
            );
            let form: BuilderForm = serde_json::from_str(&json)
                .map_err(|e| format!("Failed to parse ticket type JSON: {}", e))?;
            Ok(form.into_ticket_type()?)
        }
    }
}

fn run_check(schema_path: &str) -> CliResult {
    let ticket_type = load_ticket_type(schema_path)?;
    let violations = structure::violations(&ticket_type);

    println!(
        "Ticket type '{}' ({}) with {} field(s)",
        ticket_type.name,
        ticket_type.id,
        ticket_type.fields.len()
    );
    for field in &ticket_type.fields {
        let required = if field.required { " *" } else { "" };
        match field.depends_on() {
            Some(parent) => println!(
                "  - {} [{}] <- {}{}",
                field.id,
                field.field_type(),
                parent,
                required
            ),
            None => println!("  - {} [{}]{}", field.id, field.field_type(), required),
        }
    }

    if violations.is_empty() {
        println!("\nNo structural problems found.");
        return Ok(true);
    }
    println!("\n{} problem(s) found:", violations.len());
    for violation in &violations {
        println!("  -> {}", violation);
    }
    Ok(false)
}

fn run_resolve(schema_path: &str, field_id: &str, values: Vec<(String, String)>) -> CliResult {
    let ticket_type = load_ticket_type(schema_path)?;
    let mut form = FormState::new(&ticket_type);
    for (field, value) in values {
        let cleared = form.set(&field, value)?;
        if !cleared.is_empty() {
            println!("Setting '{}' cleared: {}", field, cleared.join(", "));
        }
    }

    let Some(resolution) = form.resolution(field_id) else {
        return Err(format!(
            "Field '{}' is not declared by '{}'",
            field_id, ticket_type.id
        )
        .into());
    };

    if !resolution.enabled {
        let parent = ticket_type
            .field(field_id)
            .and_then(|f| f.depends_on())
            .unwrap_or("its parent");
        println!("'{}' is disabled until '{}' has a value.", field_id, parent);
    } else if resolution.options.is_empty() {
        println!("'{}' has no options for the current values.", field_id);
    } else {
        println!("Options for '{}':", field_id);
        for option in &resolution.options {
            println!("  - {}", option);
        }
    }
    Ok(true)
}

fn run_validate(schema_path: &str, data_path: &str) -> CliResult {
    let ticket_type = load_ticket_type(schema_path)?;
    let json = fs::read_to_string(data_path)
        .map_err(|e| format!("Failed to read form data file '{}': {}", data_path, e))?;
    let form_data: FormData = serde_json::from_str(&json)
        .map_err(|e| format!("Form data must be a JSON object: {}", e))?;

    match validate(&ticket_type, &form_data) {
        ValidationResult::Valid => {
            println!("Form data is valid for '{}'.", ticket_type.id);
            Ok(true)
        }
        ValidationResult::Invalid { errors } => {
            println!("{}", serde_json::to_string_pretty(&errors)?);
            Ok(false)
        }
    }
}

fn run_report(store_path: Option<&str>, filter: &ReportFilter, json: bool) -> CliResult {
    let store = match store_path {
        Some(path) => TicketStore::from_snapshot(Snapshot::from_file(path)?)?,
        None => TicketStore::seeded()?,
    };
    let fields = ReportFields::default();
    let tickets = store.list_tickets();
    let selected = filter.apply(&tickets, &fields);

    let agents = report::agent_report(selected.iter().copied(), &fields);
    let errors = report::error_report(selected.iter().copied(), &fields);
    let categories = report::category_totals(&errors);
    let statuses = report::status_summary(selected.iter().copied());

    if json {
        let out = serde_json::json!({
            "agents": agents,
            "errors": errors,
            "categories": categories,
            "statuses": statuses,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(true);
    }

    println!("--- Tickets ({} of {}) ---", selected.len(), tickets.len());
    for status in &statuses {
        println!("{:<12} {}", status.status, status.count);
    }

    println!("\n--- Tickets Per Agent ---");
    for agent in &agents {
        println!(
            "{:<20} {:>3} ticket(s)  avg rating {:.2}",
            agent.employee_name, agent.ticket_count, agent.average_rating
        );
    }

    println!("\n--- Error Analysis ---");
    for row in &errors {
        println!("{:<22} {:<22} {}", row.category, row.sub_type, row.count);
    }
    for total in &categories {
        println!("{:<22} total {}", total.category, total.count);
    }
    Ok(true)
}

fn run_seed(output: &str) -> CliResult {
    let snapshot = TicketStore::seeded()?.snapshot();
    snapshot.save(output)?;
    println!(
        "Wrote {} ticket type(s) and {} ticket(s) to '{}'",
        snapshot.ticket_types.len(),
        snapshot.tickets.len(),
        output
    );
    Ok(true)
}

fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected field=value, got '{}'", raw))
}
