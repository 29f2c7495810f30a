use ahash::AHashSet;
use chrono::{TimeDelta, Utc};
use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};
use std::fs;
use ticketry::prelude::*;
use ticketry::schema::structure;
use ticketry::seed;
use ticketry::store::UuidIds;
use tracing_subscriber::EnvFilter;

const EMPLOYEES: [&str; 6] = [
    "Alice Johnson",
    "Bob Williams",
    "Charlie Brown",
    "Dana Whitaker",
    "Elena Petrova",
    "Farid Haddad",
];

const PHRASES: [&str; 6] = [
    "Customer was kept informed throughout.",
    "Needs to confirm details before closing.",
    "Handled an escalation calmly.",
    "Follow up on the open billing question.",
    "Good rapport, slightly long hold time.",
    "Review the verification checklist together.",
];

/// A CLI tool to generate random, valid tickets for a ticket type
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated snapshot JSON file to
    #[arg(short, long, default_value = "generated_store.json")]
    output: String,

    /// Number of tickets to generate
    #[arg(short, long, default_value_t = 50)]
    count: usize,

    /// Ticket type JSON file; the bundled quality-monitoring type is used when omitted
    #[arg(long)]
    ticket_type: Option<String>,

    /// Spread creation times over this many past days
    #[arg(long, default_value_t = 90)]
    days: i64,

    /// Chance that an optional field gets a value
    #[arg(long, default_value_t = 0.7)]
    fill_rate: f64,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.fill_rate) {
        eprintln!(
            "Error: --fill-rate must be between 0 and 1, got {}",
            cli.fill_rate
        );
        std::process::exit(1);
    }
    if cli.days < 1 {
        eprintln!("Error: --days must be at least 1, got {}", cli.days);
        std::process::exit(1);
    }

    let ticket_type = match &cli.ticket_type {
        Some(path) => serde_json::from_str::<TicketType>(&fs::read_to_string(path)?)?,
        None => seed::quality_monitoring(),
    };
    structure::check(&ticket_type)?;

    println!(
        "Generating {} ticket(s) for '{}' over the last {} day(s)...",
        cli.count, ticket_type.id, cli.days
    );

    let ids = UuidIds;
    let now = Utc::now();
    let mut builder = TicketStore::builder().with_ticket_type(ticket_type.clone());
    let mut skipped = 0;
    for _ in 0..cli.count {
        let form_data = generate_form_data(&mut rng, &ticket_type, cli.fill_rate)?;
        // A parent value with nothing mapped below it can leave a required
        // grandchild without a parent.
        if let ValidationResult::Invalid { errors } = validate(&ticket_type, &form_data) {
            tracing::warn!(%errors, "skipping generated ticket");
            skipped += 1;
            continue;
        }
        let age = TimeDelta::seconds(rng.random_range(0..cli.days * 86_400));
        builder = builder.with_ticket(Ticket {
            id: ids.next_id(),
            ticket_type_id: ticket_type.id.clone(),
            created_at: now - age,
            status: *TicketStatus::ALL.choose(&mut rng).unwrap_or(&TicketStatus::New),
            form_data,
        });
    }

    // Building the store re-validates every generated ticket.
    let store = builder.build()?;
    let snapshot = store.snapshot();
    snapshot.save(&cli.output)?;

    println!(
        "Successfully generated and saved {} ticket(s) to '{}'",
        snapshot.tickets.len(),
        cli.output
    );
    if skipped > 0 {
        println!("Skipped {skipped} ticket(s) whose dependency chain had no options");
    }
    Ok(())
}

/// Fills fields in declaration order so every dynamic dropdown sees its parent's value.
fn generate_form_data(
    rng: &mut ThreadRng,
    ticket_type: &TicketType,
    fill_rate: f64,
) -> Result<FormData> {
    let mut form = FormState::new(ticket_type);
    let always = always_filled(ticket_type);

    for field in &ticket_type.fields {
        if !always.contains(field.id.as_str()) && !rng.random_bool(fill_rate) {
            continue;
        }
        let value = match &field.kind {
            FieldKind::Text if field.id == "employeeName" => pick(rng, &EMPLOYEES),
            FieldKind::Text => json!(format!("{} #{}", field.label, rng.random_range(1..1000))),
            FieldKind::Textarea => pick(rng, &PHRASES),
            FieldKind::Number { min, max } => {
                let low = min.unwrap_or(0.0);
                let high = max.unwrap_or(low + 100.0);
                json!(if high > low { rng.random_range(low..=high) } else { low })
            }
            FieldKind::Date => {
                let age = TimeDelta::days(rng.random_range(0..365));
                json!((Utc::now().date_naive() - age).format("%Y-%m-%d").to_string())
            }
            FieldKind::Rating { max } => json!(rng.random_range(1..=*max)),
            FieldKind::Dropdown { options } | FieldKind::Radio { options } => {
                match options.choose(rng) {
                    Some(choice) => json!(choice),
                    None => continue,
                }
            }
            FieldKind::Checkbox { options } => {
                let upper = options.len().max(1);
                let amount = rng.random_range(1..=upper);
                let picked: Vec<&String> = options.choose_multiple(rng, amount).collect();
                json!(picked)
            }
            FieldKind::DynamicDropdown { .. } => match form.options(&field.id).choose(rng) {
                Some(choice) => json!(choice),
                // Nothing is mapped for the parent's value.
                None => continue,
            },
        };
        form.set(&field.id, value)?;
    }

    Ok(form.into_values())
}

/// Required fields plus every field on a required field's dependency chain.
fn always_filled(ticket_type: &TicketType) -> AHashSet<&str> {
    ticket_type
        .fields
        .iter()
        .filter(|f| f.required)
        .flat_map(|f| {
            ticket_type
                .dependency_chain(&f.id)
                .into_iter()
                .chain(std::iter::once(f))
        })
        .map(|f| f.id.as_str())
        .collect()
}

fn pick(rng: &mut ThreadRng, items: &[&'static str]) -> Value {
    json!(items.choose(rng).copied().unwrap_or_default())
}
