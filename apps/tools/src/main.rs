use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::{EventDraft, EventId};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/events.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    AddEvent {
        name: String,
        start_date: String,
        end_date: String,
    },
    ListEvents,
    DeleteEvent {
        event_id: i64,
    },
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::AddEvent {
            name,
            start_date,
            end_date,
        } => {
            let draft = EventDraft::new(name, start_date, end_date);
            if !draft.is_complete() {
                bail!("name, start date and end date must not be empty");
            }
            let event = storage.create_event(&draft).await?;
            println!("created event_id={}", event.id);
        }
        Command::ListEvents => {
            for event in storage.list_events().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    event.id, event.event_name, event.start_date, event.end_date
                );
            }
        }
        Command::DeleteEvent { event_id } => {
            if !storage.delete_event(EventId(event_id)).await? {
                bail!("no event with id {event_id}");
            }
            println!("deleted event_id={event_id}");
        }
        Command::Clear => {
            let removed = storage.clear_events().await?;
            println!("removed {removed} events");
        }
    }

    Ok(())
}
