use anyhow::{bail, Result};
use clap::Parser;
use client_core::Controller;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod render;

use command::{parse, Command, HELP};
use config::load_settings;
use render::render_table;

#[derive(Parser, Debug)]
#[command(about = "Edit the event list of a remote event store")]
struct Args {
    /// Base url of the event store; `/events` is appended.
    #[arg(long)]
    store_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings();
    let store_url = args.store_url.unwrap_or(settings.store_url);
    let mut controller = Controller::connect(&store_url)?;

    // A failed load comes back as a fatal notice.
    let _ = controller.init().await;
    report_notices(&mut controller)?;

    print!("{}", render_table(controller.view().rows()));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse(&line) {
            Ok(command) => command,
            Err(command::CommandError::Empty) => continue,
            Err(error) => {
                println!("! {error}");
                continue;
            }
        };
        debug!(?command, "console command");

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Set { row, field, value } => {
                if !controller.set_field(row, field, value) {
                    println!("! row {row} has no inputs");
                }
            }
            Command::Click(click) => {
                controller.dispatch(click).await;
            }
        }

        report_notices(&mut controller)?;
        print!("{}", render_table(controller.view().rows()));
    }

    Ok(())
}

/// Prints pending notices and stops the session on a fatal one.
fn report_notices(controller: &mut Controller) -> Result<()> {
    for notice in controller.take_notices() {
        if notice.is_fatal() {
            bail!("{notice}");
        }
        println!("! {notice}");
    }
    Ok(())
}
