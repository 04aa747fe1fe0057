//! Event management commands.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use memsys_core::types::{Event, NewEvent};

use super::Context;
use crate::api::event_path;
use crate::cli::EventsAction;

pub async fn execute(action: EventsAction, ctx: &Context) -> Result<()> {
    match action {
        EventsAction::List { json } => list(ctx, json).await,
        EventsAction::Show { id } => show(ctx, &id).await,
        EventsAction::Create {
            title,
            start,
            end,
            description,
            location_id,
            location,
        } => {
            let input = NewEvent {
                title,
                description,
                start_date: start,
                end_date: end,
                location_id,
                location,
            };
            create(ctx, &input).await
        }
        EventsAction::Delete { id, yes } => delete(ctx, &id, yes).await,
    }
}

async fn list(ctx: &Context, json: bool) -> Result<()> {
    if !ctx.navigate("/events") {
        return Ok(());
    }

    let events = match ctx.api()?.list_events().await {
        Ok(events) => events,
        Err(e) => return ctx.handle_api_error(e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No events yet.".dimmed());
        return Ok(());
    }

    println!("{}", "Events".bold());
    println!("{}", "─".repeat(60));
    for event in &events {
        println!(
            "  {}  {}  {}",
            event.start_date.cyan(),
            event.title.bold(),
            event.id.dimmed()
        );
    }
    Ok(())
}

async fn show(ctx: &Context, id: &str) -> Result<()> {
    if !ctx.navigate(&event_path(id)) {
        return Ok(());
    }

    match ctx.api()?.get_event(id).await {
        Ok(event) => {
            print_event(&event);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{} Event not found: {}", "✗".red(), id);
            Ok(())
        }
        Err(e) => ctx.handle_api_error(e),
    }
}

async fn create(ctx: &Context, input: &NewEvent) -> Result<()> {
    if !ctx.navigate("/events") {
        return Ok(());
    }

    match ctx.api()?.create_event(input).await {
        Ok(event) => {
            println!("{} Created event {}", "✓".green(), event.id.cyan());
            print_event(&event);
            Ok(())
        }
        Err(e) => ctx.handle_api_error(e),
    }
}

async fn delete(ctx: &Context, id: &str, yes: bool) -> Result<()> {
    if !ctx.navigate(&event_path(id)) {
        return Ok(());
    }

    if !yes
        && !Confirm::new()
            .with_prompt(format!("Delete event {} and all of its feedback?", id))
            .default(false)
            .interact()?
    {
        return Ok(());
    }

    match ctx.api()?.delete_event(id).await {
        Ok(()) => {
            println!("{} Deleted event {}", "✓".green(), id);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{} Event not found: {}", "✗".red(), id);
            Ok(())
        }
        Err(e) => ctx.handle_api_error(e),
    }
}

fn print_event(event: &Event) {
    println!("{}", event.title.bold());
    if event.start_date == event.end_date {
        println!("  Date:     {}", event.start_date);
    } else {
        println!("  Dates:    {} → {}", event.start_date, event.end_date);
    }
    if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
        println!("  Location: {}", location);
    }
    if !event.description.is_empty() {
        println!("  {}", event.description);
    }
}
