//! Feedback report commands.

use anyhow::Result;
use colored::Colorize;
use memsys_core::report::{AggregateReport, Category, NO_FEEDBACK_MESSAGE};
use memsys_core::types::EventReport;

use super::Context;
use crate::api::report_path;

/// List events with their response counts
pub async fn list(ctx: &Context) -> Result<()> {
    if !ctx.navigate("/reports") {
        return Ok(());
    }

    let summaries = match ctx.api()?.list_reports().await {
        Ok(summaries) => summaries,
        Err(e) => return ctx.handle_api_error(e),
    };

    println!("{}", "Reports".bold());
    println!("{}", "─".repeat(60));
    for summary in &summaries {
        println!(
            "  {:>4} responses  {}  {}",
            summary.response_count,
            summary.event.title.bold(),
            summary.event.id.dimmed()
        );
    }
    Ok(())
}

/// Print one event's report
pub async fn show(ctx: &Context, event_id: &str) -> Result<()> {
    if !ctx.navigate(&report_path(event_id)) {
        return Ok(());
    }

    match ctx.api()?.event_report(event_id).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{} Event not found: {}", "✗".red(), event_id);
            Ok(())
        }
        Err(e) => ctx.handle_api_error(e),
    }
}

fn print_report(report: &EventReport) {
    println!("{}", report.event.title.bold());
    if let Some(location) = &report.location {
        println!("  {} ({})", location.name, location.address.dimmed());
    }
    println!("{}", "─".repeat(40));

    match &report.averages {
        Some(averages) => print_averages(averages),
        None => println!("  {}", NO_FEEDBACK_MESSAGE.dimmed()),
    }

    for response in &report.participant_feedback {
        let who = if response.feedback.name.is_empty() {
            "anonymous"
        } else {
            response.feedback.name.as_str()
        };
        println!("  {:.1}  {}", response.average, who);
        if !response.feedback.submission.comments.is_empty() {
            println!("       {}", response.feedback.submission.comments.dimmed());
        }
    }

    if !report.organizer_feedback.is_empty() {
        println!();
        println!("{}", "Organizers".bold());
        for organizer in &report.organizer_feedback {
            println!(
                "  {}  expenses {:.2}  volunteers {}",
                organizer.organizer_name,
                organizer.total_expenses,
                organizer.volunteers.len()
            );
        }
    }
}

fn print_averages(averages: &AggregateReport) {
    for category in Category::ALL {
        println!("  {:<14} {:.1}", category.as_str(), averages.average(category));
    }
    println!(
        "  {:<14} {}",
        "overall",
        format!("{:.1}", averages.overall_average).green().bold()
    );
    println!("  {} responses", averages.response_count);
}
