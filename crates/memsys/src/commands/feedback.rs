//! Feedback submission commands (public).

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Select};
use memsys_core::report::{Category, RatingSubmission, MAX_RATING, MIN_RATING};
use memsys_core::types::{NewOrganizerFeedback, NewParticipantFeedback};

use super::Context;
use crate::api::{ApiClient, ORGANIZER_FORM_PATH, PARTICIPANT_FORM_PATH};
use crate::cli::FeedbackAction;
use crate::error::ApiError;

pub async fn execute(action: FeedbackAction, ctx: &Context) -> Result<()> {
    match action {
        FeedbackAction::Participant {
            event,
            art,
            food,
            group,
            conversations,
            comments,
            name,
            email,
        } => {
            if !ctx.navigate(PARTICIPANT_FORM_PATH) {
                return Ok(());
            }
            let api = ctx.api()?;
            let Some(event_id) = choose_event(&api, PARTICIPANT_FORM_PATH, event).await? else {
                return Ok(());
            };

            let submission = RatingSubmission {
                event_id,
                art: rating(Category::Art, art)?,
                food: rating(Category::Food, food)?,
                group: rating(Category::Group, group)?,
                conversations: rating(Category::Conversations, conversations)?,
                comments,
            };
            if let Err(msg) = submission.validate() {
                bail!(msg);
            }

            let input = NewParticipantFeedback {
                name,
                email,
                submission,
            };
            report_submission(ctx, api.submit_participant(&input).await)
        }
        FeedbackAction::Organizer {
            event,
            organizer_name,
            expenses,
            volunteers,
            challenges,
            suggestions,
        } => {
            if !ctx.navigate(ORGANIZER_FORM_PATH) {
                return Ok(());
            }
            let api = ctx.api()?;
            let Some(event_id) = choose_event(&api, ORGANIZER_FORM_PATH, event).await? else {
                return Ok(());
            };

            let input = NewOrganizerFeedback {
                event_id,
                organizer_name,
                total_expenses: expenses,
                volunteers,
                challenges,
                suggestions,
            };
            report_submission(ctx, api.submit_organizer(&input).await)
        }
    }
}

/// Use the given event ID, or let the user pick from the form's event list
async fn choose_event(
    api: &ApiClient,
    form_path: &str,
    event: Option<String>,
) -> Result<Option<String>> {
    if let Some(event) = event {
        return Ok(Some(event));
    }

    let events = api.feedback_events(form_path).await?;
    if events.is_empty() {
        println!("{}", "No events to give feedback on.".dimmed());
        return Ok(None);
    }

    let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
    let index = Select::new()
        .with_prompt("Event")
        .items(&titles)
        .default(0)
        .interact()?;
    Ok(Some(events[index].id.clone()))
}

fn rating(category: Category, given: Option<i32>) -> Result<i32> {
    if let Some(value) = given {
        return Ok(value);
    }

    let value = Input::<i32>::new()
        .with_prompt(format!(
            "How much did you enjoy the {} ({}-{})",
            category, MIN_RATING, MAX_RATING
        ))
        .validate_with(|v: &i32| {
            if (MIN_RATING..=MAX_RATING).contains(v) {
                Ok(())
            } else {
                Err(format!("enter a number from {} to {}", MIN_RATING, MAX_RATING))
            }
        })
        .interact_text()?;
    Ok(value)
}

fn report_submission(
    ctx: &Context,
    result: Result<crate::api::Submitted, ApiError>,
) -> Result<()> {
    match result {
        Ok(submitted) => {
            println!("{} Thank you for your feedback!", "✓".green());
            println!("  Recorded as {}", submitted.id.dimmed());
            Ok(())
        }
        Err(ApiError::Status {
            status: 400 | 404,
            message,
        }) => {
            println!("{} {}", "✗".red(), message);
            Ok(())
        }
        Err(e) => ctx.handle_api_error(e),
    }
}
