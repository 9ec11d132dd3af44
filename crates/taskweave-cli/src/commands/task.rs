//! Task subcommands: submit, feedback, show, list.

use anyhow::Result;

use taskweave_application::{FeedbackRequest, TaskService};

/// Submits a task and prints the suspended state.
pub async fn submit(service: &TaskService, task: &str) -> Result<()> {
    let state = service.submit(task).await;

    println!("Task submitted: {}", state.task_id);
    println!("Status: {}", state.status);
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Attaches feedback and prints the resumed state.
pub async fn feedback(
    service: &TaskService,
    task_id: &str,
    request: FeedbackRequest,
) -> Result<()> {
    let state = service.submit_feedback(task_id, request).await?;

    println!("Task {}: {}", state.task_id, state.status);
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Prints a stored snapshot.
pub async fn show(service: &TaskService, task_id: &str) -> Result<()> {
    let snapshot = service.get(task_id).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Prints one line per stored task.
pub async fn list(service: &TaskService) -> Result<()> {
    let summaries = service.list().await?;
    if summaries.is_empty() {
        println!("No tasks stored.");
        return Ok(());
    }

    for summary in summaries {
        let status = summary.status.to_string();
        println!(
            "{}  {:<24} {}  {}",
            summary.task_id, status, summary.last_updated, summary.task_description
        );
    }
    Ok(())
}
