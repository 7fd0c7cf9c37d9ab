//! Document Approval Workflow
//!
//! This example demonstrates a multi-stage approval workflow driven through
//! the services.
//!
//! Key concepts:
//! - Multi-stage workflow (Draft -> Review -> Approved -> Published)
//! - A multi-source action (Reject fires from Review and Approved)
//! - Final states are absorbing (Published and Rejected)
//! - Rejected definitions and actions are reported, never persisted
//!
//! Run with: cargo run --example document_workflow
//!
//! Storage and logging follow `EngineConfig`; for example
//! `WORKFLOW_ENGINE__STORAGE__BACKEND=file WORKFLOW_ENGINE__STORAGE__DATA_DIR=/tmp/docs`
//! keeps the JSON files around after the run.

use stillwater::validation::Validation;
use waymark::builder::DefinitionBuilder;
use waymark::config::{EngineConfig, StorageBackend};
use waymark::service::{DefinitionService, InstanceService};
use waymark::telemetry::init_tracing;
use waymark::validation::audit_definition;
use waymark::{EngineError, WorkflowDefinition};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::load(None)?;
    if std::env::var_os("WORKFLOW_ENGINE__STORAGE__BACKEND").is_none() {
        config.storage.backend = StorageBackend::Memory;
    }
    init_tracing(&config.logging)?;

    let store = config.storage.open_store().await?;
    let definitions = DefinitionService::new(store.clone());
    let instances = InstanceService::new(store);

    println!("=== Document Approval Workflow ===\n");

    // A broken draft of the workflow: every problem is listed at once.
    let broken = DefinitionBuilder::new("Document approval")
        .state("draft", "Draft")
        .final_state("published", "Published")
        .action("publish", "Publish", ["review"], "published")
        .build();
    let preview = WorkflowDefinition {
        id: String::new(),
        name: broken.name.clone(),
        states: broken.states.clone(),
        actions: broken.actions.clone(),
        created_at: chrono::Utc::now(),
        description: None,
    };
    if let Validation::Failure(violations) = audit_definition(&preview) {
        println!("Audit of the first draft found:");
        for violation in violations.iter() {
            println!("  - {violation}");
        }
    }
    match definitions.create_definition(broken).await {
        Err(EngineError::Validation(err)) => println!("Creation rejected: {err}\n"),
        other => println!("Unexpected result: {other:?}\n"),
    }

    let request = DefinitionBuilder::new("Document approval")
        .description("Draft, review, approve and publish a document")
        .initial_state("draft", "Draft")
        .state("review", "In review")
        .state("approved", "Approved")
        .final_state("published", "Published")
        .final_state("rejected", "Rejected")
        .action("submit", "Submit for review", ["draft"], "review")
        .action("revise", "Send back to draft", ["review"], "draft")
        .action("approve", "Approve", ["review"], "approved")
        .action("reject", "Reject", ["review", "approved"], "rejected")
        .action("publish", "Publish", ["approved"], "published")
        .build();
    let definition = definitions.create_definition(request).await?;
    println!("Created definition '{}' ({})", definition.name, definition.id);

    let doc = instances.start_instance(&definition.id).await?;
    println!("Document {} starts in {}", doc.id, doc.current_state_id);

    for action in ["submit", "revise", "submit", "approve", "publish"] {
        let doc = instances.execute_action(&doc.id, action).await?;
        println!("  {action:<8} -> {}", doc.current_state_id);
    }

    match instances.execute_action(&doc.id, "reject").await {
        Err(err) => println!("\nReject after publishing: {err}"),
        Ok(_) => println!("\nReject after publishing unexpectedly succeeded"),
    }

    let doc = instances
        .get_instance(&doc.id)
        .await?
        .ok_or("document vanished")?;
    println!("\n=== Audit trail ===");
    for record in doc.history.records() {
        println!(
            "  {} {:<8} {} -> {}",
            record.executed_at.format("%H:%M:%S%.3f"),
            record.action_id,
            record.from_state_id,
            record.to_state_id
        );
    }
    println!("Path: {}", doc.history.path().join(" -> "));
    println!("Completed: {}", doc.is_completed());

    Ok(())
}
