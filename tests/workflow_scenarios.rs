//! End-to-end workflow scenarios against the bundled stores.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use waymark::builder::DefinitionBuilder;
use waymark::core::{WorkflowDefinition, WorkflowInstance};
use waymark::error::{EngineError, ValidationError};
use waymark::service::{CreateDefinitionRequest, DefinitionService, InstanceService};
use waymark::store::{InMemoryStore, InstanceLease, JsonFileStore, StoreError, WorkflowStore};
use waymark::validation::{validate_definition, ExecutionError};

/// A → B → C, with C final.
fn linear_request() -> CreateDefinitionRequest {
    DefinitionBuilder::new("Linear")
        .initial_state("A", "A")
        .state("B", "B")
        .final_state("C", "C")
        .action("a1", "a1", ["A"], "B")
        .action("a2", "a2", ["B"], "C")
        .build()
}

/// Store wrapper counting writes.
struct CountingStore<S> {
    inner: S,
    saves: AtomicUsize,
}

impl<S> CountingStore<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            saves: AtomicUsize::new(0),
        }
    }

    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: WorkflowStore> WorkflowStore for CountingStore<S> {
    async fn save_definition(&self, definition: &WorkflowDefinition) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_definition(definition).await
    }

    async fn get_definition(&self, id: &str) -> Result<Option<WorkflowDefinition>, StoreError> {
        self.inner.get_definition(id).await
    }

    async fn get_all_definitions(&self) -> Result<Vec<WorkflowDefinition>, StoreError> {
        self.inner.get_all_definitions().await
    }

    async fn save_instance(&self, instance: &WorkflowInstance) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_instance(instance).await
    }

    async fn get_instance(&self, id: &str) -> Result<Option<WorkflowInstance>, StoreError> {
        self.inner.get_instance(id).await
    }

    async fn get_all_instances(&self) -> Result<Vec<WorkflowInstance>, StoreError> {
        self.inner.get_all_instances().await
    }

    async fn lock_instance(&self, id: &str) -> InstanceLease {
        self.inner.lock_instance(id).await
    }
}

async fn run_linear_scenario<S: WorkflowStore + ?Sized>(store: Arc<S>) {
    let definitions = DefinitionService::new(Arc::clone(&store));
    let instances = InstanceService::new(store);

    let definition = definitions.create_definition(linear_request()).await.unwrap();

    let instance = instances.start_instance(&definition.id).await.unwrap();
    assert_eq!(instance.current_state_id, "A");
    assert!(instance.history.is_empty());
    assert!(!instance.is_completed());

    let instance = instances.execute_action(&instance.id, "a1").await.unwrap();
    assert_eq!(instance.current_state_id, "B");
    assert_eq!(instance.history.len(), 1);
    let record = &instance.history.records()[0];
    assert_eq!(
        (record.action_id.as_str(), record.from_state_id.as_str(), record.to_state_id.as_str()),
        ("a1", "A", "B")
    );
    assert!(!instance.is_completed());

    let instance = instances.execute_action(&instance.id, "a2").await.unwrap();
    assert_eq!(instance.current_state_id, "C");
    assert_eq!(instance.history.len(), 2);
    assert!(instance.is_completed());
    assert_eq!(instance.history.path(), vec!["A", "B", "C"]);
    let completed_at = instance.completed_at;

    // Neither action lists C as a source, so the source-state rule answers
    // before the final-state rule is reached.
    for action in ["a1", "a2"] {
        let err = instances.execute_action(&instance.id, action).await.unwrap_err();
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::Execution(
                ExecutionError::InvalidSourceState { action: ref fired, ref state }
            )) if fired == action && state == "C"
        ));
        assert_eq!(
            err.to_string(),
            format!("Action '{action}' cannot be executed from current state 'C'")
        );
    }

    let stored = instances.get_instance(&instance.id).await.unwrap().unwrap();
    assert_eq!(stored.completed_at, completed_at);
    assert_eq!(stored.history.len(), 2);
    assert_eq!(instances.get_all_instances().await.unwrap().len(), 1);
}

#[tokio::test]
async fn linear_scenario_in_memory() {
    run_linear_scenario(Arc::new(InMemoryStore::new())).await;
}

#[tokio::test]
async fn linear_scenario_on_json_files() {
    let tmp = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open_dir(tmp.path()).await.unwrap();
    run_linear_scenario(Arc::new(store)).await;
}

#[tokio::test]
async fn linear_scenario_behind_trait_object() {
    let store: Arc<dyn WorkflowStore> = Arc::new(InMemoryStore::new());
    run_linear_scenario(store).await;
}

#[tokio::test]
async fn final_state_rejection_names_the_rule() {
    let store = Arc::new(InMemoryStore::new());
    let definitions = DefinitionService::new(Arc::clone(&store));
    let instances = InstanceService::new(store);

    // The final state lists itself as a source so only the final-state rule can trip.
    let request = DefinitionBuilder::new("Loop")
        .initial_state("A", "A")
        .final_state("C", "C")
        .action("finish", "Finish", ["A"], "C")
        .action("again", "Again", ["C"], "C")
        .build();
    let definition = definitions.create_definition(request).await.unwrap();
    let instance = instances.start_instance(&definition.id).await.unwrap();
    instances.execute_action(&instance.id, "finish").await.unwrap();

    let err = instances.execute_action(&instance.id, "again").await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::Execution(ExecutionError::FinalState { ref state }))
            if state == "C"
    ));
    assert_eq!(err.to_string(), "Cannot execute actions on final state 'C'");
}

#[tokio::test]
async fn rejections_never_write_to_the_store() {
    let store = Arc::new(CountingStore::new(InMemoryStore::new()));
    let definitions = DefinitionService::new(Arc::clone(&store));
    let instances = InstanceService::new(Arc::clone(&store));

    let mut request = linear_request();
    request
        .actions
        .push(waymark::Action::new("off", "Off", ["A"], "C").disabled());
    let definition = definitions.create_definition(request).await.unwrap();
    let instance = instances.start_instance(&definition.id).await.unwrap();
    let writes = store.saves();

    // Disabled, wrong source state, unknown action, unknown instance.
    assert!(instances.execute_action(&instance.id, "off").await.is_err());
    assert!(instances.execute_action(&instance.id, "a2").await.is_err());
    assert!(instances.execute_action(&instance.id, "nope").await.is_err());
    assert!(instances.execute_action("missing", "a1").await.is_err());
    assert_eq!(store.saves(), writes);

    // Invalid definitions are never written either.
    let mut invalid = linear_request();
    invalid.states.clear();
    assert!(definitions.create_definition(invalid).await.is_err());
    assert_eq!(store.saves(), writes);

    instances.execute_action(&instance.id, "a1").await.unwrap();
    assert_eq!(store.saves(), writes + 1);
}

#[tokio::test]
async fn concurrent_executions_fire_once() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::open_dir(tmp.path()).await.unwrap());
    let definitions = DefinitionService::new(Arc::clone(&store));
    let instances = InstanceService::new(store);

    let definition = definitions.create_definition(linear_request()).await.unwrap();
    let instance = instances.start_instance(&definition.id).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let instances = instances.clone();
            let id = instance.id.clone();
            tokio::spawn(async move { instances.execute_action(&id, "a1").await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    let stored = instances.get_instance(&instance.id).await.unwrap().unwrap();
    assert_eq!(stored.current_state_id, "B");
    assert_eq!(stored.history.len(), 1);
}

#[tokio::test]
async fn persisted_definitions_revalidate_after_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let id = {
        let store = Arc::new(JsonFileStore::open_dir(tmp.path()).await.unwrap());
        let definitions = DefinitionService::new(store);
        definitions
            .create_definition(linear_request())
            .await
            .unwrap()
            .id
    };

    let store = Arc::new(JsonFileStore::open_dir(tmp.path()).await.unwrap());
    let definitions = DefinitionService::new(store);
    let loaded = definitions.get_definition(&id).await.unwrap().unwrap();

    assert_eq!(validate_definition(&loaded), Ok(()));
    assert_eq!(loaded.initial_state().unwrap().id, "A");
}

#[tokio::test]
async fn instances_are_independent() {
    let store = Arc::new(InMemoryStore::new());
    let definitions = DefinitionService::new(Arc::clone(&store));
    let instances = InstanceService::new(store);

    let definition = definitions.create_definition(linear_request()).await.unwrap();
    let first = instances.start_instance(&definition.id).await.unwrap();
    let second = instances.start_instance(&definition.id).await.unwrap();

    instances.execute_action(&first.id, "a1").await.unwrap();

    let second = instances.get_instance(&second.id).await.unwrap().unwrap();
    assert_eq!(second.current_state_id, "A");
    assert!(second.history.is_empty());
}

#[tokio::test]
async fn multi_source_action_fires_from_each_source() {
    let store = Arc::new(InMemoryStore::new());
    let definitions = DefinitionService::new(Arc::clone(&store));
    let instances = InstanceService::new(store);

    let request = DefinitionBuilder::new("Support ticket")
        .initial_state("open", "Open")
        .state("waiting", "Waiting on customer")
        .final_state("closed", "Closed")
        .action("wait", "Wait", ["open"], "waiting")
        .action("close", "Close", ["open", "waiting"], "closed")
        .build();
    let definition = definitions.create_definition(request).await.unwrap();

    let direct = instances.start_instance(&definition.id).await.unwrap();
    let direct = instances.execute_action(&direct.id, "close").await.unwrap();
    assert_eq!(direct.history.path(), vec!["open", "closed"]);

    let detour = instances.start_instance(&definition.id).await.unwrap();
    instances.execute_action(&detour.id, "wait").await.unwrap();
    let detour = instances.execute_action(&detour.id, "close").await.unwrap();
    assert_eq!(detour.history.path(), vec!["open", "waiting", "closed"]);
    assert!(detour.is_completed());
}
