//! Integration tests for the keybind service over real storage backends.
//!
//! Test coverage:
//! - The bind, rebind, dispatch scenario with the persisted layout checked
//! - Capture through the recorder for a macro still being created
//! - Corrupt storage recovery through the service
//! - Storage failures surface once as `KeybindError::Storage`
//! - Bindings persisted to a JSON file survive a new service instance

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use macro_keybinds_config::PendingConfig;
use macro_keybinds_core::{
    ActionRegistry, CaptureStatus, CaptureToken, ChordRecorder, DispatchOutcome, JsonFileStorage,
    KeyEvent, KeybindError, KeybindService, MacroEntity, MacroRepository, MemoryStorage,
    RawChord, RecorderOutcome, Result, SettingsStorage, StorageError,
};
use serde_json::{Value, json};
use tempfile::TempDir;

const ALICE_KEY: &str = "macro-keybinds.userKeybinds.alice";

#[derive(Default)]
struct Catalog(Mutex<BTreeMap<String, String>>);

impl Catalog {
    fn with(entries: &[(&str, &str)]) -> Self {
        Self(Mutex::new(
            entries
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        ))
    }

    fn create(&self, id: &str, name: &str) {
        self.0.lock().unwrap().insert(id.to_string(), name.to_string());
    }
}

impl MacroRepository for Catalog {
    async fn get(&self, action_id: &str) -> Result<Option<MacroEntity>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .get(action_id)
            .map(|name| MacroEntity::new(action_id, name.clone())))
    }

    async fn list(&self) -> Result<Vec<MacroEntity>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .map(|(id, name)| MacroEntity::new(id.clone(), name.clone()))
            .collect())
    }
}

/// Registry that runs anything and records what ran.
#[derive(Default)]
struct Executor(Mutex<Vec<String>>);

impl ActionRegistry for Executor {
    fn invoke(&self, action_id: &str) -> Result<()> {
        self.0.lock().unwrap().push(action_id.to_string());
        Ok(())
    }
}

/// Storage that reads fine but refuses every write.
struct FailingStorage;

impl SettingsStorage for FailingStorage {
    async fn get(&self, _key: &str) -> std::result::Result<Option<Value>, StorageError> {
        Ok(Some(json!({})))
    }

    async fn set(&self, _key: &str, _value: Value) -> std::result::Result<(), StorageError> {
        Err(StorageError::Backend("quota exceeded".to_string()))
    }
}

fn pending_config() -> PendingConfig {
    PendingConfig {
        expiry: Duration::from_secs(30),
        capacity: 8,
    }
}

fn shift_c() -> RawChord {
    RawChord::new("KeyC", vec!["ShiftLeft".to_string()])
}

#[tokio::test]
async fn test_bind_rebind_dispatch_scenario() {
    let storage = Arc::new(MemoryStorage::new());
    let service = KeybindService::new(
        Arc::clone(&storage),
        Catalog::with(&[("m1", "Fireball"), ("m2", "Heal")]),
        Executor::default(),
        pending_config(),
    );

    service
        .capture_chord("alice", Some("m1"), None, &shift_c())
        .await
        .unwrap();

    let stored = storage.get(ALICE_KEY).await.unwrap().unwrap();
    assert_eq!(stored["m1"]["key"], "KeyC");
    assert_eq!(stored["m1"]["modifiers"], json!(["SHIFT"]));
    assert_eq!(stored["m1"]["displayString"], "SHIFT+C");

    let outcome = service
        .capture_chord("alice", Some("m2"), None, &shift_c())
        .await
        .unwrap();
    assert_eq!(outcome.evicted, vec!["m1".to_string()]);

    let stored = storage.get(ALICE_KEY).await.unwrap().unwrap();
    assert!(stored.get("m1").is_none());
    assert_eq!(stored["m2"]["displayString"], "SHIFT+C");

    let dispatched = service.dispatch(&shift_c(), "alice").await.unwrap();
    assert_eq!(
        dispatched,
        DispatchOutcome::Invoked {
            action_id: "m2".to_string()
        }
    );
}

#[tokio::test]
async fn test_recorder_capture_for_macro_being_created() {
    let catalog = Catalog::default();
    let service = KeybindService::new(
        Arc::new(MemoryStorage::new()),
        catalog,
        Executor::default(),
        pending_config(),
    );
    let token = CaptureToken::new();

    let mut recorder = ChordRecorder::new();
    recorder.on_event(KeyEvent::down("ControlLeft"));
    let RecorderOutcome::Captured(raw) = recorder.on_event(KeyEvent::down("Digit7").with_key("7"))
    else {
        panic!("expected a captured chord");
    };

    let outcome = service
        .capture_chord("alice", None, Some(&token), &raw)
        .await
        .unwrap();
    assert!(matches!(outcome.status, CaptureStatus::Pending { .. }));
    assert_eq!(outcome.chord.display_string(), "CONTROL+7");

    service.repository().create("m7", "Summon");
    let applied = service
        .reconcile_on_create(Some(&token), "m7", "Summon", "alice")
        .await
        .unwrap()
        .unwrap();
    assert!(applied.set.get("m7").is_some());

    let observed = RawChord::new("Digit7", vec!["ControlRight".to_string()]);
    let dispatched = service.dispatch(&observed, "alice").await.unwrap();
    assert_eq!(
        dispatched,
        DispatchOutcome::Invoked {
            action_id: "m7".to_string()
        }
    );
}

#[tokio::test]
async fn test_corrupt_storage_recovers_through_service() {
    let storage = Arc::new(MemoryStorage::with_value(ALICE_KEY, json!(["not", "a", "map"])));
    let service = KeybindService::new(
        Arc::clone(&storage),
        Catalog::default(),
        Executor::default(),
        pending_config(),
    );

    assert!(service.bindings("alice").await.unwrap().is_empty());
    assert_eq!(storage.get(ALICE_KEY).await.unwrap(), Some(json!({})));
}

#[tokio::test]
async fn test_storage_failure_is_reported_once() {
    let service = KeybindService::new(
        Arc::new(FailingStorage),
        Catalog::with(&[("m1", "Fireball")]),
        Executor::default(),
        pending_config(),
    );

    let err = service
        .capture_chord("alice", Some("m1"), None, &shift_c())
        .await
        .unwrap_err();

    assert!(matches!(err, KeybindError::Storage(_)));
}

#[tokio::test]
async fn test_file_storage_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keybinds.json");

    {
        let service = KeybindService::new(
            Arc::new(JsonFileStorage::new(&path)),
            Catalog::with(&[("m1", "Fireball")]),
            Executor::default(),
            pending_config(),
        );
        service
            .capture_chord("alice", Some("m1"), None, &shift_c())
            .await
            .unwrap();
    }

    let service = KeybindService::new(
        Arc::new(JsonFileStorage::new(&path)),
        Catalog::with(&[("m1", "Fireball")]),
        Executor::default(),
        pending_config(),
    );
    let bindings = service.bindings("alice").await.unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].chord.display_string(), "SHIFT+C");
    assert!(service.bindings("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_legacy_stored_entries_dispatch() {
    let storage = Arc::new(MemoryStorage::with_value(
        ALICE_KEY,
        json!({
            "m1": {"key": "KeyC", "modifiers": ["SHIFT"], "keybind": "SHIFT+C", "name": "Fireball", "userId": "alice"}
        }),
    ));
    let service = KeybindService::new(
        storage,
        Catalog::default(),
        Executor::default(),
        pending_config(),
    );

    let dispatched = service.dispatch(&shift_c(), "alice").await.unwrap();
    assert_eq!(
        dispatched,
        DispatchOutcome::Invoked {
            action_id: "m1".to_string()
        }
    );
}
