//! Integration tests for the macro-keybinds binary.
//!
//! These tests run the binary against a temporary storage file and check
//! stdout, the persisted layout and structured exit codes.

mod common;

use common::Workspace;
use predicates::prelude::*;

fn add_macro(ws: &Workspace, id: &str, name: &str) {
    ws.cmd().args(["macros", "add", id, name]).assert().success();
}

#[test]
fn test_bind_rebind_dispatch() {
    let ws = Workspace::new();
    add_macro(&ws, "m1", "Fireball");
    add_macro(&ws, "m2", "Heal");

    ws.cmd()
        .args(["bind", "m1", "shift+c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bound SHIFT+C to m1"));

    let stored = ws.stored();
    let m1 = &stored["macro-keybinds.userKeybinds.alice"]["m1"];
    assert_eq!(m1["key"], "KeyC");
    assert_eq!(m1["modifiers"], serde_json::json!(["SHIFT"]));
    assert_eq!(m1["displayString"], "SHIFT+C");

    ws.cmd()
        .args(["bind", "m2", "Shift+C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed chord from m1"));

    let stored = ws.stored();
    let bindings = &stored["macro-keybinds.userKeybinds.alice"];
    assert!(bindings.get("m1").is_none());
    assert_eq!(bindings["m2"]["displayString"], "SHIFT+C");

    ws.cmd()
        .args(["dispatch", "SHIFT+C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ran m2 (Heal)"));
}

#[test]
fn test_add_with_chord_binds_new_macro() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["macros", "add", "m1", "Summon", "--chord", "ctrl+7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bound to CONTROL+7"));

    let output = ws
        .cmd()
        .args(["list", "--output", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(rows[0]["actionId"], "m1");
    assert_eq!(rows[0]["label"], "Summon");
    assert_eq!(rows[0]["displayString"], "CONTROL+7");
}

#[test]
fn test_dispatch_unbound_chord_is_noop() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["dispatch", "F5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No macro bound to F5"));
}

#[test]
fn test_dispatch_evicts_binding_of_removed_macro() {
    let ws = Workspace::new();
    add_macro(&ws, "m1", "Fireball");
    ws.cmd().args(["bind", "m1", "k"]).assert().success();

    // Drop the macro from the catalog behind the binding's back.
    let mut stored = ws.stored();
    stored["macro-keybinds.macros"] = serde_json::json!({});
    std::fs::write(ws.storage_path(), stored.to_string()).unwrap();

    ws.cmd()
        .args(["dispatch", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no longer exists"));

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bindings found."));
}

#[test]
fn test_rename_updates_label_and_remove_unbinds() {
    let ws = Workspace::new();
    add_macro(&ws, "m1", "Fireball");
    ws.cmd().args(["bind", "m1", "alt+f"]).assert().success();

    ws.cmd().args(["macros", "rename", "m1", "Inferno"]).assert().success();
    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("m1\tInferno\tALT+F"));

    ws.cmd()
        .args(["macros", "remove", "m1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("and its binding"));
}

#[test]
fn test_owners_do_not_share_bindings() {
    let ws = Workspace::new();
    add_macro(&ws, "m1", "Fireball");
    ws.cmd().args(["bind", "m1", "shift+c"]).assert().success();

    ws.cmd()
        .args(["--owner", "bob", "dispatch", "shift+c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No macro bound"));
}

#[test]
fn test_corrupt_storage_recovers() {
    let ws = Workspace::new();
    std::fs::write(ws.storage_path(), "[\"not\", \"an\", \"object\"]").unwrap();

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bindings found."));

    let stored = ws.stored();
    assert_eq!(
        stored["macro-keybinds.userKeybinds.alice"],
        serde_json::json!({})
    );
}

#[test]
fn test_sync_reports_changes() {
    let ws = Workspace::new();
    add_macro(&ws, "m1", "Fireball");
    ws.cmd().args(["bind", "m1", "q"]).assert().success();

    let mut stored = ws.stored();
    stored["macro-keybinds.macros"] = serde_json::json!({});
    std::fs::write(ws.storage_path(), stored.to_string()).unwrap();

    ws.cmd()
        .args(["sync", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"m1\""));

    ws.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("already in sync"));
}

#[test]
fn test_hotbar_disable_and_enable() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["hotbar", "--disable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Suppressed 10"));
    assert_eq!(
        ws.stored()["macro-keybinds.suppressedHotbar"]
            .as_array()
            .map(Vec::len),
        Some(10)
    );

    ws.cmd().args(["hotbar", "--enable"]).assert().success();
    assert_eq!(
        ws.stored()["macro-keybinds.suppressedHotbar"],
        serde_json::json!([])
    );
}

#[test]
fn test_normalize_prints_canonical_form() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["normalize", "cmd+shift+p", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"displayString\": \"SHIFT+META+P\""))
        .stdout(predicate::str::contains("\"key\": \"KeyP\""));
}

#[test]
fn test_invalid_chord_returns_exit_code_5() {
    let ws = Workspace::new();
    add_macro(&ws, "m1", "Fireball");
    ws.cmd()
        .args(["bind", "m1", "ctrl+shift"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid chord"));
}

#[test]
fn test_unknown_macro_returns_exit_code_4() {
    let ws = Workspace::new();
    ws.cmd().args(["bind", "ghost", "k"]).assert().code(4);
    ws.cmd().args(["macros", "remove", "ghost"]).assert().code(4);
}

#[test]
fn test_duplicate_macro_returns_exit_code_5() {
    let ws = Workspace::new();
    add_macro(&ws, "m1", "Fireball");
    ws.cmd().args(["macros", "add", "m1", "Again"]).assert().code(5);
}

#[test]
fn test_invalid_output_format_returns_exit_code_5() {
    let ws = Workspace::new();
    ws.cmd().args(["list", "--output", "xml"]).assert().code(5);
}

#[test]
fn test_storage_failure_returns_exit_code_6() {
    let ws = Workspace::new();
    // A directory where the storage file should be makes reads fail.
    std::fs::create_dir_all(ws.storage_path()).unwrap();
    ws.cmd().arg("list").assert().code(6);
}

#[test]
fn test_invalid_pending_capacity_returns_exit_code_5() {
    let ws = Workspace::new();
    ws.cmd()
        .env("MACRO_KEYBINDS_PENDING_CAPACITY", "0")
        .arg("list")
        .assert()
        .code(5);
}
