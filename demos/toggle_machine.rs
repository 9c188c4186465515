//! Toggle Machine
//!
//! This example drives a nested statechart from a JSON definition,
//! starting deep inside the hierarchy instead of at the default state.
//!
//! Key concepts:
//! - Declarative machine definitions with a start path
//! - Named entry/exit actions sharing a key-value store
//! - Bubbling events to the closest handling ancestor
//! - Transition listeners
//!
//! Run with: cargo run --example toggle_machine

use statecraft::{ActionRegistry, Interpreter, MachineConfig, MemoryStore, Store};

const DEFINITION: &str = r#"{
    "id": "machine",
    "initial": "inactive",
    "states": {
        "inactive": {
            "entry": "entry",
            "exit": "exit",
            "on": { "TOGGLE": "active", "NEXT": "substateA" }
        },
        "active": {
            "entry": "entry",
            "exit": "exit",
            "on": { "TOGGLE": "inactive", "NEXT": "substateA" }
        },
        "substateA": {
            "entry": "entry",
            "exit": "exit",
            "on": { "TOGGLE": "active", "NEXT": "inactive" },
            "initial": "substateA1",
            "states": {
                "substateA1": {
                    "entry": "entry",
                    "exit": "exit",
                    "on": { "TOGGLE": "substateA2" }
                },
                "substateA2": {
                    "entry": "entry",
                    "exit": "exit",
                    "on": { "TOGGLE": "substateA1" },
                    "initial": "substateA21",
                    "states": {
                        "substateA21": {
                            "entry": "entry",
                            "exit": "exit",
                            "on": { "TOGGLE": "substateA21" }
                        },
                        "substateA22": {
                            "entry": "entry",
                            "exit": "exit",
                            "on": { "TOGGLE": "substateA22" },
                            "initial": "substateA221",
                            "states": {
                                "substateA221": {
                                    "entry": "entry",
                                    "exit": "exit",
                                    "on": { "TOGGLE": "substateA222" }
                                },
                                "substateA222": {
                                    "entry": "entry",
                                    "exit": "exit",
                                    "on": { "TOGGLE": "substateA221" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}"#;

fn actions() -> ActionRegistry<MemoryStore> {
    ActionRegistry::<MemoryStore>::new()
        .register("entry", |scope| {
            let count: u32 = scope.context().get("my_key", 0);
            scope.context().set("my_key", count + 1);
            println!("entry() - {}", scope.state().to_nested());
        })
        .register("exit", |scope| {
            if let Some(history) = scope.history() {
                println!("exit() - {}", history.value.to_nested());
            }
            let count: u32 = scope.context().get("my_key", 0);
            println!("{count}");
        })
}

fn main() -> Result<(), statecraft::MachineError> {
    println!("=== Toggle Machine Example ===\n");

    let config = MachineConfig::from_json(DEFINITION)?
        .with_start_path("substateA.substateA2.substateA22.substateA222");

    let mut machine = Interpreter::from_config(&config, MemoryStore::new(), &actions())?;
    machine.on_transition(|value, event| {
        println!("onTransition() - {event} -> {}", value.to_nested());
    });

    println!("=== START ===");
    machine.start()?;

    for event in ["NEXT", "TOGGLE", "NEXT"] {
        println!("=== {event} ===");
        machine.send(event)?;
    }

    println!("=== END ===");
    println!("\nFinal state: {}", machine.state().map(|v| v.as_dotted()).unwrap_or_default());
    println!("Entries counted: {}", machine.context().get("my_key", 0u32));

    println!("\n=== Example Complete ===");
    Ok(())
}
