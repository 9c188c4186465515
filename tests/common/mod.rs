//! Shared fixtures for integration tests.

#![allow(dead_code)]

use statecraft::{ActionRegistry, ActionScope, MachineConfig, MemoryStore, Store};

/// The nested toggle machine used across the integration tests.
pub const TOGGLE_MACHINE: &str = r#"{
    "id": "machine",
    "initial": "inactive",
    "states": {
        "inactive": {
            "entry": "entry", "exit": "exit",
            "on": { "TOGGLE": "active", "NEXT": "substateA" }
        },
        "active": {
            "entry": "entry", "exit": "exit",
            "on": { "TOGGLE": "inactive", "NEXT": "substateA" }
        },
        "substateA": {
            "entry": "entry", "exit": "exit",
            "on": { "TOGGLE": "active", "NEXT": "inactive" },
            "initial": "substateA1",
            "states": {
                "substateA1": {
                    "entry": "entry", "exit": "exit",
                    "on": { "TOGGLE": "substateA2" }
                },
                "substateA2": {
                    "entry": "entry", "exit": "exit",
                    "on": { "TOGGLE": "substateA1" },
                    "initial": "substateA21",
                    "states": {
                        "substateA21": {
                            "entry": "entry", "exit": "exit",
                            "on": { "TOGGLE": "substateA21" }
                        },
                        "substateA22": {
                            "entry": "entry", "exit": "exit",
                            "on": { "TOGGLE": "substateA22" },
                            "initial": "substateA221",
                            "states": {
                                "substateA221": {
                                    "entry": "entry", "exit": "exit",
                                    "on": { "TOGGLE": "substateA222" }
                                },
                                "substateA222": {
                                    "entry": "entry", "exit": "exit",
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

/// Context that counts entries in a store and records every action run.
#[derive(Debug, Default)]
pub struct Trace {
    pub store: MemoryStore,
    pub log: Vec<String>,
}

impl Trace {
    pub fn entries(&self) -> u32 {
        self.store.get("my_key", 0)
    }

    pub fn entered(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|line| line.strip_prefix("entry "))
            .collect()
    }

    pub fn exited(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|line| line.strip_prefix("exit "))
            .collect()
    }
}

fn record_entry(scope: &mut ActionScope<'_, Trace>) {
    let line = format!("entry {}", scope.node());
    let trace = scope.context();
    let count: u32 = trace.store.get("my_key", 0);
    trace.store.set("my_key", count + 1);
    trace.log.push(line);
}

fn record_exit(scope: &mut ActionScope<'_, Trace>) {
    let line = format!("exit {}", scope.node());
    scope.context().log.push(line);
}

pub fn actions() -> ActionRegistry<Trace> {
    ActionRegistry::<Trace>::new()
        .register("entry", record_entry)
        .register("exit", record_exit)
}

pub fn toggle_machine() -> MachineConfig {
    MachineConfig::from_json(TOGGLE_MACHINE).unwrap()
}
