//! End-to-end scenarios driving the nested toggle machine.

mod common;

use common::{actions, toggle_machine, Trace};
use statecraft::{
    ActionRegistry, Interpreter, MachineConfig, MachineError, MemoryStore, StateNode, Status,
    Store,
};
use std::sync::{Arc, Mutex};

fn machine(config: &MachineConfig) -> Interpreter<Trace> {
    Interpreter::from_config(config, Trace::default(), &actions()).unwrap()
}

fn dotted(machine: &Interpreter<Trace>) -> String {
    machine.state().map(|v| v.as_dotted()).unwrap_or_default()
}

#[test]
fn flat_substates_follow_next_toggle_next() {
    let leaf = |id: &str| StateNode::builder(id).entry("count").build().unwrap();
    let root = StateNode::builder("machine")
        .initial("inactive")
        .state(
            StateNode::builder("inactive")
                .entry("count")
                .on("NEXT", "substateA")
                .build()
                .unwrap(),
        )
        .state(leaf("active"))
        .state(
            StateNode::builder("substateA")
                .initial("substateA1")
                .entry("count")
                .on("NEXT", "inactive")
                .state(
                    StateNode::builder("substateA1")
                        .entry("count")
                        .on("TOGGLE", "substateA2")
                        .build()
                        .unwrap(),
                )
                .state(
                    StateNode::builder("substateA2")
                        .entry("count")
                        .on("TOGGLE", "substateA1")
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let mut machine = Interpreter::builder(root, MemoryStore::new())
        .action("count", |scope| {
            let count: u32 = scope.context().get("my_key", 0);
            scope.context().set("my_key", count + 1);
        })
        .build()
        .unwrap();

    assert_eq!(machine.start().unwrap().as_dotted(), "inactive");
    assert_eq!(machine.send("NEXT").unwrap().as_dotted(), "substateA.substateA1");
    assert_eq!(machine.send("TOGGLE").unwrap().as_dotted(), "substateA.substateA2");
    assert_eq!(machine.send("NEXT").unwrap().as_dotted(), "inactive");

    // inactive, substateA + substateA1, substateA2, inactive
    assert_eq!(machine.context().get("my_key", 0u32), 5);
}

#[test]
fn default_start_runs_through_nested_defaults() {
    let mut machine = machine(&toggle_machine());

    machine.start().unwrap();
    assert_eq!(dotted(&machine), "inactive");

    machine.send("NEXT").unwrap();
    assert_eq!(dotted(&machine), "substateA.substateA1");

    machine.send("TOGGLE").unwrap();
    assert_eq!(dotted(&machine), "substateA.substateA2.substateA21");

    machine.send("NEXT").unwrap();
    assert_eq!(dotted(&machine), "inactive");

    assert_eq!(machine.context().entries(), 6);
    assert_eq!(
        machine.context().exited(),
        vec![
            "inactive",
            "substateA.substateA1",
            "substateA.substateA2.substateA21",
            "substateA.substateA2",
            "substateA",
        ]
    );
}

#[test]
fn start_path_overrides_default_but_keeps_defaults_below_it() {
    let config = toggle_machine().with_start_path("substateA.substateA2");
    let mut machine = machine(&config);

    let value = machine.start().unwrap();
    assert_eq!(value.as_dotted(), "substateA.substateA2.substateA21");
    assert_eq!(
        machine.context().entered(),
        vec![
            "substateA",
            "substateA.substateA2",
            "substateA.substateA2.substateA21",
        ]
    );
}

#[test]
fn deep_start_path_replays_the_demo_run() {
    let config = toggle_machine().with_start_path("substateA.substateA2.substateA22.substateA222");
    let mut machine = machine(&config);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    machine.on_transition(move |value, event| {
        sink.lock().unwrap().push(format!("{event} -> {value}"));
    });

    machine.start().unwrap();
    machine.send("NEXT").unwrap();
    machine.send("TOGGLE").unwrap();
    machine.send("NEXT").unwrap();

    let deep = "substateA.substateA2.substateA22.substateA222";
    assert_eq!(dotted(&machine), deep);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            format!("init -> {deep}"),
            "NEXT -> inactive".to_string(),
            "TOGGLE -> active".to_string(),
            format!("NEXT -> {deep}"),
        ]
    );
    assert_eq!(machine.context().entries(), 10);
    assert_eq!(
        machine.context().log[4..9],
        [
            "exit substateA.substateA2.substateA22.substateA222",
            "exit substateA.substateA2.substateA22",
            "exit substateA.substateA2",
            "exit substateA",
            "entry inactive",
        ]
    );
}

#[test]
fn counter_matches_entries_for_single_state_transitions() {
    let mut machine = machine(&toggle_machine());
    machine.start().unwrap();

    let transitions = 7;
    for _ in 0..transitions {
        machine.send("TOGGLE").unwrap();
    }

    assert_eq!(machine.context().entries(), transitions + 1);
    assert_eq!(dotted(&machine), "active");
}

#[test]
fn self_transition_exits_and_reenters_the_leaf() {
    let config = toggle_machine().with_start_path("substateA.substateA2.substateA21");
    let mut machine = machine(&config);
    let before = machine.start().unwrap();
    let entries = machine.context().entries();

    let after = machine.send("TOGGLE").unwrap();
    assert_eq!(after, before);
    assert_eq!(machine.context().entries(), entries + 1);
    assert_eq!(
        machine.context().log[machine.context().log.len() - 2..],
        [
            "exit substateA.substateA2.substateA21",
            "entry substateA.substateA2.substateA21",
        ]
    );

    let history = machine.history().unwrap();
    assert_eq!(history.value, before);
    assert_eq!(history.event, "TOGGLE");
}

#[test]
fn innermost_handler_wins_over_ancestors() {
    let config = toggle_machine().with_start_path("substateA.substateA2.substateA22.substateA221");
    let mut machine = machine(&config);
    machine.start().unwrap();

    // substateA221 handles TOGGLE before substateA22, substateA2 or substateA
    let value = machine.send("TOGGLE").unwrap();
    assert_eq!(value.as_dotted(), "substateA.substateA2.substateA22.substateA222");
    assert!(machine.matches("substateA.substateA2"));
}

#[test]
fn unhandled_event_leaves_machine_untouched() {
    let mut machine = machine(&toggle_machine());
    machine.start().unwrap();

    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    machine.on_transition(move |_, _| *counter.lock().unwrap() += 1);

    let err = machine.send("UNKNOWN").unwrap_err();
    assert_eq!(
        err,
        MachineError::NoMatchingTransition {
            event: "UNKNOWN".to_string(),
            state: "inactive".to_string(),
        }
    );
    assert!(err.is_recoverable());
    assert_eq!(dotted(&machine), "inactive");
    assert_eq!(machine.context().entries(), 1);
    assert!(machine.history().is_none());
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn next_events_include_ancestor_handlers() {
    let config = toggle_machine().with_start_path("substateA.substateA1");
    let mut machine = machine(&config);
    machine.start().unwrap();

    assert_eq!(machine.next_events(), vec!["NEXT", "TOGGLE"]);
    assert!(machine.can("NEXT"));
    assert!(!machine.can("RESET"));
}

#[test]
fn stop_then_restart_reenters_initial_configuration() {
    let mut machine = machine(&toggle_machine());
    machine.start().unwrap();
    machine.send("NEXT").unwrap();

    machine.stop();
    assert_eq!(machine.status(), Status::Stopped);
    assert_eq!(dotted(&machine), "substateA.substateA1");
    assert_eq!(machine.send("TOGGLE"), Err(MachineError::NotRunning));

    assert_eq!(machine.start().unwrap().as_dotted(), "inactive");
    assert!(machine.history().is_none());
    assert_eq!(machine.start(), Err(MachineError::AlreadyRunning));
}

#[test]
fn missing_action_is_reported_before_start() {
    let only_entry = ActionRegistry::<Trace>::new().register("entry", |_| {});
    let err = Interpreter::from_config(&toggle_machine(), Trace::default(), &only_entry).unwrap_err();

    assert!(!err.errors().is_empty());
    assert!(err
        .errors()
        .iter()
        .all(|e| matches!(e, MachineError::UnknownAction { action, .. } if action == "exit")));
}

#[test]
fn unknown_start_path_is_rejected() {
    let config = toggle_machine().with_start_path("substateA.substateA9");
    let err = Interpreter::from_config(&config, Trace::default(), &actions()).unwrap_err();
    assert_eq!(
        err,
        MachineError::UnknownState {
            path: "substateA.substateA9".to_string()
        }
    );
}
