//! End-to-end journeys through the public API.
//!
//! Journey 1: Policy properties on a configured engine
//! Journey 2: TOML configuration driving the command dispatcher
//! Journey 3: Interactive setup followed by a command session

use chinese_wall::prelude::*;
use std::io::Cursor;

/// Objects 0..6: A owns {0, 2}, B owns {1}, C owns {3}, D owns {4}, 5 unassigned.
/// A and B compete in "banks"; C and D compete in "oil".
fn market() -> ChineseWallEngine {
    WallBuilder::new(3, 6, 4)
        .portfolio("A", [0, 2])
        .portfolio("B", [1])
        .portfolio("C", [3])
        .portfolio("D", [4])
        .conflict("A", "banks")
        .conflict("B", "banks")
        .conflict("C", "oil")
        .conflict("D", "oil")
        .build()
        .unwrap()
}

// ============================================================================
// Journey 1: Policy properties
// ============================================================================

#[test]
fn test_journey_first_access_is_always_free() {
    for subject in 0..3 {
        for object in 0..6 {
            let mut engine = market();
            assert!(
                engine.read(subject, object).unwrap(),
                "first read of object {object} by subject {subject}"
            );
        }
    }
}

#[test]
fn test_journey_granted_access_stays_granted() {
    let mut engine = market();
    let requests = [(0, 0), (0, 1), (0, 3), (0, 4), (0, 2), (1, 4), (1, 3), (1, 5)];

    for (subject, object) in requests {
        if engine.read(subject, object).unwrap() {
            let before = engine.accessed_object_count(subject).unwrap();
            assert!(engine.read(subject, object).unwrap());
            assert!(engine.write(subject, object).unwrap());
            assert_eq!(engine.accessed_object_count(subject).unwrap(), before);
        }
    }
}

#[test]
fn test_journey_wall_per_conflict_class() {
    let mut engine = market();

    assert!(engine.read(0, 0).unwrap()); // A
    assert!(engine.read(0, 3).unwrap()); // C, other class
    assert!(!engine.read(0, 1).unwrap()); // B competes with A
    assert!(!engine.write(0, 4).unwrap()); // D competes with C
    assert!(engine.read(0, 2).unwrap()); // more of A
    assert!(engine.read(0, 5).unwrap()); // unlabelled

    assert_eq!(engine.accessed_objects(0).unwrap(), vec![0, 2, 3, 5]);
    assert_eq!(engine.accessing_subject_count(1).unwrap(), 0);
}

#[test]
fn test_journey_epoch_reset_lifts_refusals() {
    let mut engine = market();
    engine.read(2, 1).unwrap();
    assert!(!engine.read(2, 0).unwrap());

    engine.start();
    assert!(engine.read(2, 0).unwrap());
    assert!(!engine.read(2, 1).unwrap());
}

#[test]
fn test_journey_relabelling_between_reads() {
    let mut engine = market();
    engine.read(0, 0).unwrap();

    // Object 5 joins B and immediately carries the banks class.
    engine.add_object(5, Firm::new("B")).unwrap();
    let decision = engine.access(0, 5, AccessKind::Read).unwrap();
    assert!(decision.is_refused());
    assert!(matches!(
        decision.reason,
        DecisionReason::Refused { conflicting_object: 0, .. }
    ));

    // Moving B to its own class opens it up.
    engine.set_conflict(Firm::new("B"), ConflictClass::new("retail"));
    assert!(engine.read(0, 5).unwrap());
    assert_eq!(engine.unassigned_object_count(), 0);
}

// ============================================================================
// Journey 2: TOML configuration and dispatcher
// ============================================================================

#[test]
fn test_journey_config_file_session() {
    let config = WallConfig::from_toml_str(
        r#"
subjects = 2
objects = 3
firms = 2

[[portfolio]]
firm = "A"
objects = [0, 2]
conflict = "X"

[[portfolio]]
firm = "B"
objects = [1]
conflict = "X"
"#,
    )
    .unwrap();
    let mut engine = config.build().unwrap();

    let script = "\
read 0 0
read 0 1
read 0 2
report -s 0
briefcase A
start
read 0 1
report -o 1
read 0 7
exit
";
    let mut output = Vec::new();
    Dispatcher::new(&mut engine)
        .run(Cursor::new(script), &mut output)
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    let replies: Vec<&str> = output
        .split("> ")
        .map(str::trim_end)
        .filter(|reply| !reply.is_empty())
        .collect();
    assert_eq!(
        replies,
        vec![
            "accepted",
            "refused",
            "accepted",
            "object 0 firm A\nobject 2 firm A",
            "objects: 0, 2",
            "new epoch 2",
            "accepted",
            "subjects: 0",
            "error: invalid object index 7: expected a value below 3",
        ]
    );

    assert_eq!(engine.firm_object_count(&Firm::new("A")), 2);
    assert_eq!(engine.unassigned_object_count(), 0);
}

// ============================================================================
// Journey 3: Interactive setup and command session
// ============================================================================

#[test]
fn test_journey_interactive_setup_then_commands() {
    let script = "\
2
3
2
A
0 2 -1
B
1 -1
A
X
B
X
read 1 1
write 1 0
firms
exit
";
    let mut input = Cursor::new(script);
    let mut prompts = Vec::new();
    let mut engine = SetupSession::new(&mut input, &mut prompts).run().unwrap();

    let mut output = Vec::new();
    Dispatcher::new(&mut engine).run(&mut input, &mut output).unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(
        output,
        "> accepted\n> refused\n> firm A class X objects 2\nfirm B class X objects 1\n> "
    );
    assert_eq!(engine.accessing_subjects(1).unwrap(), vec![1]);
}
