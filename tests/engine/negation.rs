//! Integration tests for existential negation.

use antler::{Condition, Engine, Fact, Inference, Operator, Rule, Term};

/// IF ?x.p == "ready" AND ?y.p == "set" AND NOT _.k == "true"
/// THEN ?x.ok = "true"
fn negated_rule() -> Rule {
    Rule::new("r2")
        .when(Condition::new(Term::var("x"), "p", Operator::Eq, "ready"))
        .when(Condition::new(Term::var("y"), "p", Operator::Eq, "set"))
        .when(Condition::new("", "k", Operator::Eq, "true").negated())
        .then(Inference::new(Term::var("x"), "ok", "true"))
}

#[test]
fn empty_negated_condition_is_satisfied() {
    let mut engine = Engine::new();
    engine.define(negated_rule()).unwrap();

    // No fact matches the negated condition, so the rule fires on the
    // positive conditions alone.
    engine.assert(Fact::new("a", "p", "ready")).unwrap();
    engine.assert(Fact::new("b", "p", "set")).unwrap();

    let derived = engine.inferences("", "ok");
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0], Fact::new("a", "ok", "true"));
}

#[test]
fn asserting_violator_retracts_dependent_inference() {
    let mut engine = Engine::new();
    engine.define(negated_rule()).unwrap();

    engine.assert(Fact::new("a", "p", "ready")).unwrap();
    engine.assert(Fact::new("b", "p", "set")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 1);

    engine.assert(Fact::new("c", "k", "true")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 0);
}

#[test]
fn retracting_violator_restores_inference() {
    let mut engine = Engine::new();
    engine.define(negated_rule()).unwrap();

    engine.assert(Fact::new("a", "p", "ready")).unwrap();
    engine.assert(Fact::new("b", "p", "set")).unwrap();
    engine.assert(Fact::new("c", "k", "true")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 0);

    engine.retract(&Fact::new("c", "k", "true")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 1);
}

#[test]
fn negation_tracks_every_violator() {
    let mut engine = Engine::new();
    engine.define(negated_rule()).unwrap();

    engine.assert(Fact::new("a", "p", "ready")).unwrap();
    engine.assert(Fact::new("b", "p", "set")).unwrap();

    engine.assert(Fact::new("v1", "k", "true")).unwrap();
    engine.assert(Fact::new("v2", "k", "true")).unwrap();
    engine.assert(Fact::new("v3", "k", "true")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 0);

    // The negation stays violated until the last matching fact is gone.
    engine.retract(&Fact::new("v2", "k", "true")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 0);
    engine.retract(&Fact::new("v3", "k", "true")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 0);
    engine.retract(&Fact::new("v1", "k", "true")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 1);
}

#[test]
fn violator_asserted_first_blocks_rule() {
    let mut engine = Engine::new();
    engine.define(negated_rule()).unwrap();

    engine.assert(Fact::new("c", "k", "true")).unwrap();
    engine.assert(Fact::new("a", "p", "ready")).unwrap();
    engine.assert(Fact::new("b", "p", "set")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 0);

    engine.retract(&Fact::new("c", "k", "true")).unwrap();
    assert_eq!(engine.inferences("", "ok").len(), 1);
}

#[test]
fn purely_negative_rule_fires_when_last_violator_leaves() {
    let mut engine = Engine::new();
    engine
        .define(
            Rule::new("all-clear")
                .when(Condition::new("", "blocked", Operator::Eq, "yes").negated())
                .then(Inference::new("system", "clear", "yes")),
        )
        .unwrap();

    // Nothing has ever been asserted against this rule; it has no token and
    // stays silent.
    assert!(engine.inferences("", "clear").is_empty());

    engine.assert(Fact::new("road-1", "blocked", "yes")).unwrap();
    assert!(engine.inferences("", "clear").is_empty());

    // The retraction drains the only matching fact, which seeds the
    // production's first token and fires it.
    engine.retract(&Fact::new("road-1", "blocked", "yes")).unwrap();
    let derived = engine.inferences("", "clear");
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0], Fact::new("system", "clear", "yes"));
}

#[test]
fn negation_cycle_is_repeatable() {
    let mut engine = Engine::new();
    engine.define(negated_rule()).unwrap();

    engine.assert(Fact::new("a", "p", "ready")).unwrap();
    engine.assert(Fact::new("b", "p", "set")).unwrap();

    for _ in 0..3 {
        engine.assert(Fact::new("c", "k", "true")).unwrap();
        assert_eq!(engine.inferences("", "ok").len(), 0);
        engine.retract(&Fact::new("c", "k", "true")).unwrap();
        assert_eq!(engine.inferences("", "ok").len(), 1);
    }
}
