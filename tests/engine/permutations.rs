//! Order-independence of assertion over a six-rule derivation chain.
//!
//! The rule set exercises ordered numeric filters, a string-equality chain
//! across three objects, a cross-object value join, and a final negated
//! gate. Whatever order the nine base facts arrive in, exactly one
//! `passed` inference must come out.

use antler::{Condition, Engine, Fact, Inference, Operator, Rule, Term};
use proptest::prelude::*;

fn define_chain(engine: &mut Engine) {
    // Two ordered numeric conditions per attribute, joined on two distinct
    // probes.
    engine
        .define(
            Rule::new("grade-readings")
                .when(Condition::new(
                    Term::var("hi"),
                    "reading",
                    Operator::Gt,
                    17.1187,
                ))
                .when(Condition::new(
                    Term::var("lo"),
                    "reading",
                    Operator::Lt,
                    17.11378,
                ))
                .when(Condition::new(
                    Term::var("hi"),
                    "pressure",
                    Operator::Ge,
                    55.87,
                ))
                .when(Condition::new(
                    Term::var("lo"),
                    "pressure",
                    Operator::Le,
                    61.922927,
                ))
                .then(Inference::new(Term::var("hi"), "grade", 5.908))
                .then(Inference::new(Term::var("lo"), "label", "nominal"))
                .then(Inference::new("probe", "calibrated", "yes")),
        )
        .unwrap();

    // A string-equality chain over three objects: each link's value names
    // the previous link's object.
    engine
        .define(
            Rule::new("chain-links")
                .when(Condition::new(Term::var("a"), "link", Operator::Eq, "anchor"))
                .when(Condition::new(
                    Term::var("b"),
                    "link",
                    Operator::Eq,
                    Term::var("a"),
                ))
                .when(Condition::new(
                    Term::var("c"),
                    "link",
                    Operator::Eq,
                    Term::var("b"),
                ))
                .then(Inference::new(Term::var("a"), "chained", "head"))
                .then(Inference::new(Term::var("c"), "chained", "tail")),
        )
        .unwrap();

    // A cross-object value join.
    engine
        .define(
            Rule::new("pair-codes")
                .when(Condition::new(
                    Term::var("p"),
                    "code-a",
                    Operator::Eq,
                    Term::var("n"),
                ))
                .when(Condition::new(
                    Term::var("q"),
                    "code-b",
                    Operator::Eq,
                    Term::var("n"),
                ))
                .then(Inference::new(Term::var("p"), "paired", "always")),
        )
        .unwrap();

    engine
        .define(
            Rule::new("stage-one")
                .when(Condition::new(Term::var("w"), "grade", Operator::Eq, 5.908))
                .when(Condition::new(Term::var("v"), "label", Operator::Eq, "nominal"))
                .when(Condition::new("probe", "calibrated", Operator::Eq, "yes"))
                .then(Inference::new(Term::var("w"), "stage", "ready")),
        )
        .unwrap();

    engine
        .define(
            Rule::new("stage-two")
                .when(Condition::new(Term::var("d"), "chained", Operator::Eq, "head"))
                .when(Condition::new(Term::var("e"), "chained", Operator::Eq, "tail"))
                .when(Condition::new(Term::var("f"), "paired", Operator::Eq, "always"))
                .then(Inference::new(Term::var("f"), "stage", "set")),
        )
        .unwrap();

    engine
        .define(
            Rule::new("final-gate")
                .when(Condition::new(Term::var("r"), "stage", Operator::Eq, "ready"))
                .when(Condition::new(Term::var("s"), "stage", Operator::Eq, "set"))
                .when(Condition::new("", "halt", Operator::Eq, "yes").negated())
                .then(Inference::new(Term::var("r"), "passed", "yes")),
        )
        .unwrap();
}

fn base_facts() -> [Fact; 9] {
    [
        Fact::new("probe-1", "reading", 18.123),
        Fact::new("probe-2", "reading", 10.456),
        Fact::new("probe-1", "pressure", 55.87),
        Fact::new("probe-2", "pressure", 61.922927),
        Fact::new("node-1", "link", "anchor"),
        Fact::new("node-2", "link", "node-1"),
        Fact::new("node-3", "link", "node-2"),
        Fact::new("unit-1", "code-a", 42i64),
        Fact::new("unit-2", "code-b", 42i64),
    ]
}

fn engine_with_facts(order: &[usize]) -> Engine {
    let mut engine = Engine::new();
    define_chain(&mut engine);
    let facts = base_facts();
    for &index in order {
        engine.assert(facts[index].clone()).unwrap();
    }
    engine
}

#[test]
fn chain_passes_in_definition_order() {
    let engine = engine_with_facts(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    let passed = engine.inferences("", "passed");
    assert_eq!(passed.len(), 1);
    assert_eq!(passed[0], Fact::new("probe-1", "passed", "yes"));
}

#[test]
fn chain_passes_in_reverse_order() {
    let engine = engine_with_facts(&[8, 7, 6, 5, 4, 3, 2, 1, 0]);
    assert_eq!(engine.inferences("", "passed").len(), 1);
}

#[test]
fn chain_passes_with_interleaved_order() {
    let engine = engine_with_facts(&[4, 0, 7, 2, 8, 5, 1, 6, 3]);
    assert_eq!(engine.inferences("", "passed").len(), 1);
}

#[test]
fn every_base_fact_is_load_bearing() {
    let facts = base_facts();
    for index in 0..facts.len() {
        let mut engine = engine_with_facts(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        engine.retract(&facts[index]).unwrap();
        assert_eq!(
            engine.inferences("", "passed").len(),
            0,
            "retracting fact {index} should unwind the chain"
        );

        engine.assert(facts[index].clone()).unwrap();
        assert_eq!(
            engine.inferences("", "passed").len(),
            1,
            "re-asserting fact {index} should restore the chain"
        );
    }
}

#[test]
fn violators_block_until_all_are_retracted() {
    let mut engine = engine_with_facts(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(engine.inferences("", "passed").len(), 1);

    engine.assert(Fact::new("ops-1", "halt", "yes")).unwrap();
    engine.assert(Fact::new("ops-2", "halt", "yes")).unwrap();
    engine.assert(Fact::new("ops-3", "halt", "yes")).unwrap();
    assert_eq!(engine.inferences("", "passed").len(), 0);

    engine.retract(&Fact::new("ops-2", "halt", "yes")).unwrap();
    engine.retract(&Fact::new("ops-3", "halt", "yes")).unwrap();
    assert_eq!(engine.inferences("", "passed").len(), 0);
    engine.retract(&Fact::new("ops-1", "halt", "yes")).unwrap();
    assert_eq!(engine.inferences("", "passed").len(), 1);
}

#[test]
fn second_fact_set_combines_with_the_first() {
    let mut engine = engine_with_facts(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);

    let second_set = [
        Fact::new("probe-3", "reading", 20.31),
        Fact::new("probe-4", "reading", 9.582),
        Fact::new("probe-3", "pressure", 62.109),
        Fact::new("probe-4", "pressure", 50.824),
        Fact::new("node-4", "link", "anchor"),
        Fact::new("node-5", "link", "node-4"),
        Fact::new("node-6", "link", "node-5"),
        Fact::new("unit-3", "code-a", 42i64),
        Fact::new("unit-4", "code-b", 42i64),
    ];
    for fact in second_set {
        engine.assert(fact).unwrap();
    }

    // Each freshly stored stage fact opens one more pairing with the other
    // set's counterpart.
    assert_eq!(engine.inferences("", "passed").len(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn any_permutation_yields_exactly_one_pass(order in Just((0..9usize).collect::<Vec<_>>()).prop_shuffle()) {
        let engine = engine_with_facts(&order);
        prop_assert_eq!(engine.inferences("", "passed").len(), 1);
    }

    #[test]
    fn permutations_agree_on_all_inferences(order in Just((0..9usize).collect::<Vec<_>>()).prop_shuffle()) {
        let reference = engine_with_facts(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let shuffled = engine_with_facts(&order);

        let mut expected: Vec<String> = reference
            .inferences("", "")
            .iter()
            .map(ToString::to_string)
            .collect();
        let mut actual: Vec<String> = shuffled
            .inferences("", "")
            .iter()
            .map(ToString::to_string)
            .collect();
        expected.sort();
        expected.dedup();
        actual.sort();
        actual.dedup();
        prop_assert_eq!(expected, actual);
    }
}
