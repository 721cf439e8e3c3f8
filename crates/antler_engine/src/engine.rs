//! The engine facade: define, assert, retract, query.
//!
//! The engine owns every arena (facts, alpha nodes, beta nodes, productions,
//! tokens) and the agenda. It is single-threaded and non-reentrant; each
//! public operation drives the network to quiescence before returning.

use std::collections::HashMap;
use std::sync::Arc;

use antler_foundation::{Error, Fact, Operator, Result, Rule, Term, Value};

use crate::agenda::Agenda;
use crate::alpha::AlphaNode;
use crate::beta::BetaNode;
use crate::ids::{AlphaId, BetaId, FactId, ProductionId};
use crate::production::{Production, VarTest};
use crate::token::Token;

/// A forward-chaining production-rule engine.
///
/// Rules are compiled by [`Engine::define`] into a discrimination network;
/// ground facts enter through [`Engine::assert`], propagate through the
/// network, and fire rule inferences, which are re-fed into the network
/// until a fixed point is reached. [`Engine::retract`] removes a fact and
/// every inference that transitively depended on it.
///
/// Rules must be defined before the facts they should match are asserted;
/// a new rule never re-matches previously asserted facts.
///
/// # Example
///
/// ```
/// use antler_foundation::{Condition, Fact, Inference, Operator, Rule, Term};
/// use antler_engine::Engine;
///
/// let mut engine = Engine::new();
/// engine.define(
///     Rule::new("promote")
///         .when(Condition::new(Term::var("x"), "score", Operator::Ge, 90i64))
///         .then(Inference::new(Term::var("x"), "tier", "gold")),
/// )?;
/// engine.assert(Fact::new("alice", "score", 97i64))?;
///
/// let derived = engine.inferences("alice", "tier");
/// assert_eq!(derived.len(), 1);
/// # antler_foundation::Result::Ok(())
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    pub(crate) facts: Vec<Fact>,
    pub(crate) alphas: Vec<AlphaNode>,
    pub(crate) betas: Vec<BetaNode>,
    pub(crate) productions: Vec<Production>,
    pub(crate) tokens: Vec<Option<Token>>,
    /// Alpha nodes registered under each attribute.
    pub(crate) attribute_index: HashMap<Arc<str>, Vec<AlphaId>>,
    agenda: Agenda,
}

impl Engine {
    /// Creates an empty engine with no rules and no facts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a rule into the network.
    ///
    /// Each condition is interned into the alpha network and linked to the
    /// rule's production through a fresh beta node; variable occurrences are
    /// recorded in the production's test network.
    ///
    /// Fails if a condition carries a variable in its value position with an
    /// ordered comparator, if an object position holds a non-string literal,
    /// or if an inference references a variable the conditions never bind.
    /// A failed define may leave a partially-compiled production behind; the
    /// engine's matching state is unaffected because no facts are re-matched
    /// at definition time.
    pub fn define(&mut self, rule: Rule) -> Result<()> {
        let production_id = ProductionId::from_index(self.productions.len());
        self.productions.push(Production {
            rule_id: rule.id.clone(),
            test_network: HashMap::new(),
            betas: Vec::new(),
            tokens: Vec::new(),
            inferences: Vec::new(),
        });

        for (position, condition) in rule.lhs.iter().enumerate() {
            if condition.value.as_var().is_some() && condition.comparator != Operator::Eq {
                return Err(Error::compile(format!(
                    "value variable cannot be used with {}",
                    condition.comparator
                ))
                .with_rule(&rule.id));
            }

            let object_constraint: Arc<str> = match &condition.object {
                Term::Var(_) => "".into(),
                Term::Literal(Value::Str(s)) => s.clone(),
                Term::Literal(other) => {
                    return Err(Error::compile(format!(
                        "{} cannot constrain an object id",
                        other.kind()
                    ))
                    .with_rule(&rule.id));
                }
            };
            let compare_to: Option<Value> = match &condition.value {
                Term::Var(_) => None,
                Term::Literal(v) => Some(v.clone()),
            };
            let attribute: Arc<str> = condition.attribute.as_str().into();

            let alpha_id = self.intern_alpha(
                &attribute,
                &object_constraint,
                condition.comparator,
                compare_to,
            )?;

            let beta_id = BetaId::from_index(self.betas.len());
            self.betas.push(BetaNode {
                index: position,
                alpha_not: condition.not_exists,
                object_var: condition.object.as_var().cloned(),
                value_var: condition.value.as_var().cloned(),
                alpha: alpha_id,
                production: production_id,
            });
            self.alphas[alpha_id.idx()].betas.push(beta_id);
            self.productions[production_id.idx()].betas.push(beta_id);

            let network = &mut self.productions[production_id.idx()].test_network;
            if let Some(var) = condition.object.as_var() {
                network.entry(var.clone()).or_default().push(VarTest {
                    token_index: position,
                    object_else_value: true,
                });
            }
            if let Some(var) = condition.value.as_var() {
                network.entry(var.clone()).or_default().push(VarTest {
                    token_index: position,
                    object_else_value: false,
                });
            }
        }

        for inference in &rule.rhs {
            for term in [&inference.object, &inference.value] {
                if let Some(var) = term.as_var() {
                    if !self.productions[production_id.idx()]
                        .test_network
                        .contains_key(var)
                    {
                        return Err(Error::compile(format!(
                            "inference references unbound variable {var}"
                        ))
                        .with_rule(&rule.id));
                    }
                }
            }
        }
        self.productions[production_id.idx()].inferences = rule.rhs;
        Ok(())
    }

    /// Asserts a ground fact and propagates to quiescence.
    ///
    /// Asserting a fact the engine already holds is a no-op. Every inference
    /// reachable from the new fact, transitively, is derived before this
    /// returns.
    pub fn assert(&mut self, fact: Fact) -> Result<()> {
        let fact_id = self.insert_fact(fact);
        self.enqueue(fact_id);
        self.turn()
    }

    /// Retracts a fact, removing every inference that depended on it.
    ///
    /// The stored fact is located by (object, attribute, value) equality;
    /// retracting a fact the engine does not hold is silently successful.
    /// Retraction is synchronous, but inferences re-enabled by it (through a
    /// satisfied negation) propagate before this returns.
    pub fn retract(&mut self, fact: &Fact) -> Result<()> {
        if let Some(fact_id) = self.find(fact) {
            self.retract_by_id(fact_id)?;
            self.turn()?;
        }
        Ok(())
    }

    /// Returns every inference currently justified by a live token.
    ///
    /// An empty `object` or `attribute` matches anything. Order is
    /// unspecified.
    #[must_use]
    pub fn inferences(&self, object: &str, attribute: &str) -> Vec<Fact> {
        let mut results = Vec::new();
        for production in &self.productions {
            for &token_id in &production.tokens {
                let Some(token) = self.tokens[token_id.idx()].as_ref() else {
                    continue;
                };
                for &fact_id in token.outgoing.iter().flatten() {
                    let fact = &self.facts[fact_id.idx()];
                    if (object.is_empty() || &*fact.object == object)
                        && (attribute.is_empty() || &*fact.attribute == attribute)
                    {
                        results.push(fact.clone());
                    }
                }
            }
        }
        results
    }

    // ---------------------------------------------------------------------
    // Internals shared across the network modules
    // ---------------------------------------------------------------------

    /// Adds a fact to the arena. The entry outlives any retraction; arena
    /// slots are only reclaimed at engine teardown.
    pub(crate) fn insert_fact(&mut self, fact: Fact) -> FactId {
        let fact_id = FactId::from_index(self.facts.len());
        self.facts.push(fact);
        fact_id
    }

    /// Defers a fact to a later turn.
    pub(crate) fn enqueue(&mut self, fact_id: FactId) {
        self.agenda.push(fact_id);
    }

    /// Removes a fact from every alpha node holding it, with full damage
    /// propagation. A fact that was never stored (or was already removed)
    /// is a no-op.
    pub(crate) fn retract_by_id(&mut self, fact_id: FactId) -> Result<()> {
        let attribute = self.facts[fact_id.idx()].attribute.clone();
        let Some(alpha_ids) = self.attribute_index.get(&attribute).cloned() else {
            return Ok(());
        };
        for alpha_id in alpha_ids {
            self.remove_fact_from_alpha(alpha_id, fact_id)?;
        }
        Ok(())
    }

    /// Locates a stored fact by triple equality.
    fn find(&self, fact: &Fact) -> Option<FactId> {
        let alpha_ids = self.attribute_index.get(&*fact.attribute)?;
        for &alpha_id in alpha_ids {
            for &fact_id in &self.alphas[alpha_id.idx()].facts {
                if self.facts[fact_id.idx()] == *fact {
                    return Some(fact_id);
                }
            }
        }
        None
    }

    /// Reuses an alpha node with the same filtering behavior, or registers a
    /// new one under the attribute.
    fn intern_alpha(
        &mut self,
        attribute: &Arc<str>,
        object_constraint: &Arc<str>,
        comparator: Operator,
        compare_to: Option<Value>,
    ) -> Result<AlphaId> {
        let registered = self
            .attribute_index
            .entry(attribute.clone())
            .or_default()
            .clone();
        for alpha_id in registered {
            if self.alphas[alpha_id.idx()].same_shape(
                object_constraint,
                comparator,
                compare_to.as_ref(),
            )? {
                return Ok(alpha_id);
            }
        }

        let alpha_id = AlphaId::from_index(self.alphas.len());
        self.alphas.push(AlphaNode {
            attribute: attribute.clone(),
            object_constraint: object_constraint.clone(),
            comparator,
            compare_to,
            facts: Vec::new(),
            betas: Vec::new(),
        });
        if let Some(registered) = self.attribute_index.get_mut(attribute) {
            registered.push(alpha_id);
        }
        Ok(alpha_id)
    }

    /// The main action loop: drains the agenda one fact per turn.
    ///
    /// Each fact is matched against every alpha node registered under its
    /// attribute, stored where it passes, and right-activated into the
    /// attached beta nodes. A fact an alpha node already holds is a
    /// duplicate: the agenda item is discarded entirely, which is what
    /// bounds derivation when a rule re-derives one of its own premises.
    fn turn(&mut self) -> Result<()> {
        while let Some(fact_id) = self.agenda.pop() {
            let attribute = self.facts[fact_id.idx()].attribute.clone();
            let Some(alpha_ids) = self.attribute_index.get(&attribute).cloned() else {
                // No rule mentions this attribute; the fact is irrelevant.
                continue;
            };
            for alpha_id in alpha_ids {
                let alpha = &self.alphas[alpha_id.idx()];
                let fact = &self.facts[fact_id.idx()];
                if !alpha.accepts(fact)? {
                    continue;
                }
                if alpha
                    .facts
                    .iter()
                    .any(|&held| self.facts[held.idx()] == *fact)
                {
                    break;
                }
                self.alphas[alpha_id.idx()].facts.push(fact_id);
                let beta_ids = self.alphas[alpha_id.idx()].betas.clone();
                for beta_id in beta_ids {
                    self.right_activate(beta_id, fact_id)?;
                }
            }
        }
        debug_assert!(self.agenda.is_empty());
        Ok(())
    }
}
