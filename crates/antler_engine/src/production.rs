//! Production nodes: the compiled form of one rule.
//!
//! A production owns its beta slots (in condition order), the variable test
//! network, the live token set, and the inference templates. Firing resolves
//! each template against a complete token and feeds the derived facts back
//! through the agenda.

use std::collections::HashMap;
use std::sync::Arc;

use antler_foundation::{Error, Fact, Inference, Result, Term, Value, Variable};

use crate::engine::Engine;
use crate::ids::{FactId, ProductionId, TokenId};
use crate::token::{Slot, Token};

/// One occurrence of a variable within a rule's conditions.
#[derive(Copy, Clone, Debug)]
pub(crate) struct VarTest {
    /// Condition position the variable occurs in.
    pub token_index: usize,
    /// True if the variable occupies the object position there, false for
    /// the value position.
    pub object_else_value: bool,
}

/// The compiled form of one rule.
#[derive(Debug)]
pub(crate) struct Production {
    /// Identifier of the source rule.
    pub rule_id: String,
    /// Every occurrence of every variable, in condition order per variable.
    pub test_network: HashMap<Variable, Vec<VarTest>>,
    /// Beta slots, in condition order.
    pub betas: Vec<crate::ids::BetaId>,
    /// Live tokens.
    pub tokens: Vec<TokenId>,
    /// Inference templates, in firing order.
    pub inferences: Vec<Inference>,
}

impl Engine {
    /// Creates a token for a production, optionally seeding one slot.
    ///
    /// Slots owned by negated conditions whose parent alpha is currently
    /// empty are pre-filled with the null sentinel.
    pub(crate) fn add_token(
        &mut self,
        production_id: ProductionId,
        fact: Option<FactId>,
        slot: usize,
    ) -> Result<TokenId> {
        let betas = self.productions[production_id.idx()].betas.clone();
        let inference_count = self.productions[production_id.idx()].inferences.len();

        let mut incoming = vec![Slot::Empty; betas.len()];
        for (position, &beta_id) in betas.iter().enumerate() {
            let beta = &self.betas[beta_id.idx()];
            if beta.alpha_not && self.alphas[beta.alpha.idx()].facts.is_empty() {
                incoming[position] = Slot::NullFact;
            }
        }
        if let Some(fact_id) = fact {
            if self.betas[betas[slot].idx()].alpha_not {
                return Err(Error::invariant("seeding a token at a negated slot"));
            }
            incoming[slot] = Slot::Filled(fact_id);
        }

        let token_id = TokenId::from_index(self.tokens.len());
        self.tokens.push(Some(Token {
            production: production_id,
            incoming,
            outgoing: vec![None; inference_count],
        }));
        self.productions[production_id.idx()].tokens.push(token_id);
        Ok(token_id)
    }

    /// Detaches a token from its production and tombstones its arena slot.
    pub(crate) fn remove_token(
        &mut self,
        production_id: ProductionId,
        token_id: TokenId,
    ) -> Result<()> {
        let production = &mut self.productions[production_id.idx()];
        let Some(position) = production.tokens.iter().position(|&t| t == token_id) else {
            return Err(Error::invariant("token not tracked by its production"));
        };
        production.tokens.swap_remove(position);
        self.tokens[token_id.idx()] = None;
        Ok(())
    }

    /// Fires the production's inferences if the token is complete.
    ///
    /// Incomplete tokens return quietly. Each resolved fact is pushed onto
    /// the agenda for a later turn and recorded in the token's outgoing set,
    /// which is what ties the inference's lifetime to the facts that
    /// justified it.
    pub(crate) fn fire(&mut self, token_id: TokenId) -> Result<()> {
        let (production_id, incoming) = match self.tokens[token_id.idx()].as_ref() {
            Some(token) if token.is_complete() => (token.production, token.incoming.clone()),
            _ => return Ok(()),
        };
        let inferences = self.productions[production_id.idx()].inferences.clone();

        for (position, inference) in inferences.iter().enumerate() {
            let object: Arc<str> = match &inference.object {
                Term::Literal(Value::Str(s)) => s.clone(),
                Term::Literal(other) => {
                    return Err(Error::inference(format!(
                        "{} cannot be an object id",
                        other.kind()
                    )));
                }
                Term::Var(var) => {
                    let bound = self.resolve_binding(production_id, &incoming, var)?;
                    match bound {
                        Resolved::Object(object) => object,
                        Resolved::Value(Value::Str(s)) => s,
                        Resolved::Value(other) => {
                            return Err(Error::inference(format!(
                                "{} cannot be an object id",
                                other.kind()
                            )));
                        }
                    }
                }
            };

            let value: Value = match &inference.value {
                Term::Literal(v) => v.clone(),
                Term::Var(var) => match self.resolve_binding(production_id, &incoming, var)? {
                    Resolved::Object(object) => Value::Str(object),
                    Resolved::Value(v) => v,
                },
            };

            let fact = Fact {
                object,
                attribute: inference.attribute.as_str().into(),
                value,
            };
            let fact_id = self.insert_fact(fact);
            self.enqueue(fact_id);
            if let Some(token) = self.tokens[token_id.idx()].as_mut() {
                token.outgoing[position] = Some(fact_id);
            }
        }
        Ok(())
    }

    /// Resolves a variable against a token using the first entry in its test
    /// list. Any entry would do: all occurrences in a firing token agree by
    /// construction.
    fn resolve_binding(
        &self,
        production_id: ProductionId,
        incoming: &[Slot],
        var: &Variable,
    ) -> Result<Resolved> {
        let test = self.productions[production_id.idx()]
            .test_network
            .get(var)
            .and_then(|tests| tests.first())
            .ok_or_else(|| Error::inference(format!("unbound variable {var}")))?;
        match incoming[test.token_index] {
            Slot::Filled(fact_id) => {
                let fact = &self.facts[fact_id.idx()];
                if test.object_else_value {
                    Ok(Resolved::Object(fact.object.clone()))
                } else {
                    Ok(Resolved::Value(fact.value.clone()))
                }
            }
            _ => Err(Error::inference(format!(
                "{var} is bound only by a satisfied negation"
            ))),
        }
    }
}

/// What a variable resolved to within a firing token.
enum Resolved {
    Object(Arc<str>),
    Value(Value),
}
