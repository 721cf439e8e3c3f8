//! The alpha network: per-attribute filter nodes.
//!
//! An alpha node holds every fact that satisfies one condition's literal
//! constraints. Nodes are interned per attribute: two conditions with the
//! same object constraint, comparator, and compare-to value share a node,
//! and therefore share its stored facts.

use std::sync::Arc;

use antler_foundation::{matches_optional, Fact, Operator, Result, Value};

use crate::engine::Engine;
use crate::ids::{AlphaId, BetaId, FactId};
use crate::token::Slot;

/// A single filter node in the alpha network.
#[derive(Debug)]
pub(crate) struct AlphaNode {
    /// Attribute this node filters on.
    pub attribute: Arc<str>,
    /// Object id the fact must carry; `""` accepts any object.
    pub object_constraint: Arc<str>,
    /// Operator applied between a fact's value and `compare_to`.
    pub comparator: Operator,
    /// Literal to compare against; `None` accepts any value.
    pub compare_to: Option<Value>,
    /// Facts currently held by this node.
    pub facts: Vec<FactId>,
    /// Beta nodes fed by this node.
    pub betas: Vec<BetaId>,
}

impl AlphaNode {
    /// Returns true if this node and the given constraint tuple would filter
    /// identically, making the node reusable for a new condition.
    pub(crate) fn same_shape(
        &self,
        object_constraint: &str,
        comparator: Operator,
        compare_to: Option<&Value>,
    ) -> Result<bool> {
        Ok(&*self.object_constraint == object_constraint
            && self.comparator == comparator
            && matches_optional(self.compare_to.as_ref(), Operator::Eq, compare_to)?)
    }

    /// Returns true if the fact passes this node's literal constraints.
    pub(crate) fn accepts(&self, fact: &Fact) -> Result<bool> {
        if !self.object_constraint.is_empty() && fact.object != self.object_constraint {
            return Ok(false);
        }
        if let Some(compare_to) = &self.compare_to {
            return fact.value.matches(self.comparator, compare_to);
        }
        Ok(true)
    }
}

impl Engine {
    /// Removes a fact from one alpha node and propagates the damage.
    ///
    /// Every token holding the fact in the slot fed by this node loses its
    /// inferences and the slot is emptied. If the node ran dry and feeds a
    /// negated condition, the negation is satisfied again: the null sentinel
    /// is written back into every token (possibly completing it), and a
    /// production left without tokens gets a fresh one so a rule enabled
    /// purely by the negation can fire.
    pub(crate) fn remove_fact_from_alpha(
        &mut self,
        alpha_id: AlphaId,
        fact_id: FactId,
    ) -> Result<()> {
        let alpha = &mut self.alphas[alpha_id.idx()];
        let Some(position) = alpha.facts.iter().position(|&f| f == fact_id) else {
            return Ok(());
        };
        alpha.facts.swap_remove(position);

        let beta_ids = self.alphas[alpha_id.idx()].betas.clone();
        for beta_id in beta_ids {
            let (slot, alpha_not, production_id) = {
                let beta = &self.betas[beta_id.idx()];
                (beta.index, beta.alpha_not, beta.production)
            };

            let token_ids = self.productions[production_id.idx()].tokens.clone();
            for token_id in token_ids {
                // Recursive retraction below can refill the node, so the
                // emptiness check is repeated per token.
                let ran_dry = self.alphas[alpha_id.idx()].facts.is_empty();
                let held = match self.tokens[token_id.idx()].as_ref() {
                    Some(token) => token.incoming[slot],
                    None => continue,
                };
                if ran_dry && alpha_not {
                    if let Some(token) = self.tokens[token_id.idx()].as_mut() {
                        token.incoming[slot] = Slot::NullFact;
                    }
                    self.left_activate(beta_id, token_id)?;
                } else if held == Slot::Filled(fact_id) {
                    self.damage_token(token_id, slot)?;
                }
            }

            if self.alphas[alpha_id.idx()].facts.is_empty()
                && alpha_not
                && self.productions[production_id.idx()].tokens.is_empty()
            {
                let token_id = self.add_token(production_id, None, 0)?;
                self.left_activate(beta_id, token_id)?;
            }
        }
        Ok(())
    }
}
