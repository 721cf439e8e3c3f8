//! Beta nodes: join slots linking one alpha node into one production.
//!
//! A production has exactly one beta node per condition, in condition
//! order. Right activation handles a newly-stored fact arriving from the
//! parent alpha node; left activation tries to fill the remaining slots of
//! a token from the sibling alpha nodes' stored facts.

use antler_foundation::{Result, Variable};

use crate::engine::Engine;
use crate::ids::{AlphaId, BetaId, FactId, ProductionId, TokenId};
use crate::token::Slot;

/// A join slot: one condition position within one production.
#[derive(Debug)]
pub(crate) struct BetaNode {
    /// Condition position within the owning production.
    pub index: usize,
    /// Existential negation: satisfied only while the parent alpha is empty.
    pub alpha_not: bool,
    /// Variable occupying the condition's object position, if any.
    pub object_var: Option<Variable>,
    /// Variable occupying the condition's value position, if any.
    pub value_var: Option<Variable>,
    /// Parent alpha node.
    pub alpha: AlphaId,
    /// Owning production.
    pub production: ProductionId,
}

impl Engine {
    /// Handles the arrival of a single newly-stored fact.
    ///
    /// The fact is offered to every existing token; tokens that accept it are
    /// left-activated. If no token accepted it, a fresh token is born with
    /// the fact in this node's slot — token creation is restricted to right
    /// activation. A negated node never creates tokens: a fact arriving here
    /// violates the negation, and injection damages the affected tokens.
    pub(crate) fn right_activate(&mut self, beta_id: BetaId, fact_id: FactId) -> Result<()> {
        let (slot, alpha_not, production_id) = {
            let beta = &self.betas[beta_id.idx()];
            (beta.index, beta.alpha_not, beta.production)
        };
        let token_ids = self.productions[production_id.idx()].tokens.clone();

        if alpha_not {
            for token_id in token_ids {
                self.inject(token_id, fact_id, beta_id)?;
            }
            return Ok(());
        }

        let mut accepted_any = false;
        for token_id in token_ids {
            if self.inject(token_id, fact_id, beta_id)? {
                accepted_any = true;
                self.left_activate(beta_id, token_id)?;
            }
        }

        if !accepted_any {
            let token_id = self.add_token(production_id, Some(fact_id), slot)?;
            self.left_activate(beta_id, token_id)?;
        }
        Ok(())
    }

    /// Tries to fill the remaining empty slots of a token, skipping this
    /// node's own slot (just populated by the caller), then asks the
    /// production to fire if the token completed.
    pub(crate) fn left_activate(&mut self, beta_id: BetaId, token_id: TokenId) -> Result<()> {
        let own_slot = self.betas[beta_id.idx()].index;
        let production_id = self.betas[beta_id.idx()].production;
        let sibling_betas = self.productions[production_id.idx()].betas.clone();

        for (position, &sibling_id) in sibling_betas.iter().enumerate() {
            if position == own_slot {
                continue;
            }
            let empty = match self.tokens[token_id.idx()].as_ref() {
                Some(token) => token.incoming[position] == Slot::Empty,
                None => return Ok(()),
            };
            if !empty {
                continue;
            }
            let alpha_id = self.betas[sibling_id.idx()].alpha;
            let candidates = self.alphas[alpha_id.idx()].facts.clone();
            for candidate in candidates {
                if self.inject(token_id, candidate, sibling_id)? {
                    break;
                }
            }
        }

        self.fire(token_id)
    }
}
