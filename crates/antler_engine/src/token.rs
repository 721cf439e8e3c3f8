//! Tokens: partial or complete matches for one production.
//!
//! A token carries one slot per condition and one outgoing reference per
//! inference template. Slots are three-state: empty, filled with a fact, or
//! holding the null sentinel that stands in for a currently-satisfied
//! negated condition. The sentinel is a distinct state rather than a
//! distinguished fact, which gives the identity comparison the design calls
//! for without a reserved arena entry.

use antler_foundation::{Error, Fact, Operator, Result, Variable};

use crate::engine::Engine;
use crate::ids::{BetaId, FactId, ProductionId, TokenId};
use crate::production::Production;

/// One condition slot of a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// No fact yet; the token is incomplete here.
    Empty,
    /// Null sentinel: the slot's negated condition is currently satisfied.
    NullFact,
    /// A matched fact.
    Filled(FactId),
}

/// A match in progress for one production.
#[derive(Debug)]
pub(crate) struct Token {
    /// Owning production.
    pub production: ProductionId,
    /// One slot per condition, indexed by condition position.
    pub incoming: Vec<Slot>,
    /// One emitted fact per inference template, indexed by position.
    pub outgoing: Vec<Option<FactId>>,
}

impl Token {
    /// True once every slot is non-empty (null sentinels count as filled).
    pub(crate) fn is_complete(&self) -> bool {
        !self.incoming.contains(&Slot::Empty)
    }
}

impl Engine {
    /// Attempts to add a single fact to a single token at the slot owned by
    /// `beta_id`. Returns whether the token accepted the fact.
    ///
    /// For a negated slot, a real fact arriving means the negation has been
    /// violated: the slot is damaged (retracting dependent inferences) and
    /// the fact is reported accepted. For a positive slot already holding a
    /// fact, only the identical fact is accepted; the slot is never
    /// overwritten. For an empty positive slot the fact must pass every
    /// variable-binding test before it is stored.
    pub(crate) fn inject(
        &mut self,
        token_id: TokenId,
        fact_id: FactId,
        beta_id: BetaId,
    ) -> Result<bool> {
        let beta = &self.betas[beta_id.idx()];
        let slot = beta.index;
        let alpha_not = beta.alpha_not;
        let production_id = beta.production;
        let object_var = beta.object_var.clone();
        let value_var = beta.value_var.clone();

        let held = match self.tokens[token_id.idx()].as_ref() {
            Some(token) => token.incoming[slot],
            // Destroyed earlier in this propagation; nothing to extend.
            None => return Ok(false),
        };

        if alpha_not {
            return match held {
                Slot::NullFact => {
                    self.damage_token(token_id, slot)?;
                    Ok(true)
                }
                Slot::Filled(_) => Err(Error::invariant("negated slot holds a fact")),
                Slot::Empty => Ok(true),
            };
        }

        match held {
            Slot::Filled(existing) => {
                return Ok(self.facts[existing.idx()] == self.facts[fact_id.idx()]);
            }
            Slot::NullFact => {
                return Err(Error::invariant("positive slot holds the null sentinel"));
            }
            Slot::Empty => {}
        }

        let accepted = {
            let token = self.tokens[token_id.idx()]
                .as_ref()
                .ok_or_else(|| Error::invariant("dangling token id"))?;
            let production = &self.productions[production_id.idx()];
            binding_tests_pass(
                production,
                token,
                &self.facts,
                &self.facts[fact_id.idx()],
                object_var.as_ref(),
                value_var.as_ref(),
            )?
        };
        if !accepted {
            return Ok(false);
        }

        if let Some(token) = self.tokens[token_id.idx()].as_mut() {
            token.incoming[slot] = Slot::Filled(fact_id);
        }
        Ok(true)
    }

    /// Empties one slot of a token and retracts everything the token
    /// emitted. A token whose slots are all empty afterwards is destroyed.
    pub(crate) fn damage_token(&mut self, token_id: TokenId, slot: usize) -> Result<()> {
        let (production_id, outgoing_len) = {
            let Some(token) = self.tokens[token_id.idx()].as_mut() else {
                return Ok(());
            };
            if token.incoming[slot] == Slot::Empty {
                return Err(Error::invariant("damage of an empty slot"));
            }
            token.incoming[slot] = Slot::Empty;
            (token.production, token.outgoing.len())
        };

        // Retracting a derived fact recurses through the engine and may damage
        // this same token again, so each outgoing entry is taken before the
        // recursive call.
        for position in 0..outgoing_len {
            let emitted = match self.tokens[token_id.idx()].as_mut() {
                Some(token) => token.outgoing[position].take(),
                None => return Ok(()),
            };
            if let Some(fact_id) = emitted {
                self.retract_by_id(fact_id)?;
            }
        }

        let now_empty = match self.tokens[token_id.idx()].as_ref() {
            Some(token) => token.incoming.iter().all(|s| *s == Slot::Empty),
            None => return Ok(()),
        };
        if now_empty {
            self.remove_token(production_id, token_id)?;
        }
        Ok(())
    }
}

/// Runs the variable-binding gauntlet for a fact entering an empty slot.
///
/// Every occurrence of the slot's own variable that is already bound must
/// agree with the incoming fact, and every occurrence of a different
/// variable must disagree (distinct variables bind distinct values). A
/// cross-reference between an object position and a value position compares
/// the value as a string; a non-string value simply fails the test.
fn binding_tests_pass(
    production: &Production,
    token: &Token,
    facts: &[Fact],
    fact: &Fact,
    object_var: Option<&Variable>,
    value_var: Option<&Variable>,
) -> Result<bool> {
    if let Some(var) = object_var {
        for (bound_var, tests) in &production.test_network {
            for test in tests {
                let Slot::Filled(bound_id) = token.incoming[test.token_index] else {
                    continue;
                };
                let bound = &facts[bound_id.idx()];
                if bound_var == var {
                    if test.object_else_value {
                        if fact.object != bound.object {
                            return Ok(false);
                        }
                    } else if bound.value.as_str() != Some(&*fact.object) {
                        return Ok(false);
                    }
                } else if test.object_else_value {
                    if fact.object == bound.object {
                        return Ok(false);
                    }
                } else if bound.value.as_str() == Some(&*fact.object) {
                    return Ok(false);
                }
            }
        }
    }

    if let Some(var) = value_var {
        for (bound_var, tests) in &production.test_network {
            for test in tests {
                let Slot::Filled(bound_id) = token.incoming[test.token_index] else {
                    continue;
                };
                let bound = &facts[bound_id.idx()];
                if bound_var == var {
                    if test.object_else_value {
                        if fact.value.as_str() != Some(&*bound.object) {
                            return Ok(false);
                        }
                    } else if fact.value.matches(Operator::Ne, &bound.value)? {
                        return Ok(false);
                    }
                } else if test.object_else_value {
                    if fact.value.as_str() == Some(&*bound.object) {
                        return Ok(false);
                    }
                } else if fact.value.matches(Operator::Eq, &bound.value)? {
                    return Ok(false);
                }
            }
        }
    }

    Ok(true)
}
