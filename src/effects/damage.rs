//! The damage primitive.
//!
//! Order of evaluation for one `damage` call:
//!
//! 1. Damage-to-heal conversion on the target (hit bigger than its atk).
//! 2. Immunity, unless the call or the attacker is piercing.
//! 3. Amplify marks in the target's hand, then a pending "next damage
//!    doubled", floored at 0.
//! 4. Prevent-death field clamp.
//! 5. Secondary effects in fixed order: reflect (only on a hit above 0),
//!    lifesteal, self-harm, counter-reflect.
//!
//! Everything after step 2 is computed from one snapshot of both players and
//! written back in a single step.

use crate::cards::Mark;
use crate::core::{PlayerId, VisualEvent};
use crate::field;

use super::context::EffectContext;

impl EffectContext<'_> {
    /// Deal `amount` damage to `target`.
    ///
    /// Returns the damage the target actually took, before reflect.
    pub fn damage(&mut self, target: PlayerId, amount: i32, piercing: bool) -> i32 {
        let target = self.resolve(target);
        let attacker = target.opponent();
        let victim = self.snapshot().player(target).clone();
        let source = self.snapshot().player(attacker).clone();

        if victim.status.damage_to_heal && amount > victim.atk {
            self.log(format!("{} turns {amount} damage into healing", victim.name));
            self.modify_resolved(target, |p| {
                p.status.damage_to_heal = false;
                p.hp += amount;
            });
            return 0;
        }

        if victim.status.immune && !(piercing || source.status.piercing) {
            self.log(format!("{} is immune to {amount} damage", victim.name));
            return 0;
        }

        let mut actual = amount + victim.hand_marks(Mark::Amplify) as i32;
        if victim.status.double_next_damage {
            actual *= 2;
        }
        let actual = actual.max(0);

        // A hit that lands nothing has nothing to reflect.
        let reflect = i32::from(victim.status.reflect && actual > 0);
        let mut victim_hp = victim.hp - actual - reflect;
        let spared = victim_hp < 0 && field::profile(self.snapshot()).is_some_and(|p| p.prevents_death);
        if spared {
            victim_hp = 1;
        }

        let lifesteal = if source.status.lifesteal && !source.status.prevent_healing {
            actual
        } else {
            0
        };
        let self_harm = i32::from(source.hand_marks(Mark::SelfHarm) > 0);
        let countered = if source.status.counter_reflect { actual } else { 0 };
        let source_hp = source.hp + lifesteal - self_harm - countered;

        // Commit both sides from the snapshot.
        let state = self.state_mut();
        {
            let p = state.player_mut(target);
            p.hp = victim_hp;
            p.status.double_next_damage = false;
            p.status.damage_taken += actual;
        }
        state.player_mut(attacker).hp = source_hp;
        if countered > 0 {
            let mut stamped = 0;
            for card in state.player_mut(attacker).hand.iter_mut() {
                if stamped == countered {
                    break;
                }
                if card.mark.is_none() && !card.is_treasure() {
                    card.mark = Some(Mark::Amplify);
                    stamped += 1;
                }
            }
        }

        state.log(format!("{} takes {actual} damage", victim.name));
        if reflect > 0 {
            state.log(format!("{} suffers 1 reflected damage", victim.name));
        }
        if lifesteal > 0 {
            state.log(format!("{} drains {lifesteal} hp", source.name));
        }
        if self_harm > 0 {
            state.log(format!("{} is hurt by their own strike", source.name));
        }
        if countered > 0 {
            state.log(format!("{} takes {countered} countered damage", source.name));
        }

        if actual + reflect > 0 {
            state.emit(VisualEvent::Damage {
                player: target,
                amount: actual + reflect,
            });
        }
        let source_delta = source_hp - source.hp;
        if source_delta > 0 {
            state.emit(VisualEvent::Heal {
                player: attacker,
                amount: source_delta,
            });
        } else if source_delta < 0 {
            state.emit(VisualEvent::Damage {
                player: attacker,
                amount: -source_delta,
            });
        }

        if spared {
            state.log(format!("{} is spared at 1 hp", victim.name));
            field::discard_field(state);
        }
        field::recompute(state);
        actual
    }
}
