//! Combat scheduler: owns every battle, turns enemy contacts into battles and
//! drives them forward each tick.
//!
//! Battles are stored here, keyed by their participant pair, NOT as ECS
//! entities. Fighters stay in the world and are addressed by [`FighterId`];
//! an id whose entity is gone just fails to resolve.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, error, trace, warn};

use battlebases_combat::initiative::{self, Initiative, WalkProgress};
use battlebases_combat::{Battle, BattleOutcome, CombatError, Fighter};
use battlebases_core::components::Walker;
use battlebases_core::enums::WalkPhase;
use battlebases_core::events::CombatEvent;
use battlebases_core::types::{BattleKey, FighterId};

/// Stable id for a fighter entity.
pub fn fighter_id(entity: Entity) -> FighterId {
    FighterId(entity.to_bits().get())
}

/// The entity behind an id, if the id could ever have named one.
pub fn entity_of(id: FighterId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

/// What happened to a reported contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Stale, unregistered, dead or friendly pair, or nobody can hit anybody.
    Ignored,
    /// The pair already has a battle, paused or not.
    AlreadyEngaged(BattleKey),
    /// An attacker is locked into a battle that cannot be interrupted.
    Rejected { busy: BattleKey },
    /// A new battle started.
    Engaged(BattleKey),
    /// A new battle was created paused behind the attacker's current target.
    Queued(BattleKey),
}

#[derive(Debug, Default)]
pub struct CombatScheduler {
    battles: BTreeMap<BattleKey, Battle>,
    roster: BTreeSet<FighterId>,
}

impl CombatScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly spawned fighter so its contacts are honoured.
    pub fn report_spawn(&mut self, fighter: FighterId) {
        self.roster.insert(fighter);
    }

    pub fn is_registered(&self, fighter: FighterId) -> bool {
        self.roster.contains(&fighter)
    }

    /// Handle "`a` detected `b` as an enemy". Idempotent: reporting the same
    /// pair again while they fight changes nothing.
    pub fn report_enemy_contact<R: Rng + ?Sized>(
        &mut self,
        world: &World,
        rng: &mut R,
        a: FighterId,
        b: FighterId,
        events: &mut Vec<CombatEvent>,
    ) -> ContactOutcome {
        if a == b || !self.is_registered(a) || !self.is_registered(b) {
            return ContactOutcome::Ignored;
        }
        let (Some(fa), Some(fb)) = (lookup(world, a), lookup(world, b)) else {
            return ContactOutcome::Ignored;
        };
        if fa.is_dead() || fb.is_dead() || fa.team == fb.team {
            return ContactOutcome::Ignored;
        }

        let key = BattleKey::new(a, b);
        if self.battles.contains_key(&key) {
            return ContactOutcome::AlreadyEngaged(key);
        }

        let a_attacks = fa.can_attack() && fb.can_be_targeted();
        let b_attacks = fb.can_attack() && fa.can_be_targeted();

        let battle = if a_attacks && b_attacks && !fa.is_structure() && !fb.is_structure() {
            let a_walk = walk_progress(world, a);
            let b_walk = walk_progress(world, b);
            match initiative::resolve(a_walk, b_walk, rng) {
                Initiative::First => Battle::mutual(a, &fa, b, &fb),
                Initiative::Second => Battle::mutual(b, &fb, a, &fa),
            }
        } else if a_attacks {
            Battle::one_attacker(a, &fa, b, &fb)
        } else if b_attacks {
            Battle::one_attacker(b, &fb, a, &fa)
        } else {
            return ContactOutcome::Ignored;
        };
        let mut battle = match battle {
            Ok(battle) => battle,
            Err(err) => {
                report_violation(&err);
                return ContactOutcome::Ignored;
            }
        };

        // Decide what happens to each attacker's current battle before
        // touching anything.
        let attackers = [battle.first(), battle.second()];
        let mut to_pause = Vec::new();
        let mut queued = false;
        for attacker in attackers.into_iter().filter(|&id| battle.is_attacker(id)) {
            let Some(busy) = self.attacking_battle(attacker) else {
                continue;
            };
            let interruptible = self
                .battles
                .get(&busy)
                .is_some_and(|current| current.interruptible());
            if !interruptible {
                debug!(%a, %b, %busy, "contact rejected, attacker busy");
                return ContactOutcome::Rejected { busy };
            }
            let queues = lookup(world, attacker).is_some_and(|f| f.kind.queues_targets());
            if queues {
                queued = true;
            } else {
                to_pause.push(busy);
            }
        }

        for busy in to_pause {
            if let Some(current) = self.battles.get_mut(&busy) {
                if current.set_paused(true) {
                    debug!(battle = %busy, "battle paused");
                    events.push(CombatEvent::BattlePaused { battle: busy });
                }
            }
        }
        if queued {
            battle.set_paused(true);
        }

        debug!(
            battle = %key,
            first = %battle.first(),
            second = %battle.second(),
            queued,
            "battle started"
        );
        events.push(CombatEvent::BattleStarted {
            battle: key,
            first: battle.first(),
            second: battle.second(),
            paused: queued,
        });
        self.battles.insert(key, battle);
        self.check_invariants();

        if queued {
            ContactOutcome::Queued(key)
        } else {
            ContactOutcome::Engaged(key)
        }
    }

    /// Tick every unpaused battle once, in key order, then apply whatever
    /// resolved.
    pub fn advance(&mut self, world: &mut World, dt: f64, events: &mut Vec<CombatEvent>) {
        if self.battles.is_empty() {
            return;
        }

        let active: Vec<BattleKey> = self
            .battles
            .iter()
            .filter(|(_, battle)| !battle.is_paused())
            .map(|(key, _)| *key)
            .collect();

        let mut resolved = Vec::new();
        for key in active {
            let Some(battle) = self.battles.get_mut(&key) else {
                continue;
            };
            let first_id = battle.first();
            let second_id = battle.second();

            // Copy fighters out, fight, write them back so later battles in
            // this pass see the damage.
            let (mut first, mut second) = match (lookup(world, first_id), lookup(world, second_id)) {
                (Some(first), Some(second)) => (first, second),
                (first, second) => {
                    let survivor = match (first, second) {
                        (Some(_), None) => Some(first_id),
                        (None, Some(_)) => Some(second_id),
                        _ => None,
                    };
                    warn!(battle = %key, "battle lost a participant, abandoning");
                    resolved.push((key, battle.abandon(survivor)));
                    continue;
                }
            };

            match battle.tick(dt, &mut first, &mut second) {
                Ok(report) => {
                    for attack in &report.attacks {
                        trace!(
                            attacker = %attack.attacker,
                            defender = %attack.defender,
                            damage = attack.damage,
                            remaining = attack.remaining_health,
                            "attack"
                        );
                        events.push(CombatEvent::Attack {
                            attacker: attack.attacker,
                            defender: attack.defender,
                            damage: attack.damage,
                            remaining_health: attack.remaining_health,
                        });
                    }
                    store(world, first_id, first);
                    store(world, second_id, second);
                    if let Some(outcome) = report.outcome {
                        resolved.push((key, outcome));
                    }
                }
                Err(err) => {
                    report_violation(&err);
                    let outcome = match battle.state() {
                        battlebases_combat::BattleState::Resolved(outcome) => outcome,
                        _ => BattleOutcome::Abandoned { survivor: None },
                    };
                    resolved.push((key, outcome));
                }
            }
        }

        self.settle(world, resolved, events);
        self.check_invariants();
    }

    /// Remove resolved battles and propagate defeats: losers are reported once
    /// and dragged out of their other battles, winners go back to a paused
    /// target or are released.
    fn settle(
        &mut self,
        world: &World,
        resolved: Vec<(BattleKey, BattleOutcome)>,
        events: &mut Vec<CombatEvent>,
    ) {
        let mut queue: VecDeque<(BattleKey, BattleOutcome)> = resolved.into();
        let mut defeated = BTreeSet::new();
        let mut winners: Vec<FighterId> = Vec::new();

        while let Some((key, outcome)) = queue.pop_front() {
            if self.battles.remove(&key).is_none() {
                continue;
            }
            debug!(battle = %key, ?outcome, "battle resolved");

            let survivor = match outcome {
                BattleOutcome::Won { winner, loser } => {
                    if defeated.insert(loser) {
                        self.roster.remove(&loser);
                        match lookup(world, loser) {
                            Some(fighter) => events.push(CombatEvent::Defeated {
                                fighter: loser,
                                team: fighter.team,
                                kind: fighter.kind,
                            }),
                            None => warn!(fighter = %loser, "defeated fighter already gone"),
                        }
                        for (other_key, other) in &self.battles {
                            if let Some(opponent) = other.opponent_of(loser) {
                                queue.push_back((
                                    *other_key,
                                    BattleOutcome::Won {
                                        winner: opponent,
                                        loser,
                                    },
                                ));
                            }
                        }
                    }
                    Some(winner)
                }
                BattleOutcome::Abandoned { survivor } => {
                    for id in [key.low, key.high] {
                        if Some(id) != survivor && lookup(world, id).is_none() {
                            self.roster.remove(&id);
                        }
                    }
                    survivor
                }
            };
            if let Some(id) = survivor {
                if !winners.contains(&id) {
                    winners.push(id);
                }
            }
        }

        for winner in winners {
            if defeated.contains(&winner) || lookup(world, winner).is_none_or(|f| f.is_dead()) {
                continue;
            }
            self.release(winner, events);
        }
    }

    /// Put a winner back to work on its first paused target, or let it go.
    fn release(&mut self, fighter: FighterId, events: &mut Vec<CombatEvent>) {
        if self.attacking_battle(fighter).is_some() {
            return;
        }
        let next = self
            .battles
            .iter_mut()
            .find(|(_, battle)| battle.is_paused() && battle.is_attacker(fighter));
        if let Some((key, battle)) = next {
            battle.set_paused(false);
            debug!(battle = %key, "battle resumed");
            events.push(CombatEvent::BattleResumed { battle: *key });
        } else {
            debug!(%fighter, "victory, free to move");
            events.push(CombatEvent::VictoryFree { fighter });
        }
    }

    /// The unpaused battle in which `fighter` attacks, if any.
    pub fn attacking_battle(&self, fighter: FighterId) -> Option<BattleKey> {
        self.battles
            .iter()
            .find(|(_, battle)| !battle.is_paused() && battle.is_attacker(fighter))
            .map(|(key, _)| *key)
    }

    /// Whether `fighter` takes part in any battle, paused or not.
    pub fn is_engaged(&self, fighter: FighterId) -> bool {
        self.battles.keys().any(|key| key.contains(fighter))
    }

    pub fn battle(&self, key: BattleKey) -> Option<&Battle> {
        self.battles.get(&key)
    }

    /// All battles in key order.
    pub fn battles(&self) -> impl Iterator<Item = &Battle> {
        self.battles.values()
    }

    pub fn len(&self) -> usize {
        self.battles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    /// No fighter attacks in more than one unpaused battle.
    pub fn single_attack_holds(&self) -> bool {
        let mut attacking = BTreeSet::new();
        self.battles
            .values()
            .filter(|battle| !battle.is_paused())
            .flat_map(|battle| {
                let second = (!battle.only_first_can_attack()).then_some(battle.second());
                std::iter::once(battle.first()).chain(second)
            })
            .all(|id| attacking.insert(id))
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.single_attack_holds(),
            "a fighter attacks in more than one unpaused battle"
        );
    }
}

fn lookup(world: &World, id: FighterId) -> Option<Fighter> {
    let entity = entity_of(id)?;
    world.get::<&Fighter>(entity).ok().map(|fighter| *fighter)
}

fn store(world: &World, id: FighterId, fighter: Fighter) {
    if let Some(mut slot) = entity_of(id).and_then(|e| world.get::<&mut Fighter>(e).ok()) {
        *slot = fighter;
    }
}

/// Walk progress for initiative. Fighters without a walker cannot move.
fn walk_progress(world: &World, id: FighterId) -> Option<WalkProgress> {
    let entity = entity_of(id)?;
    let walker = world.get::<&Walker>(entity).ok()?;
    Some(WalkProgress::new(
        walker.phase == WalkPhase::Walking,
        walker.cur_walk_time,
        walker.walk_speed,
    ))
}

fn report_violation(err: &CombatError) {
    error!(%err, "combat invariant violated");
    debug_assert!(false, "combat invariant violated: {err}");
}
