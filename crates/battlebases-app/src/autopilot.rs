//! A minimal opponent: each team buys the cheapest unit it can afford,
//! rotating through its standing outposts.

use std::time::Duration;

use tracing::error;

use battlebases_core::commands::PlayerCommand;
use battlebases_core::config::{GameConfig, UnitOffer};
use battlebases_core::enums::{GamePhase, Team};
use battlebases_core::state::GameStateSnapshot;

use crate::state::{HostError, HostState};

/// How often [`run_match`] polls the host for a fresh snapshot.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Autopilot {
    team: Team,
    next_outpost: usize,
}

impl Autopilot {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            next_outpost: 0,
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    /// Decide on a purchase given the latest snapshot, if any is possible.
    pub fn plan(&mut self, snapshot: &GameStateSnapshot, config: &GameConfig) -> Option<PlayerCommand> {
        if snapshot.phase != GamePhase::Active {
            return None;
        }
        let treasury = snapshot.treasuries.iter().find(|t| t.team == self.team)?;
        if treasury.outposts.is_empty() {
            return None;
        }
        let offer = cheapest_offer(config)?;
        if treasury.funds < offer.cost {
            return None;
        }

        let outpost = treasury.outposts[self.next_outpost % treasury.outposts.len()];
        self.next_outpost = self.next_outpost.wrapping_add(1);
        Some(PlayerCommand::PurchaseUnit {
            team: self.team,
            outpost,
            unit: offer.name.clone(),
        })
    }
}

/// Drive a running host with `pilots` until the match ends, `max_ticks` pass,
/// or the game loop dies. Returns the last snapshot seen.
pub fn run_match(
    host: &HostState,
    pilots: &mut [Autopilot],
    config: &GameConfig,
    max_ticks: u64,
) -> Option<GameStateSnapshot> {
    let mut last = None;
    loop {
        std::thread::sleep(POLL_INTERVAL);
        if let Some(snapshot) = host.snapshot() {
            last = Some(snapshot);
        }
        if host.has_stopped() {
            error!("game loop stopped before the match ended");
            return last;
        }
        let Some(snapshot) = &last else {
            continue;
        };
        if snapshot.phase == GamePhase::MatchOver || snapshot.time.tick >= max_ticks {
            return last;
        }

        let mut stopped = false;
        for pilot in pilots.iter_mut() {
            let Some(command) = pilot.plan(snapshot, config) else {
                continue;
            };
            match host.send_command(command) {
                Ok(()) => {}
                Err(HostError::LoopStopped) => {
                    stopped = true;
                    break;
                }
                Err(err) => error!(%err, team = ?pilot.team(), "command not delivered"),
            }
        }
        if stopped {
            error!("game loop stopped before the match ended");
            return last;
        }
    }
}

fn cheapest_offer(config: &GameConfig) -> Option<&UnitOffer> {
    config.purchase_list.iter().min_by_key(|offer| offer.cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use battlebases_core::state::TreasuryView;

    fn snapshot(funds: u32, outposts: Vec<u32>) -> GameStateSnapshot {
        GameStateSnapshot {
            phase: GamePhase::Active,
            treasuries: vec![TreasuryView {
                team: Team::Red,
                funds,
                outposts,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_buys_cheapest_round_robin() {
        let config = GameConfig::default();
        let mut pilot = Autopilot::new(Team::Red);
        let snap = snapshot(100, vec![0, 1]);

        let picks: Vec<_> = (0..3).filter_map(|_| pilot.plan(&snap, &config)).collect();
        let outposts: Vec<u32> = picks
            .iter()
            .map(|cmd| match cmd {
                PlayerCommand::PurchaseUnit { outpost, unit, .. } => {
                    assert_eq!(unit, "Soldier");
                    *outpost
                }
                other => panic!("unexpected command {other:?}"),
            })
            .collect();
        assert_eq!(outposts, vec![0, 1, 0]);
    }

    #[test]
    fn test_waits_when_poor_or_outpostless() {
        let config = GameConfig::default();
        let mut pilot = Autopilot::new(Team::Red);
        assert!(pilot.plan(&snapshot(5, vec![0]), &config).is_none());
        assert!(pilot.plan(&snapshot(100, vec![]), &config).is_none());

        let mut paused = snapshot(100, vec![0]);
        paused.phase = GamePhase::Paused;
        assert!(pilot.plan(&paused, &config).is_none());

        // No treasury for this team at all.
        assert!(Autopilot::new(Team::Blue)
            .plan(&snapshot(100, vec![0]), &config)
            .is_none());
    }

    #[test]
    fn test_run_match_returns_when_loop_dies() {
        let host = HostState::new();
        let mut ticks = 0;
        host.start_simulation_with_sink(battlebases_sim::SimConfig::default(), move |_| {
            ticks += 1;
            if ticks > 3 {
                panic!("sink gave up");
            }
        })
        .unwrap();

        let mut pilots = [Autopilot::new(Team::Red), Autopilot::new(Team::Blue)];
        let last = run_match(&host, &mut pilots, &GameConfig::default(), u64::MAX);
        let last = last.expect("loop published snapshots before dying");
        assert_ne!(last.phase, GamePhase::MatchOver);
        assert!(host.has_stopped());
    }

    #[test]
    fn test_run_match_stops_at_tick_limit() {
        let host = HostState::new();
        host.start_simulation(battlebases_sim::SimConfig {
            time_scale: 4.0,
            ..Default::default()
        })
        .unwrap();
        host.send_command(PlayerCommand::StartMatch).unwrap();

        let mut pilots = [Autopilot::new(Team::Red), Autopilot::new(Team::Blue)];
        let last = run_match(&host, &mut pilots, &GameConfig::default(), 10).unwrap();
        assert!(last.time.tick >= 10);
        host.shutdown().unwrap();
    }
}
