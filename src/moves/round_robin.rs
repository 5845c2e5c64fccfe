//! Round-robin templates: visit each player in turn.
//!
//! A round robin visits players seat by seat, applying a per-player
//! action and skipping players whose per-player condition already
//! holds. Progress lives on game state behind the
//! [`RoundRobinProperties`] capability, as a small state machine:
//!
//! - *inactive* (`has_started == false`): the stored fields are
//!   leftovers from a prior run.
//! - *active*: `last_player` is the most recently visited seat,
//!   `starter_player` anchors circuit detection, and `round_count`
//!   tallies crossings of the starter.
//!
//! The first apply activates the machine; each apply advances to the
//! next unmet player and acts on them; the apply that finds the exit
//! condition satisfied deactivates it. Legality guards against
//! immediate re-entry so a finished round robin cannot restart in the
//! same breath.

use log::debug;

use crate::core::{GameState, GameplayState, PlayerId};
use crate::manager::{GameDelegate, GameManager};

use super::base::Move;
use super::config::{CustomConfig, MoveInfo};
use super::error::{ApplyError, ConfigError, LegalError};

/// The round-robin bookkeeping capability on game state.
pub trait RoundRobinProperties {
    /// Whether a round robin is in progress.
    fn round_robin_has_started(&self) -> bool;
    /// Set whether a round robin is in progress.
    fn set_round_robin_has_started(&mut self, started: bool);
    /// The most recently visited player.
    fn round_robin_last_player(&self) -> PlayerId;
    /// Record the most recently visited player.
    fn set_round_robin_last_player(&mut self, player: PlayerId);
    /// The player the circuit started from.
    fn round_robin_starter_player(&self) -> PlayerId;
    /// Record the circuit anchor.
    fn set_round_robin_starter_player(&mut self, player: PlayerId);
    /// Times the starter has been crossed since the circuit began.
    fn round_robin_round_count(&self) -> u64;
    /// Overwrite the crossing tally.
    fn set_round_robin_round_count(&mut self, count: u64);
}

impl RoundRobinProperties for GameplayState {
    fn round_robin_has_started(&self) -> bool {
        self.round_robin.has_started
    }

    fn set_round_robin_has_started(&mut self, started: bool) {
        self.round_robin.has_started = started;
    }

    fn round_robin_last_player(&self) -> PlayerId {
        self.round_robin.last_player
    }

    fn set_round_robin_last_player(&mut self, player: PlayerId) {
        self.round_robin.last_player = player;
    }

    fn round_robin_starter_player(&self) -> PlayerId {
        self.round_robin.starter_player
    }

    fn set_round_robin_starter_player(&mut self, player: PlayerId) {
        self.round_robin.starter_player = player;
    }

    fn round_robin_round_count(&self) -> u64 {
        self.round_robin.round_count
    }

    fn set_round_robin_round_count(&mut self, count: u64) {
        self.round_robin.round_count = count;
    }
}

/// The operations a round-robin template needs from its host.
///
/// Checked at installation, not on every call.
pub trait RoundRobinHooks: Send + Sync {
    /// Visit one player.
    fn round_robin_action(
        &self,
        custom: &CustomConfig,
        state: &mut GameState,
        player: PlayerId,
    ) -> Result<(), ApplyError>;

    /// Whether this player needs no further visits. Met players are
    /// skipped by the next-player search.
    fn player_condition_met(
        &self,
        _custom: &CustomConfig,
        _state: &GameState,
        _player: PlayerId,
    ) -> bool {
        false
    }

    /// The circuit anchor. Defaults to the delegate's current player.
    fn starter_player(&self, manager: &GameManager, state: &GameState) -> PlayerId {
        manager.delegate().current_player(state)
    }

    /// Overall termination override. `None` defers to the template's
    /// own exit rule (all players met, or the round limit).
    fn condition_met(&self, _custom: &CustomConfig, _state: &GameState) -> Option<bool> {
        None
    }

    /// Per-step legality beyond the shared gates and re-entry guard.
    fn extra_legal(&self, _custom: &CustomConfig, _state: &GameState) -> Result<(), LegalError> {
        Ok(())
    }

    /// Installation checks (e.g. that named stacks resolve).
    fn validate(&self, _custom: &CustomConfig, _manager: &GameManager) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Name used when no `MoveName` override is configured.
    fn fallback_name(&self) -> String {
        "Round Robin".to_string()
    }
}

/// Which config option supplies the round limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoundLimit {
    /// No limit: exit when every player's condition is met.
    None,
    /// The `NumRounds` option (default 1).
    NumRounds,
    /// The `TargetCount` option (default 1); the deal/collect
    /// count-times templates run one round per component dealt.
    TargetCount,
}

/// Visits each player in turn until its exit condition holds.
pub struct RoundRobin<H: RoundRobinHooks> {
    info: MoveInfo,
    hooks: H,
    limit: RoundLimit,
}

impl<H: RoundRobinHooks> RoundRobin<H> {
    /// A round robin that exits once every player's condition is met.
    #[must_use]
    pub fn new(hooks: H) -> Self {
        Self {
            info: MoveInfo::default(),
            hooks,
            limit: RoundLimit::None,
        }
    }

    /// A round robin that also exits after `NumRounds` full circuits.
    #[must_use]
    pub fn num_rounds(hooks: H) -> Self {
        Self {
            info: MoveInfo::default(),
            hooks,
            limit: RoundLimit::NumRounds,
        }
    }

    /// A round robin whose circuit limit comes from `TargetCount`.
    pub(crate) fn rounds_from_target_count(hooks: H) -> Self {
        Self {
            info: MoveInfo::default(),
            hooks,
            limit: RoundLimit::TargetCount,
        }
    }

    fn round_limit(&self, custom: &CustomConfig) -> Option<u64> {
        let value = match self.limit {
            RoundLimit::None => return None,
            RoundLimit::NumRounds => custom.num_rounds(),
            RoundLimit::TargetCount => custom.target_count(),
        };
        Some(value.unwrap_or(1).max(0) as u64)
    }

    /// Search for the next player whose condition is unmet.
    ///
    /// Starts after `last` and advances at most N+1 seats. The second
    /// return is the round-skip flag: whether the search crossed or
    /// landed on the starter.
    fn next_unmet_player(
        &self,
        custom: &CustomConfig,
        state: &GameState,
        starter: PlayerId,
        last: PlayerId,
    ) -> (Option<PlayerId>, bool) {
        let n = state.player_count();
        let mut player = last;
        let mut crossed = false;
        for _ in 0..=n {
            player = player.next(n);
            if player == starter {
                crossed = true;
            }
            if !self.hooks.player_condition_met(custom, state, player) {
                return (Some(player), crossed);
            }
        }
        (None, crossed)
    }

    fn all_players_met(&self, custom: &CustomConfig, state: &GameState) -> bool {
        PlayerId::all(state.player_count())
            .all(|player| self.hooks.player_condition_met(custom, state, player))
    }

    /// Whether the round robin should stop after the step just taken.
    fn exit_condition(&self, custom: &CustomConfig, state: &GameState) -> bool {
        if let Some(met) = self.hooks.condition_met(custom, state) {
            return met;
        }

        if let Some(limit) = self.round_limit(custom) {
            let rr = state.game.round_robin;
            if rr.round_count >= limit {
                // The limit counts *completed* circuits: we are done
                // only when the next advance would cross the starter
                // again (or nobody is left to visit).
                let (next, crossed) =
                    self.next_unmet_player(custom, state, rr.starter_player, rr.last_player);
                if crossed || next.is_none() {
                    return true;
                }
            }
        }

        self.all_players_met(custom, state)
    }
}

impl<H: RoundRobinHooks> Move for RoundRobin<H> {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, _delegate: &dyn GameDelegate) -> String {
        self.hooks.fallback_name()
    }

    fn fallback_help_text(&self) -> String {
        "Visits each player in turn until its condition is met.".to_string()
    }

    fn default_fix_up(&self) -> bool {
        true
    }

    fn allow_multiple_in_progression(&self) -> bool {
        true
    }

    fn validate(&self, manager: &GameManager) -> Result<(), ConfigError> {
        self.hooks.validate(self.info.custom(), manager)
    }

    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)?;

        // A finished round robin must not restart off its own record:
        // the manager would loop starting it forever.
        if !state.game.round_robin_has_started() {
            if let Some(record) = state.last_record() {
                if record.name == self.name() {
                    return Err(LegalError::RoundRobinReentry);
                }
            }
        }

        self.hooks.extra_legal(self.info.custom(), state)
    }

    fn apply(&self, manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError> {
        let n = state.player_count();
        let custom = self.info.custom();

        if !state.game.round_robin_has_started() {
            let starter = self.hooks.starter_player(manager, state);
            state.game.set_round_robin_starter_player(starter);
            state.game.set_round_robin_last_player(starter.prev(n));
            state.game.set_round_robin_round_count(0);
            state.game.set_round_robin_has_started(true);
            debug!("round robin {:?} started at {starter}", self.name());
        }

        let starter = state.game.round_robin_starter_player();
        let last = state.game.round_robin_last_player();

        let (next, crossed) = self.next_unmet_player(custom, state, starter, last);
        match next {
            None => {
                // Every player already met: nothing to do.
                state.game.set_round_robin_has_started(false);
                return Ok(());
            }
            Some(player) => {
                if crossed {
                    let count = state.game.round_robin_round_count() + 1;
                    state.game.set_round_robin_round_count(count);
                }
                state.game.set_round_robin_last_player(player);
                self.hooks.round_robin_action(custom, state, player)?;
            }
        }

        if self.exit_condition(custom, state) {
            state.game.set_round_robin_has_started(false);
            debug!(
                "round robin {:?} finished after {} crossings",
                self.name(),
                state.game.round_robin_round_count()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{DefaultDelegate, Game, GameManager};
    use crate::moves::auto::AutoConfigurer;
    use crate::moves::config::factory;

    /// Gives the visited player one point, up to the amount option.
    #[derive(Clone, Copy)]
    struct PointsHooks {
        /// Stop visiting a player once they hold this many points.
        per_player_target: i64,
    }

    impl RoundRobinHooks for PointsHooks {
        fn round_robin_action(
            &self,
            _custom: &CustomConfig,
            state: &mut GameState,
            player: PlayerId,
        ) -> Result<(), ApplyError> {
            let next = state.players[player].property("points", 0) + 1;
            state.players[player].set_property("points", next);
            Ok(())
        }

        fn player_condition_met(
            &self,
            _custom: &CustomConfig,
            state: &GameState,
            player: PlayerId,
        ) -> bool {
            state.players[player].property("points", 0) >= self.per_player_target
        }

        fn fallback_name(&self) -> String {
            "Give Points".to_string()
        }
    }

    fn install(config: crate::moves::MoveConfig) -> GameManager {
        GameManager::new(
            Game::new("round-robin-test", vec![config]),
            Box::new(DefaultDelegate),
            GameState::new(4, 42),
        )
        .unwrap()
    }

    fn drive(manager: &GameManager, name: &str, state: &mut GameState) -> usize {
        let mut applications = 0;
        while manager.is_legal(name, state, PlayerId::new(0)).is_ok() {
            manager.propose(name, state, PlayerId::new(0)).unwrap();
            applications += 1;
            assert!(applications < 100, "round robin never terminated");
        }
        applications
    }

    fn points(state: &GameState) -> Vec<i64> {
        PlayerId::all(state.player_count())
            .map(|p| state.players[p].property("points", 0))
            .collect()
    }

    #[test]
    fn test_visits_all_players_until_met() {
        let auto = AutoConfigurer::new(&DefaultDelegate);
        let config = auto.must_config(
            factory(|| RoundRobin::new(PointsHooks { per_player_target: 2 })),
            CustomConfig::new(),
        );
        let manager = install(config);
        let mut state = GameState::new(4, 42);

        let applications = drive(&manager, "Give Points", &mut state);

        assert_eq!(applications, 8);
        assert_eq!(points(&state), vec![2, 2, 2, 2]);
        assert!(!state.game.round_robin.has_started);
        assert_eq!(state.game.round_robin.round_count, 2);
    }

    #[test]
    fn test_skips_players_already_met() {
        let auto = AutoConfigurer::new(&DefaultDelegate);
        let config = auto.must_config(
            factory(|| RoundRobin::new(PointsHooks { per_player_target: 1 })),
            CustomConfig::new(),
        );
        let manager = install(config);
        let mut state = GameState::new(4, 42);
        // Player 1 is met before the circuit starts.
        state.players[PlayerId::new(1)].set_property("points", 5);

        let applications = drive(&manager, "Give Points", &mut state);

        assert_eq!(applications, 3);
        assert_eq!(points(&state), vec![1, 5, 1, 1]);
    }

    #[test]
    fn test_starter_is_current_player() {
        let auto = AutoConfigurer::new(&DefaultDelegate);
        let config = auto.must_config(
            factory(|| RoundRobin::new(PointsHooks { per_player_target: 1 })),
            CustomConfig::new(),
        );
        let manager = install(config);
        let mut state = GameState::new(4, 42);
        state.current_player = PlayerId::new(2);

        manager
            .propose("Give Points", &mut state, PlayerId::new(2))
            .unwrap();

        // The starter acts first.
        assert_eq!(points(&state), vec![0, 0, 1, 0]);
        assert_eq!(
            state.game.round_robin.starter_player,
            PlayerId::new(2)
        );
        assert_eq!(state.game.round_robin.last_player, PlayerId::new(2));
    }

    #[test]
    fn test_num_rounds_limits_circuits() {
        let auto = AutoConfigurer::new(&DefaultDelegate);
        let config = auto.must_config(
            factory(|| RoundRobin::num_rounds(PointsHooks { per_player_target: i64::MAX })),
            CustomConfig::new().with_num_rounds(3),
        );
        let manager = install(config);
        let mut state = GameState::new(4, 42);

        let applications = drive(&manager, "Give Points", &mut state);

        assert_eq!(applications, 12);
        assert_eq!(points(&state), vec![3, 3, 3, 3]);
        assert_eq!(state.game.round_robin.round_count, 3);
        assert!(!state.game.round_robin.has_started);
    }

    #[test]
    fn test_reentry_guard() {
        let auto = AutoConfigurer::new(&DefaultDelegate);
        let config = auto.must_config(
            factory(|| RoundRobin::new(PointsHooks { per_player_target: 1 })),
            CustomConfig::new(),
        );
        let manager = install(config);
        let mut state = GameState::new(4, 42);

        drive(&manager, "Give Points", &mut state);

        // The round robin is inactive and the last record bears its
        // name, so an immediate restart is rejected.
        assert_eq!(
            manager.is_legal("Give Points", &state, PlayerId::new(0)),
            Err(LegalError::RoundRobinReentry.into())
        );

        // Another move landing in the history clears the guard.
        state.record_move("Something Else", state.phase, PlayerId::new(0));
        assert!(manager
            .is_legal("Give Points", &state, PlayerId::new(0))
            .is_ok());
    }

    #[test]
    fn test_round_robin_properties_roundtrip() {
        let mut game = GameplayState::new();

        assert!(!game.round_robin_has_started());
        game.set_round_robin_has_started(true);
        game.set_round_robin_starter_player(PlayerId::new(2));
        game.set_round_robin_last_player(PlayerId::new(1));
        game.set_round_robin_round_count(4);

        assert!(game.round_robin_has_started());
        assert_eq!(game.round_robin_starter_player(), PlayerId::new(2));
        assert_eq!(game.round_robin_last_player(), PlayerId::new(1));
        assert_eq!(game.round_robin_round_count(), 4);
    }
}
