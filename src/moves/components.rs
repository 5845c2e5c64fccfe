//! Component-moving templates: deal, collect, and move.
//!
//! Three subjects share one action - move one component from the first
//! occupied slot of a source stack to the first free slot of a
//! destination stack:
//!
//! - **Deal**: game stack to each player's stack, round-robin.
//! - **Collect**: each player's stack to the game stack, round-robin.
//! - **Move**: fixed source stack to fixed destination stack.
//!
//! Each subject terminates by count-times, until-player-count
//! reached/left, until-game-count reached/left, or "all" (which forces
//! the target to 0 regardless of any configured override).
//!
//! Stacks resolve by name through the `GameProperty`/`PlayerProperty`
//! options (deal/collect) or `SourceProperty`/`DestinationProperty`
//! (move); a name that does not resolve on the example state fails
//! installation.

use crate::core::GameState;
use crate::manager::GameManager;
use crate::stacks::{move_component, Stack};

use super::apply_until::{ApplyCountTimes, ApplyUntilCount, ApplyUntilHooks};
use super::config::CustomConfig;
use super::error::{ApplyError, ConfigError, LegalError};
use super::round_robin::{RoundRobin, RoundRobinHooks};

/// Which way a round-robin transfer flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransferDirection {
    /// Game stack to player stacks.
    Deal,
    /// Player stacks to game stack.
    Collect,
}

/// How a round-robin transfer decides it is finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransferTermination {
    /// One full circuit per target-count unit; rounds do the counting.
    CountTimes,
    /// Each player's stack has climbed to the target.
    PlayerCountReached,
    /// Each player's stack has fallen to the target.
    PlayerCountLeft,
    /// The game stack has climbed to the target.
    GameCountReached,
    /// The game stack has fallen to the target.
    GameCountLeft,
}

/// Round-robin hooks moving components between the game stack and the
/// visited player's stack.
pub struct ComponentTransfer {
    direction: TransferDirection,
    termination: TransferTermination,
    /// Overrides any configured `TargetCount` (the "all" variants pin 0).
    forced_target: Option<i64>,
    fallback: &'static str,
}

impl ComponentTransfer {
    fn target(&self, custom: &CustomConfig) -> i64 {
        self.forced_target
            .unwrap_or_else(|| custom.target_count().unwrap_or(1))
    }
}

impl RoundRobinHooks for ComponentTransfer {
    fn round_robin_action(
        &self,
        custom: &CustomConfig,
        state: &mut GameState,
        player: crate::core::PlayerId,
    ) -> Result<(), ApplyError> {
        let game_name = custom.game_property().ok_or(ApplyError::MissingOption {
            option: "GameProperty",
        })?;
        let player_name = custom.player_property().ok_or(ApplyError::MissingOption {
            option: "PlayerProperty",
        })?;

        let game_stack = state
            .game
            .stack_mut(game_name)
            .ok_or_else(|| ApplyError::MissingStack {
                name: game_name.to_string(),
            })?;
        let player_stack =
            state.players[player]
                .stack_mut(player_name)
                .ok_or_else(|| ApplyError::MissingStack {
                    name: player_name.to_string(),
                })?;

        match self.direction {
            TransferDirection::Deal => move_component(game_stack, player_stack)?,
            TransferDirection::Collect => move_component(player_stack, game_stack)?,
        }
        Ok(())
    }

    fn player_condition_met(
        &self,
        custom: &CustomConfig,
        state: &GameState,
        player: crate::core::PlayerId,
    ) -> bool {
        match self.termination {
            TransferTermination::PlayerCountReached | TransferTermination::PlayerCountLeft => {
                let Some(name) = custom.player_property() else {
                    return false;
                };
                let Some(stack) = state.players[player].stack(name) else {
                    return false;
                };
                let count = stack.num_components() as i64;
                let target = self.target(custom);
                match self.termination {
                    TransferTermination::PlayerCountReached => count >= target,
                    _ => count <= target,
                }
            }
            _ => false,
        }
    }

    fn condition_met(&self, custom: &CustomConfig, state: &GameState) -> Option<bool> {
        match self.termination {
            TransferTermination::GameCountReached | TransferTermination::GameCountLeft => {
                let stack = state.game.stack(custom.game_property()?)?;
                let count = stack.num_components() as i64;
                let target = self.target(custom);
                Some(match self.termination {
                    TransferTermination::GameCountReached => count >= target,
                    _ => count <= target,
                })
            }
            _ => None,
        }
    }

    fn extra_legal(&self, custom: &CustomConfig, state: &GameState) -> Result<(), LegalError> {
        let game_name = custom
            .game_property()
            .ok_or_else(|| LegalError::Other("GameProperty is not configured".to_string()))?;
        let player_name = custom
            .player_property()
            .ok_or_else(|| LegalError::Other("PlayerProperty is not configured".to_string()))?;

        let game_stack = state
            .game
            .stack(game_name)
            .ok_or_else(|| LegalError::Other(format!("no game stack named {game_name:?}")))?;
        let player_stacks: Vec<&Stack> = state
            .players
            .iter()
            .filter_map(|(_, player)| player.stack(player_name))
            .collect();

        match self.direction {
            TransferDirection::Deal => {
                if game_stack.is_empty() {
                    return Err(LegalError::SourceEmpty);
                }
                if !player_stacks.iter().any(|stack| stack.has_slot()) {
                    return Err(LegalError::DestinationFull);
                }
            }
            TransferDirection::Collect => {
                if player_stacks.iter().all(|stack| stack.is_empty()) {
                    return Err(LegalError::SourceEmpty);
                }
                if !game_stack.has_slot() {
                    return Err(LegalError::DestinationFull);
                }
            }
        }
        Ok(())
    }

    fn validate(&self, custom: &CustomConfig, manager: &GameManager) -> Result<(), ConfigError> {
        let game_name = custom.game_property().ok_or(ConfigError::MissingOption {
            option: "GameProperty",
        })?;
        let player_name = custom.player_property().ok_or(ConfigError::MissingOption {
            option: "PlayerProperty",
        })?;

        let example = manager.example_state();
        if example.game.stack(game_name).is_none() {
            return Err(ConfigError::MissingGameStack {
                name: game_name.to_string(),
            });
        }
        for (_, player) in example.players.iter() {
            if player.stack(player_name).is_none() {
                return Err(ConfigError::MissingPlayerStack {
                    name: player_name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn fallback_name(&self) -> String {
        self.fallback.to_string()
    }
}

/// Deal `TargetCount` components to each player, one circuit per unit.
#[must_use]
pub fn deal_count_components() -> RoundRobin<ComponentTransfer> {
    RoundRobin::rounds_from_target_count(ComponentTransfer {
        direction: TransferDirection::Deal,
        termination: TransferTermination::CountTimes,
        forced_target: None,
        fallback: "Deal Components",
    })
}

/// Deal until each player's stack holds `TargetCount` components.
#[must_use]
pub fn deal_components_until_player_count_reached() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Deal,
        termination: TransferTermination::PlayerCountReached,
        forced_target: None,
        fallback: "Deal Components Until Player Count Reached",
    })
}

/// Deal until each player's stack has fallen to `TargetCount`.
#[must_use]
pub fn deal_components_until_player_count_left() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Deal,
        termination: TransferTermination::PlayerCountLeft,
        forced_target: None,
        fallback: "Deal Components Until Player Count Left",
    })
}

/// Deal until the game stack has climbed to `TargetCount`.
#[must_use]
pub fn deal_components_until_game_count_reached() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Deal,
        termination: TransferTermination::GameCountReached,
        forced_target: None,
        fallback: "Deal Components Until Game Count Reached",
    })
}

/// Deal until the game stack has fallen to `TargetCount`.
#[must_use]
pub fn deal_components_until_game_count_left() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Deal,
        termination: TransferTermination::GameCountLeft,
        forced_target: None,
        fallback: "Deal Components Until Game Count Left",
    })
}

/// Deal until the game stack is empty. Ignores any configured target.
#[must_use]
pub fn deal_all_components() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Deal,
        termination: TransferTermination::GameCountLeft,
        forced_target: Some(0),
        fallback: "Deal All Components",
    })
}

/// Collect `TargetCount` components from each player.
#[must_use]
pub fn collect_count_components() -> RoundRobin<ComponentTransfer> {
    RoundRobin::rounds_from_target_count(ComponentTransfer {
        direction: TransferDirection::Collect,
        termination: TransferTermination::CountTimes,
        forced_target: None,
        fallback: "Collect Components",
    })
}

/// Collect until each player's stack has fallen to `TargetCount`.
#[must_use]
pub fn collect_components_until_player_count_left() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Collect,
        termination: TransferTermination::PlayerCountLeft,
        forced_target: None,
        fallback: "Collect Components Until Player Count Left",
    })
}

/// Collect until each player's stack has climbed to `TargetCount`.
#[must_use]
pub fn collect_components_until_player_count_reached() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Collect,
        termination: TransferTermination::PlayerCountReached,
        forced_target: None,
        fallback: "Collect Components Until Player Count Reached",
    })
}

/// Collect until the game stack has climbed to `TargetCount`.
#[must_use]
pub fn collect_components_until_game_count_reached() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Collect,
        termination: TransferTermination::GameCountReached,
        forced_target: None,
        fallback: "Collect Components Until Game Count Reached",
    })
}

/// Collect until the game stack has fallen to `TargetCount`.
#[must_use]
pub fn collect_components_until_game_count_left() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Collect,
        termination: TransferTermination::GameCountLeft,
        forced_target: None,
        fallback: "Collect Components Until Game Count Left",
    })
}

/// Collect until every player's stack is empty. Ignores any configured
/// target.
#[must_use]
pub fn collect_all_components() -> RoundRobin<ComponentTransfer> {
    RoundRobin::new(ComponentTransfer {
        direction: TransferDirection::Collect,
        termination: TransferTermination::PlayerCountLeft,
        forced_target: Some(0),
        fallback: "Collect All Components",
    })
}

/// Where [`FixedTransfer`] reads its counter from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CountSource {
    /// The destination stack's component count.
    Destination,
    /// The source stack's component count.
    Source,
}

/// Apply-until hooks moving components between two fixed game stacks.
pub struct FixedTransfer {
    count_source: CountSource,
    forced_target: Option<i64>,
    fallback: &'static str,
}

impl FixedTransfer {
    fn stack_names<'a>(custom: &'a CustomConfig) -> Result<(&'a str, &'a str), ApplyError> {
        let source = custom.source_property().ok_or(ApplyError::MissingOption {
            option: "SourceProperty",
        })?;
        let destination = custom
            .destination_property()
            .ok_or(ApplyError::MissingOption {
                option: "DestinationProperty",
            })?;
        Ok((source, destination))
    }
}

impl ApplyUntilHooks for FixedTransfer {
    fn apply_step(&self, custom: &CustomConfig, state: &mut GameState) -> Result<(), ApplyError> {
        let (source_name, dest_name) = Self::stack_names(custom)?;
        if source_name == dest_name {
            return Err(ApplyError::Invariant(
                "source and destination are the same stack".to_string(),
            ));
        }

        // Both stacks live in the same named-stack map, so lift the
        // source out while the destination is borrowed.
        let mut source = state
            .game
            .remove_stack(source_name)
            .ok_or_else(|| ApplyError::MissingStack {
                name: source_name.to_string(),
            })?;
        let result = match state.game.stack_mut(dest_name) {
            None => Err(ApplyError::MissingStack {
                name: dest_name.to_string(),
            }),
            Some(dest) => move_component(&mut source, dest).map_err(ApplyError::from),
        };
        state.game.insert_stack(source_name, source);
        result
    }

    fn count(&self, custom: &CustomConfig, state: &GameState) -> i64 {
        let Ok((source_name, dest_name)) = Self::stack_names(custom) else {
            return 0;
        };
        let name = match self.count_source {
            CountSource::Destination => dest_name,
            CountSource::Source => source_name,
        };
        state
            .game
            .stack(name)
            .map_or(0, |stack| stack.num_components() as i64)
    }

    fn target_count(&self, custom: &CustomConfig) -> i64 {
        self.forced_target
            .unwrap_or_else(|| custom.target_count().unwrap_or(1))
    }

    fn extra_legal(&self, custom: &CustomConfig, state: &GameState) -> Result<(), LegalError> {
        let (source_name, dest_name) = Self::stack_names(custom)
            .map_err(|err| LegalError::Other(err.to_string()))?;

        let source = state
            .game
            .stack(source_name)
            .ok_or_else(|| LegalError::Other(format!("no game stack named {source_name:?}")))?;
        let dest = state
            .game
            .stack(dest_name)
            .ok_or_else(|| LegalError::Other(format!("no game stack named {dest_name:?}")))?;

        if source.is_empty() {
            return Err(LegalError::SourceEmpty);
        }
        if !dest.has_slot() {
            return Err(LegalError::DestinationFull);
        }
        Ok(())
    }

    fn validate(&self, custom: &CustomConfig, manager: &GameManager) -> Result<(), ConfigError> {
        let source = custom.source_property().ok_or(ConfigError::MissingOption {
            option: "SourceProperty",
        })?;
        let destination = custom
            .destination_property()
            .ok_or(ConfigError::MissingOption {
                option: "DestinationProperty",
            })?;

        let example = manager.example_state();
        for name in [source, destination] {
            if example.game.stack(name).is_none() {
                return Err(ConfigError::MissingGameStack {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn fallback_name(&self) -> String {
        self.fallback.to_string()
    }
}

/// Move `TargetCount` components from source to destination.
#[must_use]
pub fn move_count_components() -> ApplyCountTimes<FixedTransfer> {
    ApplyCountTimes::new(FixedTransfer {
        count_source: CountSource::Destination,
        forced_target: None,
        fallback: "Move Components",
    })
}

/// Move until the destination stack has climbed to `TargetCount`.
#[must_use]
pub fn move_components_until_count_reached() -> ApplyUntilCount<FixedTransfer> {
    ApplyUntilCount::until_reached(FixedTransfer {
        count_source: CountSource::Destination,
        forced_target: None,
        fallback: "Move Components Until Count Reached",
    })
}

/// Move until the source stack has fallen to `TargetCount`.
#[must_use]
pub fn move_components_until_count_left() -> ApplyUntilCount<FixedTransfer> {
    ApplyUntilCount::until_left(FixedTransfer {
        count_source: CountSource::Source,
        forced_target: None,
        fallback: "Move Components Until Count Left",
    })
}

/// Move until the source stack is empty. Ignores any configured target.
#[must_use]
pub fn move_all_components() -> ApplyUntilCount<FixedTransfer> {
    ApplyUntilCount::until_left(FixedTransfer {
        count_source: CountSource::Source,
        forced_target: Some(0),
        fallback: "Move All Components",
    })
}
