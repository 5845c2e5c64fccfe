//! The move system: template base, higher-order templates, and the
//! auto-configurer.

pub mod apply_until;
pub mod auto;
pub mod base;
pub mod components;
pub mod config;
pub mod error;
pub mod install;
pub mod round_robin;
pub mod start_phase;

pub use apply_until::{
    ApplyCountTimes, ApplyUntil, ApplyUntilCount, ApplyUntilHooks, CountDirection,
};
pub use auto::AutoConfigurer;
pub use base::{display_name, Move};
pub use components::{
    collect_all_components, collect_components_until_game_count_left,
    collect_components_until_game_count_reached, collect_components_until_player_count_left,
    collect_components_until_player_count_reached, collect_count_components, deal_all_components,
    deal_components_until_game_count_left, deal_components_until_game_count_reached,
    deal_components_until_player_count_left, deal_components_until_player_count_reached,
    deal_count_components, move_all_components, move_components_until_count_left,
    move_components_until_count_reached, move_count_components, ComponentTransfer, FixedTransfer,
};
pub use config::{factory, CustomConfig, MoveConfig, MoveFactory, MoveInfo};
pub use error::{ApplyError, ConfigError, LegalError};
pub use install::{add, add_for_phase, add_ordered_for_phase, combine};
pub use round_robin::{RoundRobin, RoundRobinHooks, RoundRobinProperties};
pub use start_phase::StartPhase;
