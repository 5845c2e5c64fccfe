//! Simple card game implementation.
//!
//! A small two-phase game used by the integration tests and as a
//! worked example of wiring the move core together:
//!
//! - **Setup**: a fix-up deal gives each player their starting hand,
//!   then a fix-up StartPhase enters Play.
//! - **Play**: turns follow an ordered progression - draw a card,
//!   optionally play one, then pass.

use crate::core::{
    GameState, PhaseEnum, PhaseId, PlayerId,
};
use crate::manager::{Game, GameDelegate, GameManager, ProposeError};
use crate::moves::{
    add, add_ordered_for_phase, combine, deal_count_components, display_name, factory,
    ApplyError, ConfigError, CustomConfig, LegalError, Move, MoveInfo, AutoConfigurer, StartPhase,
};
use crate::progression::{Count, Group};
use crate::stacks::{move_component, ComponentId, Stack};

/// Phase ids for the simple game.
pub mod phases {
    use crate::core::PhaseId;

    /// Hands are dealt here.
    pub const SETUP: PhaseId = PhaseId::new(0);
    /// Normal turn-taking.
    pub const PLAY: PhaseId = PhaseId::new(1);
}

/// Stack property names on game and player state.
pub mod stacks {
    /// The shared face-down draw stack.
    pub const DRAW: &str = "DrawStack";
    /// The shared discard stack.
    pub const DISCARD: &str = "DiscardStack";
    /// Each player's hand.
    pub const HAND: &str = "Hand";
}

/// Delegate for the simple game: a flat phase table plus the
/// phase-setter capability.
pub struct SimpleDelegate {
    phases: PhaseEnum,
}

impl SimpleDelegate {
    /// Create the delegate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phases: PhaseEnum::new()
                .add_phase(phases::SETUP, "Setup")
                .add_phase(phases::PLAY, "Play"),
        }
    }
}

impl Default for SimpleDelegate {
    fn default() -> Self {
        Self::new()
    }
}

impl GameDelegate for SimpleDelegate {
    fn phase_enum(&self) -> Option<&PhaseEnum> {
        Some(&self.phases)
    }

    fn set_current_phase(&self, state: &mut GameState, phase: PhaseId) -> Result<(), ApplyError> {
        state.phase = phase;
        Ok(())
    }
}

fn require_turn(state: &GameState, proposer: PlayerId) -> Result<(), LegalError> {
    if state.current_player != proposer {
        return Err(LegalError::Other(format!("it is not {proposer}'s turn")));
    }
    Ok(())
}

/// Draw the top card of the draw stack into the current player's hand.
#[derive(Default)]
pub struct MoveDrawCard {
    info: MoveInfo,
}

impl Move for MoveDrawCard {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, _delegate: &dyn GameDelegate) -> String {
        display_name("MoveDrawCard")
    }

    fn fallback_help_text(&self) -> String {
        "Draws the top card of the draw stack.".to_string()
    }

    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)?;
        require_turn(state, proposer)?;
        let draw = state
            .game
            .stack(stacks::DRAW)
            .ok_or_else(|| LegalError::Other("no draw stack".to_string()))?;
        if draw.is_empty() {
            return Err(LegalError::SourceEmpty);
        }
        Ok(())
    }

    fn apply(&self, manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError> {
        let player = manager.delegate().current_player(state);
        let draw = state
            .game
            .stack_mut(stacks::DRAW)
            .ok_or_else(|| ApplyError::MissingStack {
                name: stacks::DRAW.to_string(),
            })?;
        let hand = state.players[player]
            .stack_mut(stacks::HAND)
            .ok_or_else(|| ApplyError::MissingStack {
                name: stacks::HAND.to_string(),
            })?;
        move_component(draw, hand)?;
        Ok(())
    }
}

/// Play the first card in hand onto the discard stack.
#[derive(Default)]
pub struct MovePlayCard {
    info: MoveInfo,
}

impl Move for MovePlayCard {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, _delegate: &dyn GameDelegate) -> String {
        display_name("MovePlayCard")
    }

    fn fallback_help_text(&self) -> String {
        "Plays a card from hand onto the discard stack.".to_string()
    }

    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)?;
        require_turn(state, proposer)?;
        let hand = state.players[proposer]
            .stack(stacks::HAND)
            .ok_or_else(|| LegalError::Other("no hand stack".to_string()))?;
        if hand.is_empty() {
            return Err(LegalError::SourceEmpty);
        }
        Ok(())
    }

    fn apply(&self, manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError> {
        let player = manager.delegate().current_player(state);
        let hand = state.players[player]
            .stack_mut(stacks::HAND)
            .ok_or_else(|| ApplyError::MissingStack {
                name: stacks::HAND.to_string(),
            })?;
        let discard = state
            .game
            .stack_mut(stacks::DISCARD)
            .ok_or_else(|| ApplyError::MissingStack {
                name: stacks::DISCARD.to_string(),
            })?;
        move_component(hand, discard)?;
        Ok(())
    }
}

/// End the turn, handing play to the next seat.
#[derive(Default)]
pub struct MovePass {
    info: MoveInfo,
}

impl Move for MovePass {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, _delegate: &dyn GameDelegate) -> String {
        display_name("MovePass")
    }

    fn fallback_help_text(&self) -> String {
        "Ends the turn.".to_string()
    }

    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)?;
        require_turn(state, proposer)
    }

    fn apply(&self, _manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError> {
        state.current_player = state.current_player.next(state.player_count());
        Ok(())
    }
}

/// Builder for the simple game.
pub struct SimpleGameBuilder {
    player_count: usize,
    starting_hand_size: i64,
    deck_size: u32,
}

impl Default for SimpleGameBuilder {
    fn default() -> Self {
        Self {
            player_count: 4,
            starting_hand_size: 2,
            deck_size: 52,
        }
    }
}

impl SimpleGameBuilder {
    /// Create a builder with the default table: 4 players, 2-card
    /// hands, a 52-card deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of players (2-8).
    #[must_use]
    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=8).contains(&count), "Player count must be 2-8");
        self.player_count = count;
        self
    }

    /// Set how many cards each player is dealt in Setup.
    #[must_use]
    pub fn starting_hand_size(mut self, size: i64) -> Self {
        self.starting_hand_size = size;
        self
    }

    /// Set the deck size.
    #[must_use]
    pub fn deck_size(mut self, size: u32) -> Self {
        self.deck_size = size;
        self
    }

    fn make_state(&self, seed: u64) -> GameState {
        let mut state = GameState::new(self.player_count, seed);
        state.phase = phases::SETUP;

        let mut draw = Stack::with_components((0..self.deck_size).map(ComponentId::new));
        draw.shuffle(&mut state.rng);
        state.game.insert_stack(stacks::DRAW, draw);
        state.game.insert_stack(stacks::DISCARD, Stack::growable());

        for player in PlayerId::all(self.player_count) {
            state.players[player].insert_stack(stacks::HAND, Stack::growable());
        }
        state
    }

    /// Build the manager and initial state.
    pub fn build(self, seed: u64) -> Result<(GameManager, GameState), ConfigError> {
        let delegate = SimpleDelegate::new();
        let auto = AutoConfigurer::new(&delegate);

        let deal = auto.config(
            factory(deal_count_components),
            CustomConfig::new()
                .with_game_property(stacks::DRAW)
                .with_player_property(stacks::HAND)
                .with_target_count(self.starting_hand_size)
                .with_legal_phases([phases::SETUP]),
        )?;
        let start_play = auto.config(
            factory(StartPhase::new),
            CustomConfig::new()
                .with_phase_to_start(phases::PLAY)
                .with_legal_phases([phases::SETUP]),
        )?;

        let draw = auto.config(factory(MoveDrawCard::default), CustomConfig::new())?;
        let play = auto.config(factory(MovePlayCard::default), CustomConfig::new())?;
        let pass = auto.config(factory(MovePass::default), CustomConfig::new())?;

        // One turn: draw, at most one play, pass. Turns repeat for as
        // long as the Play phase lasts.
        let turn = Group::serial([
            draw.into(),
            Group::optional(play.into()),
            pass.into(),
        ]);

        // Registration order matters for fix-up driving: the deal must
        // finish before the phase transition becomes the first legal
        // fix-up.
        let moves = combine([
            add(vec![deal, start_play]),
            add_ordered_for_phase(phases::PLAY, [Group::repeat(Count::AtLeast(0), turn)]),
        ]);

        let game = Game::new("simple", moves);
        let manager = GameManager::new(game, Box::new(SimpleDelegate::new()), self.make_state(seed))?;
        let state = self.make_state(seed);
        Ok((manager, state))
    }
}

/// Repeatedly apply the first legal fix-up move, in registration
/// order, until none applies. Returns how many were applied.
///
/// This is the little driver loop a full game engine would run after
/// every player move.
pub fn apply_fix_ups(manager: &GameManager, state: &mut GameState) -> Result<usize, ProposeError> {
    let mut applied = 0;
    loop {
        let proposer = manager.delegate().current_player(state);
        let next = manager
            .game()
            .moves()
            .iter()
            .find(|config| {
                config.is_fix_up() && manager.is_legal(config.name(), state, proposer).is_ok()
            })
            .map(|config| config.name().to_string());

        let Some(name) = next else {
            return Ok(applied);
        };
        manager.propose(&name, state, proposer)?;
        applied += 1;
        if applied > 10_000 {
            return Err(ProposeError::Apply(ApplyError::Invariant(
                "fix-up moves did not terminate".to_string(),
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let (manager, state) = SimpleGameBuilder::new().build(42).unwrap();

        assert_eq!(state.player_count(), 4);
        assert_eq!(state.phase, phases::SETUP);
        assert_eq!(
            state.game.stack(stacks::DRAW).unwrap().num_components(),
            52
        );
        assert_eq!(manager.game().moves().len(), 5);
    }

    #[test]
    fn test_setup_deals_and_enters_play() {
        let (manager, mut state) = SimpleGameBuilder::new().build(42).unwrap();

        apply_fix_ups(&manager, &mut state).unwrap();

        assert_eq!(state.phase, phases::PLAY);
        for player in PlayerId::all(4) {
            assert_eq!(
                state.players[player]
                    .stack(stacks::HAND)
                    .unwrap()
                    .num_components(),
                2
            );
        }
        assert_eq!(
            state.game.stack(stacks::DRAW).unwrap().num_components(),
            44
        );
    }

    #[test]
    fn test_play_moves_illegal_during_setup() {
        let (manager, state) = SimpleGameBuilder::new().build(42).unwrap();

        let err = manager
            .is_legal("Draw Card", &state, PlayerId::new(0))
            .unwrap_err();
        assert_eq!(
            err,
            LegalError::NotInPhase {
                phase: "Setup".to_string()
            }
            .into()
        );
    }

    #[test]
    fn test_turn_progression() {
        let (manager, mut state) = SimpleGameBuilder::new().player_count(2).build(42).unwrap();
        apply_fix_ups(&manager, &mut state).unwrap();

        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        // Passing before drawing violates the turn grammar.
        assert!(manager.is_legal("Pass", &state, p0).is_err());

        manager.propose("Draw Card", &mut state, p0).unwrap();
        manager.propose("Play Card", &mut state, p0).unwrap();
        manager.propose("Pass", &mut state, p0).unwrap();

        // Next player's turn follows the same grammar.
        assert_eq!(state.current_player, p1);
        manager.propose("Draw Card", &mut state, p1).unwrap();
        // Playing a card is optional.
        manager.propose("Pass", &mut state, p1).unwrap();
        assert_eq!(state.current_player, p0);
    }
}
