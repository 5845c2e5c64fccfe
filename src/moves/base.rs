//! The move-template base: the `Move` trait and its shared gates.
//!
//! Every move - game-specific or from the template library - goes
//! through the same two legality gates:
//!
//! 1. **Phase gate**: the game's current phase (or, with a phase tree,
//!    any of its ancestors) must appear in the move's `LegalPhases`.
//!    An empty `LegalPhases` passes everything.
//! 2. **Progression gate**: if the move declares a root progression
//!    group, the move-names recorded since the most recent phase
//!    transition - with the candidate appended - must be *fully*
//!    consumed by the group.
//!
//! Moves that declare no progression group are transparent to the
//! second gate: they are skipped when the tape is rebuilt, so they
//! never interfere with the sequencing of moves that do.

use log::{debug, trace};
use smallvec::{smallvec, SmallVec};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{GameState, PhaseId, PlayerId};
use crate::manager::{Game, GameDelegate, GameId, GameManager};
use crate::progression::{ProgressionError, Tape};

use super::config::MoveInfo;
use super::error::{ApplyError, ConfigError, LegalError};

/// A move in the game.
///
/// Concrete moves hold a [`MoveInfo`] and forward `info`/`info_mut`;
/// the provided methods derive everything else from it. Templates
/// override `legal`/`apply`/`validate` and call back into
/// [`base_legal`](Move::base_legal) for the shared gates.
pub trait Move: Send + Sync {
    /// This move's metadata.
    fn info(&self) -> &MoveInfo;

    /// Mutable access to the metadata; used when an instance is
    /// materialized from its config.
    fn info_mut(&mut self) -> &mut MoveInfo;

    /// The name used when no `MoveName` override is configured.
    ///
    /// Game moves typically return [`display_name`] of their type
    /// identifier; templates return a description of what they do.
    fn fallback_name(&self, delegate: &dyn GameDelegate) -> String;

    /// The help text used when no `HelpText` override is configured.
    fn fallback_help_text(&self) -> String {
        "A move.".to_string()
    }

    /// Whether this move is a fix-up when no `IsFixUp` override is
    /// configured. Fix-ups are engine-proposed housekeeping moves.
    fn default_fix_up(&self) -> bool {
        false
    }

    /// Whether a progression Leaf over this move consumes runs of
    /// equal names rather than exactly one.
    fn allow_multiple_in_progression(&self) -> bool {
        false
    }

    /// The resolved move name, or empty if the instance has not been
    /// installed.
    fn name(&self) -> &str {
        self.info().name()
    }

    /// The resolved help text.
    fn help_text(&self) -> String {
        match self.info().custom().help_text() {
            Some(text) => text.to_string(),
            None => self.fallback_help_text(),
        }
    }

    /// Whether this instance is a fix-up move.
    fn is_fix_up(&self) -> bool {
        self.info()
            .custom()
            .is_fix_up()
            .unwrap_or_else(|| self.default_fix_up())
    }

    /// Template-specific installation checks, run by the manager after
    /// the shared configuration checks pass. The example state is
    /// available through the manager for resolving named stacks.
    fn validate(&self, _manager: &GameManager) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Whether this move may be applied right now.
    ///
    /// The default is exactly the two shared gates; overriding moves
    /// should call [`base_legal`](Move::base_legal) before their own
    /// checks.
    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)
    }

    /// The phase gate followed by the progression gate.
    fn base_legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        _proposer: PlayerId,
    ) -> Result<(), LegalError> {
        phase_legal(self.info(), manager, state)?;
        progression_legal(self.name(), self.info(), manager, state)
    }

    /// Apply this move to the state.
    fn apply(&self, manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError>;
}

/// Derive a display name from a type identifier.
///
/// Strips a leading `Move`/`move` and inserts a space before each
/// remaining uppercase letter:
///
/// ```
/// use rust_tbg::moves::display_name;
///
/// assert_eq!(display_name("MoveDealCards"), "Deal Cards");
/// assert_eq!(display_name("PlayCard"), "Play Card");
/// ```
#[must_use]
pub fn display_name(ident: &str) -> String {
    let trimmed = ident
        .strip_prefix("Move")
        .or_else(|| ident.strip_prefix("move"))
        .unwrap_or(ident);

    let mut out = String::with_capacity(trimmed.len() + 4);
    for (i, ch) in trimmed.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out.trim().to_string()
}

/// Shared configuration checks every move must pass at install time.
pub(crate) fn validate_configuration(
    info: &MoveInfo,
    delegate: &dyn GameDelegate,
) -> Result<(), ConfigError> {
    let custom = info.custom();

    if custom.legal_progression().is_some() {
        if custom.legal_phases().is_empty() {
            return Err(ConfigError::ProgressionWithoutPhases);
        }

        // Sequencing is tracked per leaf phase, so a sequenced move
        // must name leaf phases. A move without a progression may name
        // a parent phase and rely on the ancestor chain at check time.
        if let Some(phases) = delegate.phase_enum() {
            if phases.is_tree() {
                for &phase in custom.legal_phases() {
                    if !phases.is_leaf(phase) {
                        return Err(ConfigError::NonLeafPhase {
                            phase: phases.display_name(phase),
                        });
                    }
                }
            }
        }
    }

    for (option, value) in [
        ("TargetCount", custom.target_count()),
        ("NumRounds", custom.num_rounds()),
    ] {
        if let Some(value) = value {
            if value < 0 {
                return Err(ConfigError::NegativeCount { option, value });
            }
        }
    }

    Ok(())
}

fn phase_legal(
    info: &MoveInfo,
    manager: &GameManager,
    state: &GameState,
) -> Result<(), LegalError> {
    let legal_phases = info.custom().legal_phases();
    if legal_phases.is_empty() {
        return Ok(());
    }

    let delegate = manager.delegate();
    let current = delegate.current_phase(state);
    let currently_in: SmallVec<[PhaseId; 8]> = match delegate.phase_enum() {
        Some(phases) if phases.is_tree() => phases.ancestors(current).into_iter().collect(),
        _ => smallvec![current],
    };

    if currently_in.iter().any(|p| legal_phases.contains(p)) {
        return Ok(());
    }

    let phase = match delegate.phase_enum() {
        Some(phases) => phases.display_name(current),
        None => current.to_string(),
    };
    debug!("phase gate rejected {:?}: not legal in {phase}", info.name());
    Err(LegalError::NotInPhase { phase })
}

fn progression_legal(
    name: &str,
    info: &MoveInfo,
    manager: &GameManager,
    state: &GameState,
) -> Result<(), LegalError> {
    let Some(group) = info.custom().legal_progression() else {
        return Ok(());
    };

    let current = manager.delegate().current_phase(state);
    let names = phase_tape(manager.game(), state, current, name);
    trace!("progression tape for {name:?}: {names:?}");

    let rest = group
        .satisfied(Tape::new(&names))
        .map_err(LegalError::Progression)?;
    if !rest.is_empty() {
        debug!(
            "progression gate rejected {name:?}: {} of {} names unconsumed",
            rest.len(),
            names.len()
        );
        return Err(LegalError::Progression(ProgressionError::Incomplete));
    }
    Ok(())
}

/// Rebuild the tape for the current phase.
///
/// Walks the move records backwards, stopping at the first record from
/// a different phase; records in the game's skip-set are dropped. The
/// candidate's own name is appended at the end.
fn phase_tape(game: &Game, state: &GameState, current: PhaseId, candidate: &str) -> Vec<String> {
    let skip = skip_set(game);

    let mut names: Vec<String> = Vec::new();
    for record in state.records_up_to(state.version()).rev() {
        if record.phase != current {
            break;
        }
        if skip.contains(&record.name) {
            continue;
        }
        names.push(record.name.clone());
    }
    names.reverse();
    names.push(candidate.to_string());
    names
}

type SkipSets = RwLock<FxHashMap<GameId, Arc<FxHashSet<String>>>>;

/// The names of the game's moves that declare no progression group.
///
/// Memoized process-wide per game identity: query under a read lock,
/// populate under a write lock on first miss. Entries are never
/// evicted; move installations are static over a game's lifetime.
pub(crate) fn skip_set(game: &Game) -> Arc<FxHashSet<String>> {
    static SKIP_SETS: OnceLock<SkipSets> = OnceLock::new();
    let sets = SKIP_SETS.get_or_init(|| RwLock::new(FxHashMap::default()));

    if let Some(set) = sets
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&game.id())
    {
        return Arc::clone(set);
    }

    let built: Arc<FxHashSet<String>> = Arc::new(
        game.moves()
            .iter()
            .filter(|config| !config.has_progression())
            .map(|config| config.name().to_string())
            .collect(),
    );

    Arc::clone(
        sets.write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(game.id())
            .or_insert(built),
    )
}
