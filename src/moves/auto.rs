//! The auto-configurer: builds a registered config from a move factory
//! plus options.
//!
//! Configuration is two-phase. A throwaway instance is materialized
//! first, carrying the provided options, so name derivation sees
//! exactly what real instances will see (a StartPhase, for example,
//! derives its name from its configured target phase). The real config
//! is then built and validated under the resolved name.

use crate::manager::GameDelegate;

use super::base::{self};
use super::config::{CustomConfig, MoveConfig, MoveFactory, MoveInfo};
use super::error::ConfigError;

/// Builds registered move configs against a game's delegate.
pub struct AutoConfigurer<'a> {
    delegate: &'a dyn GameDelegate,
}

impl<'a> AutoConfigurer<'a> {
    /// Create a configurer for the given delegate.
    #[must_use]
    pub fn new(delegate: &'a dyn GameDelegate) -> Self {
        Self { delegate }
    }

    /// Build a config from a factory and options.
    ///
    /// Name priority: the `MoveName` override, else the instance's
    /// fallback name; `MoveNameSuffix` appends ` - <suffix>` either
    /// way. Shared configuration checks run here; template-specific
    /// checks run when the game is installed into a manager.
    pub fn config(
        &self,
        factory: MoveFactory,
        custom: CustomConfig,
    ) -> Result<MoveConfig, ConfigError> {
        let mut probe = (factory)();
        *probe.info_mut() = MoveInfo::new("", custom.clone());

        let mut name = match custom.move_name() {
            Some(name) => name.to_string(),
            None => probe.fallback_name(self.delegate),
        };
        if let Some(suffix) = custom.move_name_suffix() {
            if !suffix.is_empty() {
                name = format!("{name} - {suffix}");
            }
        }

        let help_text = match custom.help_text() {
            Some(text) => text.to_string(),
            None => probe.fallback_help_text(),
        };
        let is_fix_up = custom
            .is_fix_up()
            .unwrap_or_else(|| probe.default_fix_up());
        let allow_multiple = probe.allow_multiple_in_progression();

        let info = MoveInfo::new(name.clone(), custom.clone());
        base::validate_configuration(&info, self.delegate)?;

        Ok(MoveConfig::new(
            name,
            help_text,
            is_fix_up,
            allow_multiple,
            custom,
            factory,
        ))
    }

    /// Like [`config`](Self::config), but panics on a configuration
    /// error. For game setup code where a bad config is a programming
    /// error.
    #[must_use]
    pub fn must_config(&self, factory: MoveFactory, custom: CustomConfig) -> MoveConfig {
        match self.config(factory, custom) {
            Ok(config) => config,
            Err(err) => panic!("invalid move configuration: {err}"),
        }
    }
}
