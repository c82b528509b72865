//! Builder for constructing timed state machines.

use crate::builder::error::BuildError;
use crate::config::SignalConfig;
use crate::core::{MachineState, Phase};
use crate::machine::{PhaseObserver, TimedStateMachine};
use crate::scheduler::Scheduler;
use std::sync::Arc;
use uuid::Uuid;

/// Builder for constructing state machines with a fluent API.
pub struct MachineBuilder<T: Scheduler> {
    config: SignalConfig,
    scheduler: Option<T>,
    observers: Vec<PhaseObserver>,
    id: Option<Uuid>,
}

impl<T: Scheduler> MachineBuilder<T> {
    /// Create a new builder with the default timings.
    pub fn new() -> Self {
        Self {
            config: SignalConfig::default(),
            scheduler: None,
            observers: Vec::new(),
            id: None,
        }
    }

    /// Set the timing configuration.
    pub fn config(mut self, config: SignalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the timer primitive (required).
    pub fn scheduler(mut self, scheduler: T) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Register a phase observer.
    pub fn observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(Phase) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Use a fixed machine identifier instead of a random one.
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Build the state machine.
    /// Returns an error if the scheduler is missing or the config is invalid.
    pub fn build(self) -> Result<TimedStateMachine<T>, BuildError> {
        let scheduler = self.scheduler.ok_or(BuildError::MissingScheduler)?;
        self.config.check()?;

        Ok(TimedStateMachine::from_parts(
            self.id.unwrap_or_else(Uuid::new_v4),
            self.config,
            scheduler,
            MachineState::new(),
            None,
            self.observers,
        ))
    }
}

impl<T: Scheduler> Default for MachineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigViolation};
    use crate::scheduler::ManualScheduler;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn builder_requires_scheduler() {
        let result = MachineBuilder::<ManualScheduler>::new().build();

        assert!(matches!(result, Err(BuildError::MissingScheduler)));
    }

    #[test]
    fn builder_validates_config() {
        let result = MachineBuilder::new()
            .scheduler(ManualScheduler::new())
            .config(SignalConfig {
                debounce_limit: 0,
                ..SignalConfig::default()
            })
            .build();

        match result {
            Err(BuildError::InvalidConfig(ConfigError::Invalid(violations))) => {
                assert_eq!(violations, vec![ConfigViolation::ZeroDebounceLimit]);
            }
            other => panic!("Expected InvalidConfig, got {:?}", other.err()),
        }
    }

    #[test]
    fn fluent_api_builds_machine() {
        let id = Uuid::new_v4();
        let clock = ManualScheduler::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let machine = MachineBuilder::new()
            .scheduler(clock.clone())
            .config(SignalConfig {
                red_ms: 4000,
                ..SignalConfig::default()
            })
            .observer(move |phase| sink.lock().unwrap().push(phase))
            .id(id)
            .build()
            .unwrap();

        assert_eq!(machine.id(), id);
        assert_eq!(machine.config().red_ms, 4000);

        machine.start();
        clock.advance(Duration::from_millis(6000));

        assert_eq!(*seen.lock().unwrap(), vec![Phase::Green, Phase::Yellow, Phase::Red]);
    }
}
