//! Binding-time configuration.

use dmtimer_hal::{ClockSource, Polarity};

/// Configuration applied when a timer is bound.
#[derive(Debug, Clone)]
pub struct ChipConfig {
    /// Prefix for log messages
    pub name: &'static str,
    /// Functional clock selected at bind time
    pub clock_source: ClockSource,
    /// Cells in a consumer PWM specifier
    pub pwm_cells: u32,
    /// Output polarity until the first `set_polarity`
    pub polarity: Polarity,
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self {
            name: "dmtimer-pwm",
            clock_source: ClockSource::SysClk,
            pwm_cells: 3,
            polarity: Polarity::Normal,
        }
    }
}

impl ChipConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ChipConfigBuilder {
        ChipConfigBuilder::default()
    }
}

/// Builder for [`ChipConfig`].
#[derive(Debug, Clone, Default)]
pub struct ChipConfigBuilder {
    config: ChipConfig,
}

impl ChipConfigBuilder {
    /// Sets the name used in log messages.
    pub fn name(mut self, name: &'static str) -> Self {
        self.config.name = name;
        self
    }

    /// Sets the functional clock source.
    pub fn clock_source(mut self, source: ClockSource) -> Self {
        self.config.clock_source = source;
        self
    }

    /// Sets the number of specifier cells consumers supply.
    pub fn pwm_cells(mut self, cells: u32) -> Self {
        self.config.pwm_cells = cells;
        self
    }

    /// Sets the initial output polarity.
    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.config.polarity = polarity;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ChipConfig {
        self.config
    }
}
