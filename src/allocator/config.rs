//! Configuration for the free-rectangle allocator

/// Tunables that stay fixed for the lifetime of an allocator
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatorConfig {
    /// Gap kept around every placed box, and around the board
    pub margin: i32,

    /// Allow a candidate that is short on one axis to borrow the missing
    /// extent from an adjacent free rectangle
    pub allow_chips: bool,

    /// Width/height ratio the leftover main rectangle should stay close to
    pub preferred_aspect: f64,

    /// Panic on malformed input instead of recording an anomaly
    pub panic_on_anomaly: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            margin: 0,
            allow_chips: true,
            preferred_aspect: 1.0,
            panic_on_anomaly: false,
        }
    }
}

impl AllocatorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the margin around placed boxes
    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin.max(0);
        self
    }

    /// Enable or disable chip placements
    pub fn with_chips(mut self, allow: bool) -> Self {
        self.allow_chips = allow;
        self
    }

    /// Set the preferred aspect ratio of the main rectangle
    pub fn with_preferred_aspect(mut self, aspect: f64) -> Self {
        self.preferred_aspect = aspect;
        self
    }

    /// Turn malformed releases and requests into panics
    pub fn with_panic_on_anomaly(mut self, panic: bool) -> Self {
        self.panic_on_anomaly = panic;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AllocatorConfig::default();
        assert_eq!(config.margin, 0);
        assert!(config.allow_chips);
        assert_eq!(config.preferred_aspect, 1.0);
        assert!(!config.panic_on_anomaly);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AllocatorConfig::new()
            .with_margin(4)
            .with_chips(false)
            .with_preferred_aspect(1.5);
        assert_eq!(config.margin, 4);
        assert!(!config.allow_chips);
        assert_eq!(config.preferred_aspect, 1.5);
    }

    #[test]
    fn test_negative_margin_clamped() {
        assert_eq!(AllocatorConfig::new().with_margin(-3).margin, 0);
    }
}
