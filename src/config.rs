use crate::model::DEFAULT_SEPARATOR;

/// Factory configuration
///
/// # Examples
///
/// ```
/// use model_factories::FactoryConfig;
///
/// let config = FactoryConfig::new()
///     .interpolate(false)
///     .model_separator(':');
/// assert!(!config.interpolate);
/// ```
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    /// Render `%(key)s` placeholders in text attributes before construction
    pub interpolate: bool,

    /// Separator between app label and model name in blueprint model identifiers
    pub model_separator: char,
}

impl FactoryConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            interpolate: true,
            model_separator: DEFAULT_SEPARATOR,
        }
    }

    /// Enable or disable placeholder interpolation
    pub fn interpolate(mut self, enabled: bool) -> Self {
        self.interpolate = enabled;
        self
    }

    /// Set the model identifier separator
    pub fn model_separator(mut self, separator: char) -> Self {
        self.model_separator = separator;
        self
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self::new()
    }
}
