/// Integerizer settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IntegerizeConfig {
    /// Master seed.  Each group × group block draws from its own stream
    /// derived from it.
    pub seed: u64,
}

impl Default for IntegerizeConfig {
    fn default() -> Self {
        Self { seed: 12345 }
    }
}
