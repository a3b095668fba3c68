/// YAML language version the scanner lexes against.
///
/// The version only changes which characters count as line breaks: YAML 1.1
/// also breaks lines on NEL (U+0085), LS (U+2028) and PS (U+2029).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum YamlVersion {
    /// YAML 1.1 (and 1.0).
    V1_1,
    /// YAML 1.2.
    #[default]
    V1_2,
}

impl YamlVersion {
    /// Maps a `%YAML major.minor` pair to a version, or `None` for a major
    /// version other than 1.
    #[must_use]
    pub fn from_numbers(major: u32, minor: u32) -> Option<Self> {
        match (major, minor) {
            (1, 0 | 1) => Some(Self::V1_1),
            (1, _) => Some(Self::V1_2),
            _ => None,
        }
    }
}

/// How the scanner's working buffers and queues grow.
///
/// A full buffer grows to `max(requested, capacity * scale_factor)`, capped
/// at `max_capacity`. Asking for more than `max_capacity` is a fault and
/// panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthPolicy {
    /// Capacity allocated up front.
    ///
    /// # Default
    ///
    /// `64`
    pub initial_capacity: usize,

    /// Multiplier applied on each growth.
    ///
    /// # Default
    ///
    /// `2`
    pub scale_factor: usize,

    /// Largest capacity any single buffer may reach.
    ///
    /// # Default
    ///
    /// 16 MiB worth of elements.
    pub max_capacity: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            scale_factor: 2,
            max_capacity: 16 * 1024 * 1024,
        }
    }
}

/// Configuration options for the YAML scanner.
///
/// # Examples
///
/// ```rust
/// use yamlscan::{Scanner, ScannerOptions, SliceSource, YamlVersion};
///
/// let options = ScannerOptions {
///     version: YamlVersion::V1_1,
///     block_structure: true,
///     ..Default::default()
/// };
/// let scanner = Scanner::new(SliceSource::new(b"a: b\n"), options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScannerOptions {
    /// Version assumed until a `%YAML` directive says otherwise.
    ///
    /// # Default
    ///
    /// [`YamlVersion::V1_2`]
    pub version: YamlVersion,

    /// Whether to emit the tokens a tree builder needs to recover block
    /// structure.
    ///
    /// When `true`, the scanner tracks open block collections and emits
    /// `BlockSequenceStart`/`BlockMappingStart` when one opens at a deeper
    /// column, the matching `*End` token when indentation drops, and a
    /// `MappingKey` in front of every implicit key confirmed by a `:`. Tokens
    /// are held back while an implicit key that could precede them is
    /// pending. Warnings about indicators in positions where block YAML
    /// forbids them are only raised in this mode.
    ///
    /// # Default
    ///
    /// `false`
    pub block_structure: bool,

    /// Capacity of the raw byte ring the byte source is read into.
    ///
    /// Values below 16 are raised to 16.
    ///
    /// # Default
    ///
    /// `4096`
    pub raw_buffer_capacity: usize,

    /// Growth policy for the UTF-8 working buffer, token queue, warning queue
    /// and scanner stacks.
    pub growth: GrowthPolicy,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on the first lexical warning instead of attaching it to a token.
    ///
    /// Enabled only in test and fuzzing builds to get a backtrace at the
    /// point a warning is raised.
    #[cfg_attr(feature = "serde", serde(default))]
    pub panic_on_warning: bool,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            version: YamlVersion::default(),
            block_structure: false,
            raw_buffer_capacity: 4096,
            growth: GrowthPolicy::default(),
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_warning: false,
        }
    }
}

impl ScannerOptions {
    pub(crate) fn raw_capacity(&self) -> usize {
        self.raw_buffer_capacity.max(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_numbers() {
        assert_eq!(YamlVersion::from_numbers(1, 0), Some(YamlVersion::V1_1));
        assert_eq!(YamlVersion::from_numbers(1, 1), Some(YamlVersion::V1_1));
        assert_eq!(YamlVersion::from_numbers(1, 2), Some(YamlVersion::V1_2));
        assert_eq!(YamlVersion::from_numbers(1, 3), Some(YamlVersion::V1_2));
        assert_eq!(YamlVersion::from_numbers(2, 0), None);
    }

    #[test]
    fn raw_capacity_has_a_floor() {
        let options = ScannerOptions {
            raw_buffer_capacity: 3,
            ..Default::default()
        };
        assert_eq!(options.raw_capacity(), 16);
        assert_eq!(ScannerOptions::default().raw_capacity(), 4096);
    }
}
