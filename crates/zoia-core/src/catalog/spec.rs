use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog entry describing one module type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Display name of the type (e.g. "Audio Input").
    pub name: String,
    /// Estimated CPU cost of one instance.
    pub cpu: f64,
    /// Number of grid blocks the module occupies with default options.
    pub default_blocks: u32,
    /// Block name to grid position(s), in descriptor order.
    #[serde(default)]
    pub blocks: IndexMap<String, BlockSpec>,
    /// Option name to selectable values, in descriptor order.
    #[serde(default)]
    pub options: IndexMap<String, Vec<Value>>,
}

impl ModuleSpec {
    /// Reverse-lookup the name of the block at `position`.
    ///
    /// When several entries claim the same position the last one in
    /// descriptor order wins. Returns an empty string when nothing matches.
    ///
    /// # Examples
    /// ```
    /// use zoia_core::ModuleCatalog;
    ///
    /// let catalog = ModuleCatalog::from_json_str(r#"{
    ///     "7": {"name": "VCA", "cpu": 0.3, "default_blocks": 3,
    ///           "blocks": {"audio_in": {"position": [0, 1]},
    ///                      "level_control": {"position": 2}}}
    /// }"#).unwrap();
    /// let vca = catalog.lookup(7).unwrap();
    /// assert_eq!(vca.block_name(1), "audio_in");
    /// assert_eq!(vca.block_name(2), "level_control");
    /// assert_eq!(vca.block_name(9), "");
    /// ```
    pub fn block_name(&self, position: i32) -> &str {
        block_name(&self.blocks, position)
    }

    /// Grid positions covered by the default block layout starting at `start`.
    ///
    /// Returns `None` when the layout runs past `i32::MAX`.
    pub fn default_positions(&self, start: i32) -> Option<Vec<i32>> {
        let blocks = i32::try_from(self.default_blocks).ok()?;
        (0..blocks)
            .map(|offset| start.checked_add(offset))
            .collect()
    }
}

/// Reverse-lookup a block name in a block map; see [`ModuleSpec::block_name`].
pub fn block_name(blocks: &IndexMap<String, BlockSpec>, position: i32) -> &str {
    blocks
        .iter()
        .rev()
        .find(|(_, block)| block.position.contains(position))
        .map(|(name, _)| name.as_str())
        .unwrap_or("")
}

/// Block entry of a module type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub position: BlockPosition,
    /// Remaining descriptor attributes, passed through untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Grid position of a block: a single slot, or several for stereo pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockPosition {
    Single(i32),
    Many(Vec<i32>),
}

impl BlockPosition {
    pub fn contains(&self, position: i32) -> bool {
        match self {
            BlockPosition::Single(value) => *value == position,
            BlockPosition::Many(values) => values.contains(&position),
        }
    }
}
