//! Word and byte offsets of the patch binary.
//!
//! The format is undocumented and was reverse-engineered from device
//! exports, so firmware revisions may move any of these. All integers are
//! little-endian, and most offsets are counted in 32-bit words.

pub const WORD_SIZE: usize = 4;

pub const PATCH_NAME_RANGE: std::ops::Range<usize> = 4..20;
pub const MODULE_COUNT_WORD: usize = 5;
pub const FIRST_MODULE_WORD: usize = 6;

/// Fixed-length names (patch, module, page) are padded to 16 bytes.
pub const NAME_LEN: usize = 16;
pub const NAME_WORDS: usize = NAME_LEN / WORD_SIZE;

// Module record, relative to the record's first word.
pub const RECORD_SIZE_WORD: usize = 0;
pub const RECORD_TYPE_WORD: usize = 1;
pub const RECORD_PAGE_WORD: usize = 3;
pub const RECORD_OLD_COLOR_WORD: usize = 4;
pub const RECORD_BLOCK_START_WORD: usize = 5;
pub const RECORD_PARAM_COUNT_WORD: usize = 6;
/// Two words of byte-wide option selectors, read as one 8-byte list.
pub const RECORD_OPTION_WORDS: [usize; 2] = [8, 9];
pub const RECORD_PARAMS_WORD: usize = 10;
/// The module name sits at the record's tail: `size - 4` words in.
pub const RECORD_NAME_TAIL_WORDS: usize = NAME_WORDS;
pub const MIN_RECORD_WORDS: usize = RECORD_PARAMS_WORD;

pub const CONNECTION_WORDS: usize = 5;
/// Connection strength is stored scaled by 100.
pub const STRENGTH_SCALE: i32 = 100;

pub const PAGE_WORDS: usize = 4;
/// The device shows at most 64 pages; output is always this long.
pub const PAGE_SLOTS: usize = 64;

/// Starred entries pack the block index and MIDI CC into one i16: the low 7
/// bits hold the block, the rest hold `cc + 1`.
pub const STARRED_BLOCK_MODULUS: i32 = 128;

/// Highest valid palette index in the trailing color table.
pub const MAX_PALETTE_INDEX: i32 = 15;

/// Palette names for color ids 1..=15.
pub const PALETTE: [&str; 15] = [
    "Blue", "Green", "Red", "Yellow", "Aqua", "Magenta", "White", "Orange", "Lima", "Surf", "Sky",
    "Purple", "Pink", "Peach", "Mango",
];
