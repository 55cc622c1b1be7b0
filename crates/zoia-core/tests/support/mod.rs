//! Synthetic patch construction for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use zoia_core::ModuleCatalog;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn fixture_catalog() -> ModuleCatalog {
    let path = repo_root()
        .join("tests")
        .join("fixtures")
        .join("module_index.json");
    ModuleCatalog::from_path(&path).expect("fixture module index")
}

pub const LFO: i32 = 5;
pub const SV_FILTER: i32 = 0;
pub const AUDIO_INPUT: i32 = 1;
pub const AUDIO_OUTPUT: i32 = 2;
pub const VCA: i32 = 7;
pub const MIDI_NOTES_IN: i32 = 20;
pub const MIDI_CC_IN: i32 = 21;
pub const STOMPSWITCH: i32 = 44;
pub const MIDI_CLOCK_IN: i32 = 61;

/// One module record as the device lays it out.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    pub type_id: i32,
    pub name: String,
    pub page: i32,
    pub color: i32,
    pub block_start: i32,
    pub selectors: Vec<u8>,
    pub params: Vec<i32>,
}

impl ModuleEntry {
    pub fn new(type_id: i32) -> Self {
        Self {
            type_id,
            name: String::new(),
            page: 0,
            color: 1,
            block_start: 0,
            selectors: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn page(mut self, page: i32) -> Self {
        self.page = page;
        self
    }

    pub fn color(mut self, color: i32) -> Self {
        self.color = color;
        self
    }

    pub fn block_start(mut self, start: i32) -> Self {
        self.block_start = start;
        self
    }

    pub fn selectors(mut self, selectors: &[u8]) -> Self {
        self.selectors = selectors.to_vec();
        self
    }

    pub fn params(mut self, params: &[i32]) -> Self {
        self.params = params.to_vec();
        self
    }
}

#[derive(Debug, Clone)]
pub enum ColorTable {
    /// Append each module's embedded color as the trailing table.
    FromModules,
    Custom(Vec<i32>),
    Absent,
}

#[derive(Debug, Clone)]
pub struct PatchBuilder {
    name: String,
    modules: Vec<ModuleEntry>,
    connections: Vec<[i32; 5]>,
    pages: Vec<String>,
    starred: Vec<(i16, i16)>,
    colors: ColorTable,
}

impl PatchBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            modules: Vec::new(),
            connections: Vec::new(),
            pages: Vec::new(),
            starred: Vec::new(),
            colors: ColorTable::FromModules,
        }
    }

    pub fn module(mut self, module: ModuleEntry) -> Self {
        self.modules.push(module);
        self
    }

    pub fn connection(
        mut self,
        source: (i32, i32),
        dest: (i32, i32),
        raw_strength: i32,
    ) -> Self {
        self.connections
            .push([source.0, source.1, dest.0, dest.1, raw_strength]);
        self
    }

    pub fn page(mut self, name: &str) -> Self {
        self.pages.push(name.to_string());
        self
    }

    pub fn starred(mut self, module: i16, raw_block: i16) -> Self {
        self.starred.push((module, raw_block));
        self
    }

    pub fn colors(mut self, colors: ColorTable) -> Self {
        self.colors = colors;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut words: Vec<i32> = vec![0];
        words.extend(name_words(&self.name));
        words.push(self.modules.len() as i32);

        for module in &self.modules {
            let size = 10 + module.params.len() + 4;
            let mut selectors = [0u8; 8];
            selectors[..module.selectors.len()].copy_from_slice(&module.selectors);
            words.extend([
                size as i32,
                module.type_id,
                0,
                module.page,
                module.color,
                module.block_start,
                module.params.len() as i32,
                0,
                i32::from_le_bytes([selectors[0], selectors[1], selectors[2], selectors[3]]),
                i32::from_le_bytes([selectors[4], selectors[5], selectors[6], selectors[7]]),
            ]);
            words.extend(&module.params);
            words.extend(name_words(&module.name));
        }

        words.push(self.connections.len() as i32);
        for connection in &self.connections {
            words.extend(connection);
        }

        words.push(self.pages.len() as i32);
        for page in &self.pages {
            words.extend(name_words(page));
        }

        words.push(self.starred.len() as i32);
        for (module, raw_block) in &self.starred {
            let low = module.to_le_bytes();
            let high = raw_block.to_le_bytes();
            words.push(i32::from_le_bytes([low[0], low[1], high[0], high[1]]));
        }

        match &self.colors {
            ColorTable::FromModules => words.extend(self.modules.iter().map(|m| m.color)),
            ColorTable::Custom(colors) => words.extend(colors),
            ColorTable::Absent => {}
        }
        words.extend([0, 0, 0]);
        words[0] = (words.len() * 4) as i32;

        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

pub fn name_words(name: &str) -> [i32; 4] {
    let mut bytes = [0u8; 16];
    let len = name.len().min(16);
    bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
    let mut words = [0i32; 4];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}
