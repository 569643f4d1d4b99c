//! Fresh block ids.
//!
//! Sessions use random ids; tests use a sequential generator so ids are
//! predictable.

use mailframe_schema::BlockId;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockIdGenerator {
    /// `block-<uuid v4>`
    #[default]
    Random,
    /// `<prefix>-1`, `<prefix>-2`, ...
    Sequential { prefix: String, count: u64 },
}

impl BlockIdGenerator {
    pub fn sequential(prefix: impl Into<String>) -> Self {
        BlockIdGenerator::Sequential {
            prefix: prefix.into(),
            count: 0,
        }
    }

    pub fn new_id(&mut self) -> BlockId {
        match self {
            BlockIdGenerator::Random => format!("block-{}", Uuid::new_v4()),
            BlockIdGenerator::Sequential { prefix, count } => {
                *count += 1;
                format!("{}-{}", prefix, count)
            }
        }
    }

    /// Next id not already taken according to `taken`
    pub fn unused_id(&mut self, taken: impl Fn(&str) -> bool) -> BlockId {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
    }
}
