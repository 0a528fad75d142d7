// Puzzle engine: grid construction, slot numbering, and word filling.
// Randomness always comes from an explicit `SeededRng`; nothing here touches
// global state, and all word lookups go through the `WordSource` trait.

pub mod builder;
pub mod filler;
pub mod generator;
pub mod grid;
pub mod numbering;
pub mod rng;
pub mod validator;

// Re-export the public API consumed by the binary and by callers embedding the engine.
pub use generator::{CrosswordGenerator, GeneratorSettings, Puzzle};
pub use grid::{Cell, CellContents, Grid, Position};
pub use numbering::{Direction, WordSlot, WordSlots};
pub use rng::SeededRng;
pub use validator::{DictionaryValidator, Validator};
