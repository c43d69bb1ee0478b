mod reader;

pub use reader::{InputReader, PromptSource};
