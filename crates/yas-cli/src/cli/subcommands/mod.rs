mod docs;
mod models;

pub use docs::{DocsCommands, SyncArgs};
pub use models::{GenerateArgs, MissingArgs, ModelsCommands};
