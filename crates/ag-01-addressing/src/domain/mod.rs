mod derive;
mod seeds;

pub use derive::derive_key;
pub use seeds::EntitySeed;
