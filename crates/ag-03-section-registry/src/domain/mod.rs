mod entities;
mod errors;

pub use entities::Section;
pub use errors::SectionError;
