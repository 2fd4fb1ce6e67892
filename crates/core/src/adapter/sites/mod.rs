// Built-in job sites

mod functionalworks;
mod golangprojects;
mod indeed;
mod jooble;
mod rustjobs;

pub use functionalworks::Functionalworks;
pub use golangprojects::Golangprojects;
pub use indeed::Indeed;
pub use jooble::Jooble;
pub use rustjobs::Rustjobs;
