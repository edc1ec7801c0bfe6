pub mod crawler;
pub mod detail;
pub mod pagination;
pub mod timviec365;
pub mod walker;
pub mod web;

#[cfg(test)]
mod tests;

pub use crawler::JobBoard;
pub use timviec365::Timviec365;
