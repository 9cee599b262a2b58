pub mod ads;
pub mod briefs;
pub mod catalog;
pub mod quota;
pub mod railway;
