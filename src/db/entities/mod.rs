pub mod clans;
pub mod members;

pub use clans::Entity as Clans;
pub use members::Entity as Members;
