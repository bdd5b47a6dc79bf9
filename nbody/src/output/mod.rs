pub mod trajectory;
pub mod snapshot;
