pub mod lookup;
pub mod recommendations;

pub use recommendations::recommend;
