mod account;
mod audit;
mod money;
mod transaction;

pub use account::*;
pub use audit::*;
pub use money::*;
pub use transaction::*;
