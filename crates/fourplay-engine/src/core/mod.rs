pub use self::{board::*, shape::*, side::*};

pub(crate) mod board;
pub(crate) mod shape;
pub(crate) mod side;
