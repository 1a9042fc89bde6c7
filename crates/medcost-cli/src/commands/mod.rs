//! Command implementations

pub(crate) mod inspect;
pub(crate) mod predict;
