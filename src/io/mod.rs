//! File export of computed proposal data.

pub mod export;
