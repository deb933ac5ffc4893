//! Ensures Python sources declare their text encoding (PEP-0263) on one of
//! their first two lines, inserting `# -*- coding: UTF-8 -*-` where it is
//! missing while keeping a leading `#!` interpreter line in place.
pub mod builders;
pub mod core;
pub mod utils;
