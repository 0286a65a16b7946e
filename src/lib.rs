// SPDX-License-Identifier: MIT

pub mod dfp;
pub mod pgrapher;
