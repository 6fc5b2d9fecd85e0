// SPDX-License-Identifier: MIT OR Apache-2.0
//! Target node vocabularies built on the core schema types.

pub mod cycles;
