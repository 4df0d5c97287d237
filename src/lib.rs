//! # Imposter Game Library
//!
//! This library provides the game logic for a pass-the-device imposter
//! party game. One shared secret word is assigned to a group of players,
//! one player is designated the imposter (who either sees a reveal prompt
//! or a related-but-different word), and the engine walks the group
//! through setup, a countdown, and a per-player handoff/reveal sequence.
//!
//! The crate has no I/O of its own: the word list arrives as raw JSON
//! through [`words::WordSource::resolve`], preferences persist through the
//! [`storage::KeyValueStore`] seam, and countdown ticks are delivered by
//! whatever timer facility the embedding application has, via the
//! alarm-scheduling closures on [`game::Game`].

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_field_names)]

pub mod constants;
pub mod game;
pub mod picker;
pub mod storage;
pub mod words;
