//! Passphrases, sealed records and the published artifact.
//!
//! Every participant gets a unique passphrase. Their assignment is encrypted
//! under a key stretched from that passphrase, and the resulting blob is
//! published under a one-way hash of the same passphrase. Holding the
//! artifact without a passphrase reveals neither who is in it nor who gives
//! to whom.
//!
//! # Quick start
//!
//! ```no_run
//! use kringle_core::{
//!   derangement, exclusion::ExclusionRelation,
//!   participant::{Participant, Participants},
//! };
//! use kringle_seal::{artifact, passphrase, seal};
//!
//! let roster = Participants::new(vec![
//!   Participant::new("Alice", ""),
//!   Participant::new("Bob", ""),
//! ]).unwrap();
//! let assignments = derangement::generate(
//!   &roster, &ExclusionRelation::build(&roster), 1000,
//! ).unwrap();
//! let phrases = passphrase::mint(
//!   &roster, &passphrase::WordBank::holiday(), &Default::default(),
//! ).unwrap();
//! let records = seal::seal_all(&assignments, &phrases, &Default::default()).unwrap();
//! let doc = artifact::assemble(&roster, records, artifact::now_millis()).unwrap();
//! println!("{}", doc.to_json_pretty().unwrap());
//! ```

pub mod artifact;
pub mod error;
pub mod lookup;
pub mod passphrase;
pub mod seal;

pub use error::{Error, Result};
