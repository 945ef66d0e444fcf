// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # artist-rec
//!
//! Artist recommendations from an implicit-feedback listening log
//! (hetrec2011-lastfm-2k layout) using alternating least squares.
//!
//! ## Architecture
//!
//! - **Interactions** (`interaction`): TSV log → CSR user-by-artist matrix (`sprs`)
//! - **Catalog** (`catalog`): artist id → display name
//! - **Model** (`model`): `FactorizationModel` trait, ALS via `discorec`
//! - **Recommender** (`recommender`): fit / recommend, ids resolved through the catalog
//! - **Config** (`config`): TOML data paths and hyper-parameters
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use artist_rec::catalog::load_catalog;
//! use artist_rec::interaction::load_interactions;
//! use artist_rec::model::{AlsModel, AlsParams};
//! use artist_rec::recommender::Recommender;
//!
//! let matrix = load_interactions(Path::new("user_artists.dat")).unwrap();
//! let catalog = load_catalog(Path::new("artists.dat")).unwrap();
//! let mut recommender = Recommender::new(catalog, AlsModel::new(AlsParams::default()));
//! recommender.fit(&matrix).unwrap();
//! for rec in recommender.recommend(2, &matrix, 5).unwrap() {
//!     println!("{}: {}", rec.name, rec.score);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod interaction;
pub mod model;
pub mod recommender;
mod tsv;
