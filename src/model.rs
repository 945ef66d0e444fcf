//! Factorization model seam.
//!
//! [`FactorizationModel`] is the narrow interface the recommender talks to:
//! fit once on an interaction matrix, then score unseen items per user.
//! [`AlsModel`] implements it with implicit-feedback alternating least
//! squares from `discorec`; the optimization itself lives in that crate.

use std::collections::HashSet;
use std::time::Instant;

use discorec::{Dataset, Recommender, RecommenderBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ModelError, ModelResult};
use crate::interaction::InteractionMatrix;

/// A collaborative-filtering model treated as a black box.
pub trait FactorizationModel {
    /// Learn latent factors from `matrix`.
    fn fit(&mut self, matrix: &InteractionMatrix) -> ModelResult<()>;

    /// Top `n` `(item_id, score)` pairs for `user_id`, descending by score.
    ///
    /// `matrix` supplies the user's existing interactions; the returned list
    /// holds at most `n` entries.
    fn recommend(
        &self,
        user_id: usize,
        matrix: &InteractionMatrix,
        n: usize,
    ) -> ModelResult<Vec<(usize, f32)>>;
}

/// ALS hyper-parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlsParams {
    /// Number of latent factors.
    #[serde(default = "default_factors")]
    pub factors: u32,
    /// Number of ALS sweeps.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// L2 regularization.
    #[serde(default = "default_regularization")]
    pub regularization: f32,
    /// Confidence scaling for implicit weights. Library default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
    /// RNG seed for factor initialization. Random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_factors() -> u32 {
    50
}
fn default_iterations() -> u32 {
    10
}
fn default_regularization() -> f32 {
    0.01
}

impl Default for AlsParams {
    fn default() -> Self {
        Self {
            factors: default_factors(),
            iterations: default_iterations(),
            regularization: default_regularization(),
            alpha: None,
            seed: None,
        }
    }
}

/// Implicit ALS backed by `discorec`.
pub struct AlsModel {
    params: AlsParams,
    fitted: Option<Recommender<usize, usize>>,
}

impl AlsModel {
    pub fn new(params: AlsParams) -> Self {
        Self {
            params,
            fitted: None,
        }
    }

    pub fn params(&self) -> &AlsParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

impl FactorizationModel for AlsModel {
    fn fit(&mut self, matrix: &InteractionMatrix) -> ModelResult<()> {
        if matrix.is_empty() {
            return Err(ModelError::EmptyMatrix);
        }

        let start = Instant::now();
        let mut dataset = Dataset::new();
        for cell in matrix.iter() {
            dataset.push(cell.user_id, cell.item_id, cell.weight as f32);
        }

        let mut builder = RecommenderBuilder::new();
        builder
            .factors(self.params.factors)
            .iterations(self.params.iterations)
            .regularization(self.params.regularization);
        if let Some(alpha) = self.params.alpha {
            builder.alpha(alpha);
        }
        if let Some(seed) = self.params.seed {
            builder.seed(seed);
        }

        self.fitted = Some(builder.fit_implicit(&dataset));
        info!(
            factors = self.params.factors,
            iterations = self.params.iterations,
            regularization = self.params.regularization,
            nnz = matrix.nnz(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fitted ALS model"
        );
        Ok(())
    }

    fn recommend(
        &self,
        user_id: usize,
        matrix: &InteractionMatrix,
        n: usize,
    ) -> ModelResult<Vec<(usize, f32)>> {
        let recommender = self.fitted.as_ref().ok_or(ModelError::NotFitted)?;
        if user_id >= matrix.users() {
            return Err(ModelError::UnknownUser {
                user_id,
                users: matrix.users(),
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        // Over-fetch by the row length so filtering seen items still yields n;
        // never ask for more than the matrix has columns.
        let seen: HashSet<usize> = matrix.row(user_id).into_iter().map(|(item, _)| item).collect();
        let fetch = n.saturating_add(seen.len()).min(matrix.items());
        let candidates = recommender.user_recs(&user_id, fetch);
        if candidates.is_empty() {
            debug!(user_id, "model has no factors for user");
        }

        Ok(candidates
            .into_iter()
            .filter(|&(item, _)| !seen.contains(item))
            .take(n)
            .map(|(&item, score)| (item, score))
            .collect())
    }
}
