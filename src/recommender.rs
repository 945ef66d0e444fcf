//! Recommendation facade: model output → named artists.

use serde::Serialize;
use tracing::debug;

use crate::catalog::ItemCatalog;
use crate::error::RecResult;
use crate::interaction::InteractionMatrix;
use crate::model::FactorizationModel;

/// One recommended artist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item_id: usize,
    pub name: String,
    pub score: f32,
}

/// Pairs a factorization model with the catalog used to name its output.
pub struct Recommender<M> {
    catalog: ItemCatalog,
    model: M,
}

impl<M: FactorizationModel> Recommender<M> {
    pub fn new(catalog: ItemCatalog, model: M) -> Self {
        Self { catalog, model }
    }

    /// Fit the model to the user-artist matrix.
    pub fn fit(&mut self, matrix: &InteractionMatrix) -> RecResult<()> {
        self.model.fit(matrix)?;
        Ok(())
    }

    /// Top `n` artists for `user_id`, in the model's score order.
    ///
    /// A returned id missing from the catalog fails the whole call with
    /// `UnknownItemId`.
    pub fn recommend(
        &self,
        user_id: usize,
        matrix: &InteractionMatrix,
        n: usize,
    ) -> RecResult<Vec<Recommendation>> {
        let scored = self.model.recommend(user_id, matrix, n)?;
        debug!(user_id, n, returned = scored.len(), "model recommendations");

        scored
            .into_iter()
            .map(|(item_id, score)| -> RecResult<Recommendation> {
                let name = self.catalog.name_of(item_id)?.to_string();
                Ok(Recommendation {
                    item_id,
                    name,
                    score,
                })
            })
            .collect()
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}
