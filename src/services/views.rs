//! Helpers shared by the page assemblers

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{EntityKind, Genre, GenreOption},
};

/// Offer every genre, checking the ones in `selected`. Order is kept.
pub fn mark_selected(genres: Vec<Genre>, selected: &[Uuid]) -> Vec<GenreOption> {
    genres
        .into_iter()
        .map(|genre| {
            let checked = selected.contains(&genre.id);
            GenreOption { genre, checked }
        })
        .collect()
}

/// A missing primary entity is NotFound, whatever the page
pub fn require<T>(found: Option<T>, kind: EntityKind, id: Uuid) -> AppResult<T> {
    found.ok_or_else(|| AppError::not_found(kind, id))
}
