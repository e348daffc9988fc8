//! Delete guard: no delete while dependents exist
//!
//! Each attempt is `checking -> blocked | authorized`. Blocked attempts
//! mutate nothing and report the dependents. Authorized attempts call the
//! store's conditional delete, which re-checks references atomically; if a
//! dependent appeared in between, the attempt is reported as blocked after
//! all. Dependents are never cascade-deleted.

use uuid::Uuid;

use super::references::{Dependents, ReferenceIndex};
use crate::{
    error::{AppError, AppResult, ConflictReport},
    models::{CatalogEntity, Entity, EntityKind},
    repository::{narrow, Repository},
    store::DeleteOutcome,
};

#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Blocked(Dependents),
    Authorized,
}

/// A delete candidate and what the guard thinks of it
#[derive(Debug, Clone)]
pub struct Inspection {
    pub target: Entity,
    pub decision: GuardDecision,
}

impl Inspection {
    pub fn is_blocked(&self) -> bool {
        matches!(self.decision, GuardDecision::Blocked(_))
    }

    pub fn dependents(&self) -> Dependents {
        match &self.decision {
            GuardDecision::Blocked(dependents) => dependents.clone(),
            GuardDecision::Authorized => Dependents::default(),
        }
    }
}

#[derive(Clone)]
pub struct DeleteGuard {
    repository: Repository,
    references: ReferenceIndex,
}

impl DeleteGuard {
    pub fn new(repository: Repository, references: ReferenceIndex) -> Self {
        Self {
            repository,
            references,
        }
    }

    /// Fetch the target and its dependents together. Advisory only: a
    /// concurrent request may change the answer before a delete is attempted.
    pub async fn inspect(&self, kind: EntityKind, id: Uuid) -> AppResult<Inspection> {
        let (target, dependents) = tokio::try_join!(
            self.repository.find_entity(kind, id),
            self.references.dependents_of(kind, id),
        )?;
        let target = target.ok_or_else(|| AppError::not_found(kind, id))?;

        let decision = if dependents.is_empty() {
            GuardDecision::Authorized
        } else {
            GuardDecision::Blocked(dependents)
        };
        Ok(Inspection { target, decision })
    }

    /// Delete the target unless something references it.
    /// Returns the entity as it was just before removal.
    pub async fn delete(&self, kind: EntityKind, id: Uuid) -> AppResult<Entity> {
        let inspection = self.inspect(kind, id).await?;
        if let GuardDecision::Blocked(dependents) = inspection.decision {
            return Err(self.blocked(inspection.target, dependents));
        }

        match self.repository.delete(kind, id).await? {
            DeleteOutcome::Deleted(prior) => {
                tracing::info!("Deleted {} {}", kind, id);
                Ok(prior)
            }
            DeleteOutcome::Missing => Err(AppError::not_found(kind, id)),
            DeleteOutcome::Referenced => {
                // A dependent was created after the inspection
                let dependents = self.references.dependents_of(kind, id).await?;
                Err(self.blocked(inspection.target, dependents))
            }
        }
    }

    /// Typed [`DeleteGuard::inspect`] for delete previews
    pub async fn preview<T: CatalogEntity>(&self, id: Uuid) -> AppResult<(T, Dependents)> {
        let inspection = self.inspect(T::KIND, id).await?;
        let dependents = inspection.dependents();
        Ok((narrow(inspection.target)?, dependents))
    }

    pub async fn delete_as<T: CatalogEntity>(&self, id: Uuid) -> AppResult<T> {
        narrow(self.delete(T::KIND, id).await?)
    }

    fn blocked(&self, target: Entity, dependents: Dependents) -> AppError {
        let kind = target.kind();
        // The store saw a reference that is gone again by the re-read
        let message = if dependents.is_empty() {
            format!("{} {} is still referenced", kind.title(), target.id())
        } else {
            dependents.summary(kind)
        };
        tracing::warn!("Delete of {} {} blocked: {}", kind, target.id(), message);
        AppError::ReferentialConflict(Box::new(ConflictReport {
            entity: target,
            dependent_kind: dependents.kind,
            dependents: dependents.entities,
            message,
        }))
    }
}
