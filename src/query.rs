use async_trait::async_trait;
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, sea_query::SimpleExpr,
};

use crate::filtering::{Predicate, column_ref};
use crate::pagination::MAX_WINDOW;
use crate::sort::Direction;

/// The query collaborator a search is applied to.
///
/// Chaining methods take and return `self`; only [`QueryHandle::count`] and
/// [`QueryHandle::fetch`] reach the database.
#[async_trait]
pub trait QueryHandle: Sized + Send + Sync {
    type Row: Send;
    type Rows: Iterator<Item = Self::Row> + Send;

    /// AND one more predicate onto the query.
    #[must_use]
    fn add_predicate(self, predicate: &Predicate) -> Self;

    /// Order by a single, already validated field.
    #[must_use]
    fn order_by(self, field: &str, direction: Direction) -> Self;

    /// Restrict the result window.
    #[must_use]
    fn limit(self, offset: u64, limit: u64) -> Self;

    /// Count rows matching the current predicates, ignoring any window.
    async fn count(&self) -> Result<u64, DbErr>;

    /// Run the query. Rows are yielded once, in query order.
    async fn fetch(self) -> Result<Self::Rows, DbErr>;
}

/// [`QueryHandle`] over a Sea-ORM `Select` and the connection it runs on.
pub struct EntityQuery<'db, E: EntityTrait> {
    select: Select<E>,
    db: &'db DatabaseConnection,
}

impl<'db, E: EntityTrait> EntityQuery<'db, E> {
    #[must_use]
    pub fn new(select: Select<E>, db: &'db DatabaseConnection) -> Self {
        Self { select, db }
    }

    /// Apply an arbitrary condition, e.g. from a custom operator.
    #[must_use]
    pub fn filter(self, expr: SimpleExpr) -> Self {
        Self {
            select: self.select.filter(expr),
            db: self.db,
        }
    }

    #[must_use]
    pub fn select(&self) -> &Select<E> {
        &self.select
    }

    #[must_use]
    pub fn into_select(self) -> Select<E> {
        self.select
    }
}

#[async_trait]
impl<'db, E> QueryHandle for EntityQuery<'db, E>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
{
    type Row = E::Model;
    type Rows = std::vec::IntoIter<E::Model>;

    fn add_predicate(self, predicate: &Predicate) -> Self {
        self.filter(predicate.to_expr())
    }

    fn order_by(self, field: &str, direction: Direction) -> Self {
        Self {
            select: self
                .select
                .order_by(SimpleExpr::Column(column_ref(field)), direction.into()),
            db: self.db,
        }
    }

    fn limit(self, offset: u64, limit: u64) -> Self {
        Self {
            select: self
                .select
                .offset(offset.min(MAX_WINDOW))
                .limit(limit.min(MAX_WINDOW)),
            db: self.db,
        }
    }

    async fn count(&self) -> Result<u64, DbErr> {
        PaginatorTrait::count(self.select.clone(), self.db).await
    }

    async fn fetch(self) -> Result<Self::Rows, DbErr> {
        Ok(self.select.all(self.db).await?.into_iter())
    }
}
