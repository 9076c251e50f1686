#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Json, Router, extract::State, routing::get};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, EntityTrait, Set};
use sea_orm_migration::prelude::*;
use searchcrate::{
    Direction, EntityQuery, Predicate, QueryHandle, SearchError, SearchParams, SearchQuery,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub mod person_entity;

/// Name, email, age, status.
pub const PEOPLE: &[(&str, Option<&str>, i32, &str)] = &[
    ("Ann Lee", Some("ann@example.org"), 34, "active"),
    ("Bob Stone", Some("bob@example.com"), 17, "active"),
    ("Cara Ames", None, 52, "archived"),
    ("Dan Lee", Some("dan@example.org"), 25, "pending"),
    ("Eve Park", Some("eve@example.net"), 41, "active"),
];

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub async fn setup_people_db() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    for (name, email, age, status) in PEOPLE {
        person_entity::ActiveModel {
            name: Set((*name).to_string()),
            email: Set(email.map(str::to_string)),
            age: Set(*age),
            status: Set((*status).to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }
    Ok(db)
}

/// `count` people named `Person 1..=count`, aged by their number.
pub async fn setup_numbered_db(count: i32) -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    let people = (1..=count).map(|i| person_entity::ActiveModel {
        name: Set(format!("Person {i}")),
        email: Set(None),
        age: Set(i),
        status: Set("active".to_string()),
        ..Default::default()
    });
    person_entity::Entity::insert_many(people).exec(&db).await?;
    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/people", get(list_people))
        .with_state(db)
}

async fn list_people(
    State(db): State<DatabaseConnection>,
    params: SearchParams,
) -> Result<Json<Value>, SearchError> {
    let search = SearchQuery::new(
        EntityQuery::new(person_entity::Entity::find(), &db),
        params,
    )
    .await?;
    let page = search.fetch().await?;
    let state = page.state().clone();
    let rows: Vec<person_entity::Model> = page.collect();
    Ok(Json(json!({
        "rows": rows,
        "filtered": state.is_filtered(),
        "page": state.page(),
        "total_count": state.total_count(),
        "total_pages": state.total_pages(),
    })))
}

pub fn params(value: Value) -> SearchParams {
    serde_json::from_value(value).expect("valid search params")
}

/// In-memory query over the integers `1..=total` that records what was applied.
#[derive(Debug, Default)]
pub struct RecordingQuery {
    pub predicates: Vec<String>,
    pub orders: Vec<(String, Direction)>,
    pub window: Option<(u64, u64)>,
    pub count_calls: Arc<AtomicUsize>,
    pub fail_count: bool,
    total: u64,
}

impl RecordingQuery {
    pub fn with_total(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_count: true,
            ..Self::default()
        }
    }

    /// Handle on the count counter that outlives the query itself.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.count_calls)
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryHandle for RecordingQuery {
    type Row = u64;
    type Rows = std::vec::IntoIter<u64>;

    fn add_predicate(mut self, predicate: &Predicate) -> Self {
        self.predicates.push(predicate.template());
        self
    }

    fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.orders.push((field.to_string(), direction));
        self
    }

    fn limit(mut self, offset: u64, limit: u64) -> Self {
        self.window = Some((offset, limit));
        self
    }

    async fn count(&self) -> Result<u64, DbErr> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_count {
            return Err(DbErr::Custom("connection reset".to_string()));
        }
        Ok(self.total)
    }

    async fn fetch(self) -> Result<Self::Rows, DbErr> {
        let rows = 1..=self.total;
        let rows: Vec<u64> = match self.window {
            Some((offset, limit)) => rows
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => rows.collect(),
        };
        Ok(rows.into_iter())
    }
}

/// Build a search that is expected to fail.
pub async fn search_error<Q: QueryHandle>(query: Q, params: SearchParams) -> SearchError {
    match SearchQuery::new(query, params).await {
        Ok(_) => panic!("expected the search to be rejected"),
        Err(e) => e,
    }
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreatePeopleTable)]
    }
}

pub struct CreatePeopleTable;

impl MigrationName for CreatePeopleTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_people_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreatePeopleTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(People::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(People::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(People::Name).string().not_null())
            .col(ColumnDef::new(People::Email).string().null())
            .col(ColumnDef::new(People::Age).integer().not_null())
            .col(ColumnDef::new(People::Status).string().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(People::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum People {
    Table,
    Id,
    Name,
    Email,
    Age,
    Status,
}

impl Iden for People {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "people",
                Self::Id => "id",
                Self::Name => "name",
                Self::Email => "email",
                Self::Age => "age",
                Self::Status => "status",
            }
        )
        .unwrap();
    }
}
