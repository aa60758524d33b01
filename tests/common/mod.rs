#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use pagequery::{EntitySchema, FieldType, SchemaRegistry};
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait,
};
use serde_json::{Value, json};

pub mod person {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "people")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i32,
        pub name: String,
        pub age: f64,
        pub birthday: Date,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub const PERSON: &str = "person";

/// (id, name, age, birthday, created_at)
const PEOPLE: [(i32, &str, f64, &str, &str); 5] = [
    (1, "Alice", 30.0, "1994-03-01", "2020-01-01T10:00:00Z"),
    (2, "Bob", 17.0, "2007-06-15", "2021-05-05T08:30:00Z"),
    (3, "Carol", 45.0, "1979-11-30", "2002-04-20T12:30:52Z"),
    (4, "alicia", 22.5, "2002-04-20", "2023-07-07T00:00:00Z"),
    (5, "Dave", 30.0, "1994-01-01", "2019-12-31T23:59:59Z"),
];

pub fn schema() -> SchemaRegistry {
    SchemaRegistry::new().entity(
        EntitySchema::new(PERSON)
            .field("id", FieldType::Number)
            .field("name", FieldType::String)
            .field("age", FieldType::Number)
            .field("birthday", FieldType::Date)
            .field("created_at", FieldType::DateTime),
    )
}

/// The same people as JSON documents, for the in-memory backend
pub fn people_documents() -> Vec<Value> {
    PEOPLE
        .iter()
        .map(|(id, name, age, birthday, created_at)| {
            json!({
                "id": id,
                "name": name,
                "age": age,
                "birthday": birthday,
                "created_at": created_at,
            })
        })
        .collect()
}

fn person_model(
    (id, name, age, birthday, created_at): (i32, &str, f64, &str, &str),
) -> person::ActiveModel {
    let birthday = NaiveDate::parse_from_str(birthday, "%Y-%m-%d").expect("valid fixture date");
    let created_at = NaiveDateTime::parse_from_str(created_at, "%Y-%m-%dT%H:%M:%SZ")
        .expect("valid fixture datetime");

    person::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        age: Set(age),
        birthday: Set(birthday),
        created_at: Set(Utc.from_utc_datetime(&created_at)),
    }
}

/// Route library logs to the test output; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    db.execute_unprepared(
        r"
        CREATE TABLE people (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            age REAL NOT NULL,
            birthday TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        ",
    )
    .await?;

    person::Entity::insert_many(PEOPLE.into_iter().map(person_model))
        .exec_without_returning(&db)
        .await?;

    Ok(db)
}

pub fn document_ids(documents: &[Value]) -> Vec<i64> {
    documents
        .iter()
        .filter_map(|document| document["id"].as_i64())
        .collect()
}

pub fn model_ids(models: &[person::Model]) -> Vec<i64> {
    models.iter().map(|model| i64::from(model.id)).collect()
}
