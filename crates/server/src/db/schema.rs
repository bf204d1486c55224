use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::info;

use crate::db::entities::prelude::*;

/// Creates any missing table, parents before children so foreign keys resolve.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        create_statement(&schema, User),
        create_statement(&schema, Monitor),
        create_statement(&schema, Heartbeat),
        create_statement(&schema, Tag),
        create_statement(&schema, MonitorTag),
        create_statement(&schema, Maintenance),
        create_statement(&schema, StatusPage),
        create_statement(&schema, StatusPageMonitor),
    ];

    for statement in &statements {
        db.execute(backend.build(statement)).await?;
    }

    info!(tables = statements.len(), "Database schema ensured.");
    Ok(())
}

fn create_statement<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    statement
}
