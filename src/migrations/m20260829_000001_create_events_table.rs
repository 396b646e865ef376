use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Timestamp).timestamp().not_null())
                    .col(ColumnDef::new(Events::Source).string().not_null())
                    .col(ColumnDef::new(Events::EventType).string().not_null())
                    .col(ColumnDef::new(Events::Ip).string().not_null())
                    .col(ColumnDef::new(Events::Method).string().not_null())
                    .col(ColumnDef::new(Events::Uri).string().not_null())
                    .col(ColumnDef::new(Events::Username).text().null())
                    .col(ColumnDef::new(Events::Password).text().null())
                    .col(ColumnDef::new(Events::Filename).text().null())
                    .col(ColumnDef::new(Events::StoredAs).string().null())
                    .col(ColumnDef::new(Events::Size).big_integer().null())
                    .col(ColumnDef::new(Events::Mimetype).string().null())
                    .col(ColumnDef::new(Events::Sha256).string().null())
                    .col(ColumnDef::new(Events::Error).text().null())
                    .col(ColumnDef::new(Events::RawLog).text().null())
                    .to_owned(),
            )
            .await?;

        // Analysts query by type and time; keep both cheap.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_event_type")
                    .table(Events::Table)
                    .col(Events::EventType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_timestamp")
                    .table(Events::Table)
                    .col(Events::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    Timestamp,
    Source,
    EventType,
    Ip,
    Method,
    Uri,
    Username,
    Password,
    Filename,
    StoredAs,
    Size,
    Mimetype,
    Sha256,
    Error,
    RawLog,
}
