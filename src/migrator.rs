use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_table::Migration),
            Box::new(m20240301_000002_create_shipments_table::Migration),
            Box::new(m20240301_000003_create_trading_steps_table::Migration),
            Box::new(m20240301_000004_create_products_table::Migration),
            Box::new(m20240301_000005_create_rfq_submissions_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_users_email")
                        .table(Users::Table)
                        .col(Users::Email)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000002_create_shipments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_shipments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Shipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shipments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::DisplayId).string().not_null())
                        .col(ColumnDef::new(Shipments::UserId).uuid().not_null())
                        .col(ColumnDef::new(Shipments::ClientId).string().not_null())
                        .col(ColumnDef::new(Shipments::ClientName).string().not_null())
                        .col(ColumnDef::new(Shipments::ClientEmail).string().not_null())
                        .col(ColumnDef::new(Shipments::ClientPhone).string().null())
                        .col(
                            ColumnDef::new(Shipments::NotificationsEnabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Shipments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Shipments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_shipments_display_id")
                        .table(Shipments::Table)
                        .col(Shipments::DisplayId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_shipments_user_id")
                        .table(Shipments::Table)
                        .col(Shipments::UserId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Shipments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Shipments {
        Table,
        Id,
        DisplayId,
        UserId,
        ClientId,
        ClientName,
        ClientEmail,
        ClientPhone,
        NotificationsEnabled,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000003_create_trading_steps_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_trading_steps_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TradingSteps::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TradingSteps::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TradingSteps::ShipmentId).uuid().not_null())
                        .col(
                            ColumnDef::new(TradingSteps::StepNumber)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TradingSteps::Status).text().not_null())
                        .col(
                            ColumnDef::new(TradingSteps::RequiredActions)
                                .json()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TradingSteps::CompletedActions)
                                .json()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TradingSteps::Notes).string().null())
                        .col(
                            ColumnDef::new(TradingSteps::EstimatedCompletion)
                                .date()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TradingSteps::StartedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TradingSteps::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // One record per template step per shipment
            manager
                .create_index(
                    Index::create()
                        .name("idx_trading_steps_shipment_step")
                        .table(TradingSteps::Table)
                        .col(TradingSteps::ShipmentId)
                        .col(TradingSteps::StepNumber)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TradingSteps::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum TradingSteps {
        Table,
        Id,
        ShipmentId,
        StepNumber,
        Status,
        RequiredActions,
        CompletedActions,
        Notes,
        EstimatedCompletion,
        StartedAt,
        UpdatedAt,
    }
}

mod m20240301_000004_create_products_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::UserId).uuid().not_null())
                        .col(ColumnDef::new(Products::Title).string().not_null())
                        .col(ColumnDef::new(Products::Description).string().not_null())
                        .col(ColumnDef::new(Products::Category).string().not_null())
                        .col(ColumnDef::new(Products::ImageUrl).string().null())
                        .col(ColumnDef::new(Products::Specifications).json().not_null())
                        .col(ColumnDef::new(Products::Certifications).json().not_null())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_products_category")
                        .table(Products::Table)
                        .col(Products::Category)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Products {
        Table,
        Id,
        UserId,
        Title,
        Description,
        Category,
        ImageUrl,
        Specifications,
        Certifications,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000005_create_rfq_submissions_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_rfq_submissions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RfqSubmissions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RfqSubmissions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RfqSubmissions::FullName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RfqSubmissions::Email).string().not_null())
                        .col(ColumnDef::new(RfqSubmissions::Company).string().not_null())
                        .col(ColumnDef::new(RfqSubmissions::Phone).string().null())
                        .col(
                            ColumnDef::new(RfqSubmissions::ProductCategory)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RfqSubmissions::ProductSpecifications)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RfqSubmissions::Quantity)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RfqSubmissions::Unit).string().not_null())
                        .col(
                            ColumnDef::new(RfqSubmissions::Incoterm)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RfqSubmissions::AdditionalInfo)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RfqSubmissions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RfqSubmissions::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum RfqSubmissions {
        Table,
        Id,
        FullName,
        Email,
        Company,
        Phone,
        ProductCategory,
        ProductSpecifications,
        Quantity,
        Unit,
        Incoterm,
        AdditionalInfo,
        CreatedAt,
    }
}
