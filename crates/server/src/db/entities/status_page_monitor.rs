use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "status_page_monitor")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub status_page_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub monitor_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::status_page::Entity",
        from = "Column::StatusPageId",
        to = "super::status_page::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    StatusPage,

    #[sea_orm(
        belongs_to = "super::monitor::Entity",
        from = "Column::MonitorId",
        to = "super::monitor::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Monitor,
}

impl ActiveModelBehavior for ActiveModel {}
