use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "monitor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub monitor_type: String,
    pub url: String,
    pub hostname: Option<String>,
    pub port: Option<i32>,
    /// Seconds between checks.
    pub interval: i32,
    pub retry_interval: i32,
    pub maxretries: i32,
    pub weight: i32,
    pub active: bool,
    pub method: String,
    pub keyword: Option<String>,
    /// JSON object stored as text.
    #[sea_orm(column_type = "Text", nullable)]
    pub headers: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    pub auth_method: Option<String>,
    pub basic_auth_user: Option<String>,
    pub basic_auth_pass: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_date: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::heartbeat::Entity")]
    Heartbeat,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::heartbeat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Heartbeat.def()
    }
}

impl Related<super::status_page_monitor::Entity> for Entity {
    fn to() -> RelationDef {
        super::status_page_monitor::Relation::Monitor.def().rev()
    }
}

// Many-to-many relation through status_page_monitor
impl Related<super::status_page::Entity> for Entity {
    fn to() -> RelationDef {
        super::status_page_monitor::Relation::StatusPage.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::status_page_monitor::Relation::Monitor.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
