use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub last_name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub mobile_no: Option<String>,
    pub password_hash: String,
    pub user_type_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_types::Entity",
        from = "Column::UserTypeId",
        to = "super::user_types::Column::Id"
    )]
    UserType,
}

impl Related<super::user_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
