use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::db::OrmConn;
use crate::entity::user_types;
use crate::entity::users::{ActiveModel, Column, Entity as Users, Model};
use crate::error::AppResult;

/// A user row joined with its role row.
pub type UserWithRole = (Model, Option<user_types::Model>);

/// Case-insensitive email lookup; this is the path used for login and
/// for the edit-conflict check, which is why email uniqueness must be
/// enforced case-insensitively at write time.
pub async fn get_by_email(orm: &OrmConn, email: &str) -> AppResult<Option<UserWithRole>> {
    let target = email.trim().to_lowercase();
    if target.is_empty() {
        return Ok(None);
    }
    let found = Users::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Email))).eq(target))
        .find_also_related(user_types::Entity)
        .one(orm)
        .await?;
    Ok(found)
}

pub async fn get_by_id(orm: &OrmConn, id: i32) -> AppResult<Option<UserWithRole>> {
    let found = Users::find_by_id(id)
        .find_also_related(user_types::Entity)
        .one(orm)
        .await?;
    Ok(found)
}

pub async fn search(
    orm: &OrmConn,
    query: Option<&str>,
    page: u64,
    page_size: u64,
    exclude_user_id: Option<i32>,
) -> AppResult<(Vec<UserWithRole>, u64)> {
    let mut condition = Condition::all();
    if let Some(id) = exclude_user_id {
        condition = condition.add(Column::Id.ne(id));
    }
    if let Some(term) = query.map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{term}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::LastName).ilike(pattern.clone()))
                .add(Expr::col(Column::Email).ilike(pattern)),
        );
    }

    let base = Users::find().filter(condition);
    let total = base.clone().count(orm).await?;

    let items = base
        .find_also_related(user_types::Entity)
        .order_by_desc(Column::CreatedAt)
        .limit(page_size)
        .offset(page.saturating_sub(1).saturating_mul(page_size))
        .all(orm)
        .await?;

    Ok((items, total))
}

pub async fn list_user_types(orm: &OrmConn) -> AppResult<Vec<user_types::Model>> {
    let types = user_types::Entity::find()
        .order_by_asc(user_types::Column::Name)
        .all(orm)
        .await?;
    Ok(types)
}

pub async fn insert(orm: &OrmConn, mut active: ActiveModel) -> Result<Model, sea_orm::DbErr> {
    let now = Utc::now();
    active.created_at = Set(now);
    active.updated_at = Set(Some(now));
    active.insert(orm).await
}

pub async fn update(orm: &OrmConn, mut active: ActiveModel) -> Result<Model, sea_orm::DbErr> {
    active.updated_at = Set(Some(Utc::now()));
    active.update(orm).await
}

/// Returns false when no row with the given id exists.
pub async fn delete(orm: &OrmConn, id: i32) -> Result<bool, sea_orm::DbErr> {
    let result = Users::delete_by_id(id).exec(orm).await?;
    Ok(result.rows_affected > 0)
}
