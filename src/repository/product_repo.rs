use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::db::OrmConn;
use crate::entity::products::{ActiveModel, Column, Entity as Products, Model};
use crate::error::AppResult;

/// Sort fields accepted by the product search; anything else falls back
/// to the default ordering (creation time, descending).
fn sort_column(sort_field: &str) -> Option<Column> {
    match sort_field.to_ascii_lowercase().as_str() {
        "name" => Some(Column::Name),
        "category" => Some(Column::Category),
        "price" => Some(Column::Price),
        "stockquantity" | "stock_quantity" => Some(Column::StockQuantity),
        _ => None,
    }
}

pub async fn search(
    orm: &OrmConn,
    query: Option<&str>,
    page: u64,
    page_size: u64,
    sort_field: Option<&str>,
    sort_dir: Option<&str>,
) -> AppResult<(Vec<Model>, u64)> {
    let mut condition = Condition::all();

    if let Some(term) = query.map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{term}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Category).ilike(pattern)),
        );
    }

    let mut finder = Products::find().filter(condition);

    let descending = sort_dir.is_some_and(|d| d.eq_ignore_ascii_case("desc"));
    finder = match sort_field.map(str::trim).filter(|f| !f.is_empty()).and_then(sort_column) {
        Some(col) if descending => finder.order_by_desc(col),
        Some(col) => finder.order_by_asc(col),
        None => finder.order_by_desc(Column::CreatedAt),
    };

    let total = finder.clone().count(orm).await?;

    let offset = page.saturating_sub(1).saturating_mul(page_size);
    let items = finder.limit(page_size).offset(offset).all(orm).await?;

    Ok((items, total))
}

pub async fn get_by_id(orm: &OrmConn, id: i32) -> AppResult<Option<Model>> {
    Ok(Products::find_by_id(id).one(orm).await?)
}

/// Case-sensitive exact-name existence check, optionally excluding one
/// row (the entity being edited).
pub async fn exists_by_name(
    orm: &OrmConn,
    name: &str,
    exclude_id: Option<i32>,
) -> AppResult<bool> {
    let mut finder = Products::find().filter(Column::Name.eq(name));
    if let Some(id) = exclude_id {
        finder = finder.filter(Column::Id.ne(id));
    }
    Ok(finder.count(orm).await? > 0)
}

pub async fn insert(orm: &OrmConn, mut active: ActiveModel) -> AppResult<Model> {
    active.created_at = Set(Utc::now());
    Ok(active.insert(orm).await?)
}

pub async fn update(orm: &OrmConn, mut active: ActiveModel) -> AppResult<Model> {
    active.updated_at = Set(Some(Utc::now()));
    Ok(active.update(orm).await?)
}

pub async fn delete(orm: &OrmConn, id: i32) -> AppResult<u64> {
    let result = Products::delete_by_id(id).exec(orm).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_is_case_insensitive() {
        assert!(matches!(sort_column("Name"), Some(Column::Name)));
        assert!(matches!(sort_column("PRICE"), Some(Column::Price)));
        assert!(matches!(
            sort_column("StockQuantity"),
            Some(Column::StockQuantity)
        ));
        assert!(matches!(sort_column("category"), Some(Column::Category)));
    }

    #[test]
    fn unknown_sort_field_falls_back() {
        assert!(sort_column("created_at").is_none());
        assert!(sort_column("id").is_none());
        assert!(sort_column("").is_none());
    }
}
