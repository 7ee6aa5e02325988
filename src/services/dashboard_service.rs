use crate::{
    dto::products::CATEGORIES,
    error::AppResult,
    models::DashboardSummary,
    state::AppState,
};

/// Admin landing-page aggregates, computed with raw queries on the pool.
/// The six default categories always appear, zero-count when absent,
/// merged case-insensitively with whatever extra categories the data has.
pub async fn summary(state: &AppState) -> AppResult<DashboardSummary> {
    let (total_users,): (i64,) = sqlx::query_as("SELECT count(*) FROM users")
        .fetch_one(&state.pool)
        .await?;

    let (total_products,): (i64,) = sqlx::query_as("SELECT count(*) FROM products")
        .fetch_one(&state.pool)
        .await?;

    let (low_stock_count,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM products WHERE stock_quantity < 10")
            .fetch_one(&state.pool)
            .await?;

    let grouped: Vec<(String, i64)> =
        sqlx::query_as("SELECT category, count(*) FROM products GROUP BY category")
            .fetch_all(&state.pool)
            .await?;

    let (categories, category_counts) = merge_category_counts(&grouped);

    Ok(DashboardSummary {
        total_users,
        total_products,
        low_stock_count,
        categories,
        category_counts,
    })
}

/// The six default categories always appear, zero-count when absent;
/// extra categories found in the data are appended. Matching is
/// case-insensitive, so differently-cased rows collapse into one count.
fn merge_category_counts(grouped: &[(String, i64)]) -> (Vec<String>, Vec<i64>) {
    let mut categories: Vec<String> = CATEGORIES.iter().map(|c| c.to_string()).collect();
    for (category, _) in grouped {
        if !categories.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            categories.push(category.clone());
        }
    }

    let counts = categories
        .iter()
        .map(|category| {
            grouped
                .iter()
                .filter(|(g, _)| g.eq_ignore_ascii_case(category))
                .map(|(_, count)| *count)
                .sum()
        })
        .collect();

    (categories, counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_zero_filled_when_no_data() {
        let (categories, counts) = merge_category_counts(&[]);
        assert_eq!(categories.len(), CATEGORIES.len());
        assert!(counts.iter().all(|&count| count == 0));
    }

    #[test]
    fn differently_cased_rows_collapse_into_one_count() {
        let grouped = vec![("electronics".to_string(), 3), ("Electronics".to_string(), 2)];
        let (categories, counts) = merge_category_counts(&grouped);
        assert_eq!(categories.len(), CATEGORIES.len());
        let idx = categories.iter().position(|c| c == "Electronics").unwrap();
        assert_eq!(counts[idx], 5);
    }

    #[test]
    fn extra_categories_appended_after_defaults() {
        let grouped = vec![("Garden".to_string(), 4)];
        let (categories, counts) = merge_category_counts(&grouped);
        assert_eq!(categories.len(), CATEGORIES.len() + 1);
        assert_eq!(categories.last().map(String::as_str), Some("Garden"));
        assert_eq!(counts.last().copied(), Some(4));
    }
}
