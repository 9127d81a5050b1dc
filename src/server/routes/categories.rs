use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        Category, Question,
    },
    server::{app::AppState, errors::ApiError},
};

use super::ApiResponse;

/// Category id to label, serialized as a JSON object keyed by the id.
pub(super) type CategoryMap = BTreeMap<i64, String>;

pub(super) fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<CategoryQuestionsResponse>> {
    let Path(id) = id?;
    let questions = get_questions_for_category(&pool, &id.to_string()).await?;
    if questions.is_empty() {
        tracing::debug!(category = id, "No questions in category");
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
