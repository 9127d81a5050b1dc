use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{self, get_all_questions, get_question_by_id, search_questions},
        },
        Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_lenient_string, StringOrInt},
        errors::ApiError,
        pagination::{paginate, PageQuery},
    },
};

use super::categories::{category_map, CategoryMap};
use super::ApiResponse;

#[derive(Deserialize)]
struct NewQuestion {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    category: Option<StringOrInt>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

struct ValidQuestion {
    question: String,
    answer: String,
    category: String,
    difficulty: i64,
}

impl NewQuestion {
    /// Every field has to be present and non-empty; a difficulty of 0 is
    /// rejected along with the rest.
    fn validate(self) -> Result<ValidQuestion, ApiError> {
        match (self.question, self.answer, self.category, self.difficulty) {
            (Some(question), Some(answer), Some(category), Some(difficulty))
                if !question.is_empty()
                    && !answer.is_empty()
                    && category.is_truthy()
                    && difficulty != 0 =>
            {
                Ok(ValidQuestion {
                    question,
                    answer,
                    category: category.into_string(),
                    difficulty,
                })
            }
            _ => Err(ApiError::Unprocessable),
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm", default)]
    #[serde(deserialize_with = "deserialize_lenient_string")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: CategoryMap,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

async fn questions_page(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionsPage>> {
    let Query(query) = query?;
    let selection = get_all_questions(&pool).await?;
    let total_questions = selection.len();
    let questions = paginate(query.page(), selection);
    if questions.is_empty() {
        tracing::debug!(page = query.page(), "Requested page is empty");
        return Err(ApiError::NotFound);
    }
    let categories = get_all_categories(&pool).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: category_map(categories),
        current_category: None,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<NewQuestion>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(body) = body?;
    let new_question = body.validate()?;

    let id = questions::create_question(
        &pool,
        &new_question.question,
        &new_question.answer,
        &new_question.category,
        new_question.difficulty,
    )
    .await?;
    tracing::info!(id, "Question created");

    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    let Path(id) = id?;
    get_question_by_id(&pool, id).await?;
    questions::delete_question(&pool, id).await?;
    tracing::info!(id, "Question deleted");

    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn search(
    State(pool): State<SqlitePool>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let Json(body) = body?;
    let questions = search_questions(&pool, &body.search_term).await?;

    Ok(Json(SearchResults {
        success: true,
        total_questions: questions.len(),
        questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(questions_page).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
