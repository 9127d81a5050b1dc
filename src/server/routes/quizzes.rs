use std::collections::HashSet;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rand::{seq::IteratorRandom, Rng};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{get_all_questions, get_questions_for_category},
        Question,
    },
    server::{app::AppState, deserializers::StringOrInt, errors::ApiError},
    telemetry::QUIZ_QUESTIONS_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Vec<i64>,
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize)]
struct QuizCategory {
    // the key is required, but null, 0 and "" all mean "all categories"
    #[serde(deserialize_with = "Option::deserialize")]
    id: Option<StringOrInt>,
}

impl QuizCategory {
    /// Category to draw from as stored in the questions table. A string id is
    /// taken as is, so `"0"` selects the (empty) category "0".
    fn filter(&self) -> Option<String> {
        self.id
            .clone()
            .filter(StringOrInt::is_truthy)
            .map(StringOrInt::into_string)
    }
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

/// Picks uniformly among the candidates that were not asked before.
fn pick_question<R: Rng + ?Sized>(
    candidates: Vec<Question>,
    previous: &[i64],
    rng: &mut R,
) -> Option<Question> {
    let asked: HashSet<i64> = previous.iter().copied().collect();
    candidates
        .into_iter()
        .filter(|question| !asked.contains(&question.id))
        .choose(rng)
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizQuestion>> {
    let Json(body) = body?;
    let Some(quiz_category) = body.quiz_category else {
        tracing::debug!("Quiz request without quiz_category");
        return Err(ApiError::Unprocessable);
    };

    let category = quiz_category.filter();
    let candidates = match category {
        Some(ref id) => get_questions_for_category(&pool, id).await?,
        None => get_all_questions(&pool).await?,
    };
    let question = pick_question(candidates, &body.previous_questions, &mut rand::thread_rng());

    if question.is_some() {
        let label = category.as_deref().unwrap_or("all");
        QUIZ_QUESTIONS_CNTR.with_label_values(&[label]).inc();
    } else {
        tracing::debug!(
            previous = body.previous_questions.len(),
            "No questions left for quiz"
        );
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
