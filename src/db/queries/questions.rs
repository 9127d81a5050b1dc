use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Id of the owning category, stored as text.
    pub category: String,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: &str,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring search over the question text. SQLite only
/// folds ASCII case in `LIKE`, so matching happens here with full Unicode
/// lowercasing; the term is matched literally.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let needle = term.to_lowercase();
    Ok(get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|question| question.question.to_lowercase().contains(&needle))
        .collect())
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: &str,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Deletes the question in its own transaction. Fails with `RowNotFound` when
/// nothing was deleted; the transaction is rolled back on every error path.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    if deleted == 0 {
        return Err(sqlx::Error::RowNotFound);
    }

    tx.commit().await
}

/// Inserts the questions keeping their ids, overwriting existing rows with the
/// same id.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO questions (id, question, answer, category, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(&question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
