use crate::{
    api::error,
    modules::movie::{
        model::MovieFields,
        repository::MovieRepository,
        schema::{MovieClass, MovieEntity, MovieSearchRow, MovieSummary},
    },
};

#[derive(Clone)]
pub struct MovieRepositoryPg {
    pool: sqlx::PgPool,
}

impl MovieRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    async fn insert_classes(
        conn: &mut sqlx::PgConnection,
        movie_id: i64,
        classes: &[MovieClass],
    ) -> Result<(), error::SystemError> {
        if classes.is_empty() {
            return Ok(());
        }

        let titles: Vec<&str> = classes.iter().map(|c| c.title.as_str()).collect();
        let values: Vec<&str> = classes.iter().map(|c| c.value.as_str()).collect();

        sqlx::query(
            r#"
            INSERT INTO movie_classes (movie_id, title, value)
            SELECT $1, t.title, t.value
            FROM UNNEST($2::text[], $3::text[]) AS t(title, value)
            "#,
        )
        .bind(movie_id)
        .bind(&titles)
        .bind(&values)
        .execute(conn)
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl MovieRepository for MovieRepositoryPg {
    async fn find_all(&self) -> Result<Vec<MovieSummary>, error::SystemError> {
        let movies = sqlx::query_as::<_, MovieSummary>(
            "SELECT id, title, director, year FROM movies ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSearchRow>, error::SystemError> {
        let search_pattern =
            format!("%{}%", query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"));
        let movies = sqlx::query_as::<_, MovieSearchRow>(
            r#"
            SELECT id, title
            FROM movies
            WHERE lower(title) LIKE lower($1)
               OR lower(description) LIKE lower($1)
               OR lower(director) LIKE lower($1)
            ORDER BY id DESC
            "#,
        )
        .bind(&search_pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MovieEntity>, error::SystemError> {
        let movie = sqlx::query_as::<_, MovieEntity>(
            r#"
            SELECT m.id, m.title, m.director, m.year, m.description, u.id AS user_id, u.username
            FROM movies m
            JOIN users u ON m.user_id = u.id
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn find_classes(&self, movie_id: i64) -> Result<Vec<MovieClass>, error::SystemError> {
        let classes = sqlx::query_as::<_, MovieClass>(
            "SELECT title, value FROM movie_classes WHERE movie_id = $1 ORDER BY id",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    async fn find_class_scheme(&self) -> Result<Vec<MovieClass>, error::SystemError> {
        let classes = sqlx::query_as::<_, MovieClass>("SELECT title, value FROM classes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(classes)
    }

    async fn create(
        &self,
        user_id: i64,
        movie: &MovieFields,
        classes: &[MovieClass],
    ) -> Result<i64, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let movie_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO movies (title, director, year, description, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(movie.year)
        .bind(&movie.description)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_classes(&mut *tx, movie_id, classes).await?;

        tx.commit().await?;
        Ok(movie_id)
    }

    async fn update(
        &self,
        id: i64,
        movie: &MovieFields,
        classes: &[MovieClass],
    ) -> Result<(), error::SystemError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE movies
            SET title = $1, director = $2, year = $3, description = $4
            WHERE id = $5
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(movie.year)
        .bind(&movie.description)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM movie_classes WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_classes(&mut *tx, id, classes).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM movies WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
