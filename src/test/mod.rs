//! In-memory stand-in for Postgres and Redis used by the service tests.

use std::{collections::HashMap, sync::Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    middlewares::SessionContext,
    modules::{
        comment::{
            model::NewComment,
            repository::CommentRepository,
            schema::{CommentEntity, ReviewCommentRow},
        },
        movie::{
            model::MovieFields,
            repository::MovieRepository,
            schema::{MovieClass, MovieEntity, MovieSearchRow, MovieSummary},
        },
        review::{
            model::NewReview,
            repository::ReviewRepository,
            schema::{MovieReviewRow, ReviewEntity, UserReviewRow},
        },
        session::{repository::SessionRepository, schema::SessionRecord},
        user::{
            model::InsertUser,
            repository::UserRepository,
            schema::{UserEntity, UserProfile},
        },
    },
};

struct StoredUser {
    id: i64,
    username: String,
    password_hash: String,
    image: Option<Vec<u8>>,
    created_at: DateTime<Utc>,
}

struct StoredMovie {
    id: i64,
    user_id: i64,
    fields: MovieFields,
}

struct StoredReview {
    id: i64,
    movie_id: i64,
    user_id: i64,
    rating_id: i64,
    review: String,
    created_at: DateTime<Utc>,
}

struct StoredComment {
    id: i64,
    review_id: i64,
    user_id: i64,
    comment: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    users: Vec<StoredUser>,
    movies: Vec<StoredMovie>,
    movie_classes: Vec<(i64, MovieClass)>,
    scheme: Vec<MovieClass>,
    ratings: Vec<(i64, i32)>,
    reviews: Vec<StoredReview>,
    comments: Vec<StoredComment>,
    sessions: HashMap<Uuid, SessionRecord>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn username(&self, user_id: i64) -> String {
        self.users.iter().find(|u| u.id == user_id).map(|u| u.username.clone()).unwrap_or_default()
    }

    fn rating(&self, rating_id: i64) -> i32 {
        self.ratings.iter().find(|(id, _)| *id == rating_id).map(|(_, v)| *v).unwrap_or_default()
    }

    fn movie_title(&self, movie_id: i64) -> String {
        self.movies
            .iter()
            .find(|m| m.id == movie_id)
            .map(|m| m.fields.title.clone())
            .unwrap_or_default()
    }

    fn remove_review(&mut self, id: i64) {
        self.reviews.retain(|r| r.id != id);
        self.comments.retain(|c| c.review_id != id);
    }
}

/// Every repository trait over one shared in-memory state.
///
/// Seeded like the migrations: ratings 1-5 (stored under ids that differ
/// from their values) and a small classification scheme.
pub struct MemoryDb {
    state: Mutex<State>,
}

impl Default for MemoryDb {
    fn default() -> Self {
        let mut state = State::default();
        for value in ["S", "K-7", "K-12", "K-16", "K-18"] {
            state.scheme.push(MovieClass::new("Ikäraja", value));
        }
        for value in ["Draama", "Komedia", "Scifi"] {
            state.scheme.push(MovieClass::new("Genre", value));
        }
        state.ratings = (1..=5).map(|value| (100 + value as i64, value)).collect();
        MemoryDb { state: Mutex::new(state) }
    }
}

impl MemoryDb {
    /// Creates a user with a live session and returns that session.
    pub fn add_user(&self, username: &str) -> SessionContext {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.users.push(StoredUser {
            id,
            username: username.to_string(),
            password_hash: "not-a-hash".to_string(),
            image: None,
            created_at: Utc::now(),
        });

        let session = SessionContext {
            session_id: Uuid::new_v4(),
            user_id: id,
            username: username.to_string(),
            csrf_token: format!("{:0>32}", id),
        };
        state.sessions.insert(
            session.session_id,
            SessionRecord {
                user_id: id,
                username: username.to_string(),
                csrf_token: session.csrf_token.clone(),
            },
        );
        session
    }

    pub fn add_movie(&self, user_id: i64, title: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.movies.push(StoredMovie {
            id,
            user_id,
            fields: MovieFields {
                title: title.to_string(),
                director: "Ridley Scott".to_string(),
                year: 1979,
                description: "Avaruusrahtialus saa hätäkutsun.".to_string(),
            },
        });
        id
    }

    pub fn add_review(&self, movie_id: i64, user_id: i64, rating: i32, review: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let rating_id = state.ratings.iter().find(|(_, v)| *v == rating).map(|(id, _)| *id).unwrap();
        state.reviews.push(StoredReview {
            id,
            movie_id,
            user_id,
            rating_id,
            review: review.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_comment(&self, review_id: i64, user_id: i64, comment: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.comments.push(StoredComment {
            id,
            review_id,
            user_id,
            comment: comment.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn classes_of(&self, movie_id: i64) -> Vec<MovieClass> {
        let state = self.state.lock().unwrap();
        state.movie_classes.iter().filter(|(id, _)| *id == movie_id).map(|(_, c)| c.clone()).collect()
    }

    /// Review ids of a movie, newest first.
    pub fn reviews_of_movie(&self, movie_id: i64) -> Vec<i64> {
        let state = self.state.lock().unwrap();
        state.reviews.iter().rev().filter(|r| r.movie_id == movie_id).map(|r| r.id).collect()
    }

    /// Comment ids of a review, newest first.
    pub fn comments_of_review(&self, review_id: i64) -> Vec<i64> {
        let state = self.state.lock().unwrap();
        state.comments.iter().rev().filter(|c| c.review_id == review_id).map(|c| c.id).collect()
    }

    pub fn has_comment(&self, id: i64) -> bool {
        self.state.lock().unwrap().comments.iter().any(|c| c.id == id)
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryDb {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).map(|u| UserProfile {
            id: u.id,
            username: u.username.clone(),
            has_image: u.image.is_some(),
        }))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.username == username).map(|u| UserEntity {
            id: u.id,
            username: u.username.clone(),
            password_hash: u.password_hash.clone(),
            created_at: u.created_at,
        }))
    }

    async fn create(&self, user: &InsertUser) -> Result<i64, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(error::SystemError::Conflict(None));
        }
        let id = state.next_id();
        state.users.push(StoredUser {
            id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            image: None,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_image(&self, id: i64) -> Result<Option<Vec<u8>>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).and_then(|u| u.image.clone()))
    }

    async fn update_image(&self, id: i64, image: &[u8]) -> Result<(), error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.image = Some(image.to_vec());
        }
        Ok(())
    }

    async fn remove_image(&self, id: i64) -> Result<(), error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.image = None;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MovieRepository for MemoryDb {
    async fn find_all(&self) -> Result<Vec<MovieSummary>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .movies
            .iter()
            .rev()
            .map(|m| MovieSummary {
                id: m.id,
                title: m.fields.title.clone(),
                director: m.fields.director.clone(),
                year: m.fields.year,
            })
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSearchRow>, error::SystemError> {
        let query = query.to_lowercase();
        let state = self.state.lock().unwrap();
        Ok(state
            .movies
            .iter()
            .rev()
            .filter(|m| {
                [&m.fields.title, &m.fields.description, &m.fields.director]
                    .iter()
                    .any(|text| text.to_lowercase().contains(&query))
            })
            .map(|m| MovieSearchRow { id: m.id, title: m.fields.title.clone() })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MovieEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.movies.iter().find(|m| m.id == id).map(|m| MovieEntity {
            id: m.id,
            title: m.fields.title.clone(),
            director: m.fields.director.clone(),
            year: m.fields.year,
            description: m.fields.description.clone(),
            user_id: m.user_id,
            username: state.username(m.user_id),
        }))
    }

    async fn find_classes(&self, movie_id: i64) -> Result<Vec<MovieClass>, error::SystemError> {
        Ok(self.classes_of(movie_id))
    }

    async fn find_class_scheme(&self) -> Result<Vec<MovieClass>, error::SystemError> {
        Ok(self.state.lock().unwrap().scheme.clone())
    }

    async fn create(
        &self,
        user_id: i64,
        movie: &MovieFields,
        classes: &[MovieClass],
    ) -> Result<i64, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.movies.push(StoredMovie { id, user_id, fields: movie.clone() });
        state.movie_classes.extend(classes.iter().map(|c| (id, c.clone())));
        Ok(id)
    }

    async fn update(
        &self,
        id: i64,
        movie: &MovieFields,
        classes: &[MovieClass],
    ) -> Result<(), error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if let Some(stored) = state.movies.iter_mut().find(|m| m.id == id) {
            stored.fields = movie.clone();
        }
        state.movie_classes.retain(|(movie_id, _)| *movie_id != id);
        state.movie_classes.extend(classes.iter().map(|c| (id, c.clone())));
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), error::SystemError> {
        let mut state = self.state.lock().unwrap();
        state.movies.retain(|m| m.id != id);
        state.movie_classes.retain(|(movie_id, _)| *movie_id != id);
        let reviews: Vec<i64> =
            state.reviews.iter().filter(|r| r.movie_id == id).map(|r| r.id).collect();
        for review_id in reviews {
            state.remove_review(review_id);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReviewRepository for MemoryDb {
    async fn find_rating_id(&self, value: i32) -> Result<Option<i64>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.ratings.iter().find(|(_, v)| *v == value).map(|(id, _)| *id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ReviewEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.reviews.iter().find(|r| r.id == id).map(|r| ReviewEntity {
            id: r.id,
            review: r.review.clone(),
            created_at: r.created_at,
            rating: state.rating(r.rating_id),
            movie_id: r.movie_id,
            movie_title: state.movie_title(r.movie_id),
            user_id: r.user_id,
            username: state.username(r.user_id),
        }))
    }

    async fn find_by_movie(
        &self,
        movie_id: i64,
    ) -> Result<Vec<MovieReviewRow>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reviews
            .iter()
            .rev()
            .filter(|r| r.movie_id == movie_id)
            .map(|r| MovieReviewRow {
                id: r.id,
                rating: state.rating(r.rating_id),
                user_id: r.user_id,
                username: state.username(r.user_id),
                review: r.review.clone(),
                created_at: r.created_at,
            })
            .collect())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<UserReviewRow>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reviews
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .map(|r| UserReviewRow {
                id: r.id,
                movie_id: r.movie_id,
                movie_title: state.movie_title(r.movie_id),
                rating: state.rating(r.rating_id),
                review: r.review.clone(),
            })
            .collect())
    }

    async fn create(&self, review: &NewReview) -> Result<i64, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.reviews.push(StoredReview {
            id,
            movie_id: review.movie_id,
            user_id: review.user_id,
            rating_id: review.rating_id,
            review: review.review.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: i64,
        review: &str,
        rating_id: i64,
    ) -> Result<(), error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if let Some(stored) = state.reviews.iter_mut().find(|r| r.id == id) {
            stored.review = review.to_string();
            stored.rating_id = rating_id;
            stored.created_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), error::SystemError> {
        self.state.lock().unwrap().remove_review(id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CommentRepository for MemoryDb {
    async fn find_by_id(&self, id: i64) -> Result<Option<CommentEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.comments.iter().find(|c| c.id == id).map(|c| CommentEntity {
            id: c.id,
            comment: c.comment.clone(),
            created_at: c.created_at,
            review_id: c.review_id,
            user_id: c.user_id,
            username: state.username(c.user_id),
        }))
    }

    async fn find_by_review(
        &self,
        review_id: i64,
    ) -> Result<Vec<ReviewCommentRow>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .rev()
            .filter(|c| c.review_id == review_id)
            .map(|c| ReviewCommentRow {
                id: c.id,
                user_id: c.user_id,
                username: state.username(c.user_id),
                comment: c.comment.clone(),
                created_at: c.created_at,
            })
            .collect())
    }

    async fn create(&self, comment: &NewComment) -> Result<i64, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.comments.push(StoredComment {
            id,
            review_id: comment.review_id,
            user_id: comment.user_id,
            comment: comment.comment.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update(&self, id: i64, comment: &str) -> Result<(), error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if let Some(stored) = state.comments.iter_mut().find(|c| c.id == id) {
            stored.comment = comment.to_string();
            stored.created_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), error::SystemError> {
        self.state.lock().unwrap().comments.retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionRepository for MemoryDb {
    async fn save(
        &self,
        session_id: &Uuid,
        record: &SessionRecord,
        _expiration: u64,
    ) -> Result<(), error::SystemError> {
        self.state.lock().unwrap().sessions.insert(*session_id, record.clone());
        Ok(())
    }

    async fn find(&self, session_id: &Uuid) -> Result<Option<SessionRecord>, error::SystemError> {
        Ok(self.state.lock().unwrap().sessions.get(session_id).cloned())
    }

    async fn delete(&self, session_id: &Uuid) -> Result<(), error::SystemError> {
        self.state.lock().unwrap().sessions.remove(session_id);
        Ok(())
    }
}
