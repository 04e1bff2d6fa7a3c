use std::sync::Arc;

use serde::Serialize;

use backend::TrainerBackend;
use trainer_core::catalog::{ReadingList, categories, filter_by_category, titles_on_list};
use trainer_core::model::{Book, BookId, ReadingStatus};

use crate::error::ServiceError;

/// A recommended book and whether it is already on the trainer's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub book: Book,
    pub on_my_list: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooksView {
    pub categories: Vec<String>,
    pub selected_category: String,
    pub recommendations: Vec<Recommendation>,
    pub my_list: ReadingList,
}

#[derive(Clone)]
pub struct BooksService {
    backend: Arc<dyn TrainerBackend>,
}

impl BooksService {
    #[must_use]
    pub fn new(backend: Arc<dyn TrainerBackend>) -> Self {
        Self { backend }
    }

    /// Recommendations in `category` (or `"all"`) alongside the trainer's list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Backend` if either list fails to load.
    pub async fn load(&self, category: &str) -> Result<BooksView, ServiceError> {
        let (defaults, mine) =
            tokio::try_join!(self.backend.default_books(), self.backend.my_books())?;

        let owned = titles_on_list(&mine);
        let recommendations = filter_by_category(&defaults, category)
            .into_iter()
            .map(|book| Recommendation {
                on_my_list: owned.contains(book.title.as_str()),
                book: book.clone(),
            })
            .collect::<Vec<_>>();
        tracing::debug!(
            category,
            shown = recommendations.len(),
            mine = mine.len(),
            "books loaded"
        );

        Ok(BooksView {
            categories: categories(&defaults),
            selected_category: category.to_string(),
            recommendations,
            my_list: ReadingList::group(&mine),
        })
    }

    /// Put a recommended book on the trainer's list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::AlreadyOnList` when a book with the same title is
    /// already listed, else backend errors (`NotFound` for an unknown id).
    pub async fn add_to_list(&self, id: BookId) -> Result<Book, ServiceError> {
        let (defaults, mine) =
            tokio::try_join!(self.backend.default_books(), self.backend.my_books())?;
        let owned = titles_on_list(&mine);
        if let Some(book) = defaults.iter().find(|b| b.id == id) {
            if owned.contains(book.title.as_str()) {
                return Err(ServiceError::AlreadyOnList {
                    title: book.title.clone(),
                });
            }
        }
        let book = self.backend.add_book_to_list(id).await?;
        tracing::info!(book_id = %book.id, "book added to reading list");
        Ok(book)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Backend` if the update is rejected.
    pub async fn set_status(&self, id: BookId, status: ReadingStatus) -> Result<Book, ServiceError> {
        let book = self.backend.update_book_status(id, status).await?;
        tracing::info!(book_id = %id, status = status.as_wire(), "reading status updated");
        Ok(book)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Backend` if the book is not on the list.
    pub async fn remove(&self, id: BookId) -> Result<(), ServiceError> {
        self.backend.remove_book(id).await?;
        tracing::info!(book_id = %id, "book removed from reading list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::{BackendError, InMemoryBackend};
    use trainer_core::catalog::ALL_CATEGORIES;

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new().with_books(
            vec![
                Book::new(BookId::new(1), "Don't Shoot the Dog", "Pryor").in_category("training"),
                Book::new(BookId::new(2), "The Other End of the Leash", "McConnell")
                    .in_category("behavior"),
                Book::new(BookId::new(3), "Plenty in Life Is Free", "Schade")
                    .in_category("training"),
            ],
            vec![
                Book::new(BookId::new(10), "Don't Shoot the Dog", "Pryor")
                    .with_status(ReadingStatus::InProgress),
            ],
        )
    }

    #[tokio::test]
    async fn category_filter_and_list_flags() {
        let view = BooksService::new(Arc::new(backend()))
            .load("training")
            .await
            .unwrap();

        assert_eq!(view.categories, vec!["all", "training", "behavior"]);
        let flags: Vec<(u64, bool)> = view
            .recommendations
            .iter()
            .map(|r| (r.book.id.value(), r.on_my_list))
            .collect();
        assert_eq!(flags, vec![(1, true), (3, false)]);
        assert_eq!(view.my_list.in_progress.len(), 1);
    }

    #[tokio::test]
    async fn all_keeps_every_recommendation() {
        let view = BooksService::new(Arc::new(backend()))
            .load(ALL_CATEGORIES)
            .await
            .unwrap();

        assert_eq!(view.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn listed_titles_are_not_added_twice() {
        let backend = backend();
        let service = BooksService::new(Arc::new(backend.clone()));

        let err = service.add_to_list(BookId::new(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyOnList { .. }));

        let added = service.add_to_list(BookId::new(3)).await.unwrap();
        service.set_status(added.id, ReadingStatus::Read).await.unwrap();

        let view = service.load(ALL_CATEGORIES).await.unwrap();
        assert_eq!(view.my_list.read.len(), 1);
        assert!(view.recommendations.iter().all(|r| r.on_my_list || r.book.id.value() == 2));

        service.remove(added.id).await.unwrap();
        let err = service.remove(added.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Backend(BackendError::NotFound)));
    }
}
