//! Filtering and grouping for the book list and the pet roster.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Book, Pet, ReadingStatus};

/// Category value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Distinct categories in first-seen order, with [`ALL_CATEGORIES`] first.
#[must_use]
pub fn categories(books: &[Book]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for category in books.iter().filter_map(|b| b.category.as_deref()) {
        if category != ALL_CATEGORIES && seen.insert(category) {
            out.push(category.to_string());
        }
    }
    out
}

/// Books in `category`; [`ALL_CATEGORIES`] keeps everything.
#[must_use]
pub fn filter_by_category<'a>(books: &'a [Book], category: &str) -> Vec<&'a Book> {
    if category == ALL_CATEGORIES {
        return books.iter().collect();
    }
    books
        .iter()
        .filter(|b| b.category.as_deref() == Some(category))
        .collect()
}

/// A trainer's list split by reading status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadingList {
    pub not_started: Vec<Book>,
    pub in_progress: Vec<Book>,
    pub read: Vec<Book>,
}

impl ReadingList {
    #[must_use]
    pub fn group(books: &[Book]) -> Self {
        let mut list = Self::default();
        for book in books {
            match book.status {
                ReadingStatus::NotStarted => list.not_started.push(book.clone()),
                ReadingStatus::InProgress => list.in_progress.push(book.clone()),
                ReadingStatus::Read => list.read.push(book.clone()),
            }
        }
        list
    }

    #[must_use]
    pub fn books_read(&self) -> usize {
        self.read.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.not_started.len() + self.in_progress.len() + self.read.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Titles already on the trainer's list, for flagging recommendations.
#[must_use]
pub fn titles_on_list(my_books: &[Book]) -> HashSet<&str> {
    my_books.iter().map(|b| b.title.as_str()).collect()
}

/// Active and inactive pets, each keeping input order.
#[must_use]
pub fn partition_pets(pets: &[Pet]) -> (Vec<Pet>, Vec<Pet>) {
    pets.iter().cloned().partition(|p| p.active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookId, PetId};

    fn book(id: u64, title: &str, category: &str) -> Book {
        Book::new(BookId::new(id), title, "Author").in_category(category)
    }

    #[test]
    fn categories_start_with_all_and_dedupe() {
        let books = vec![
            book(1, "A", "behavior"),
            book(2, "B", "training"),
            book(3, "C", "behavior"),
            Book::new(BookId::new(4), "D", "Author"),
        ];

        assert_eq!(categories(&books), vec!["all", "behavior", "training"]);
    }

    #[test]
    fn category_filter() {
        let books = vec![book(1, "A", "behavior"), book(2, "B", "training")];

        assert_eq!(filter_by_category(&books, "all").len(), 2);
        let training = filter_by_category(&books, "training");
        assert_eq!(training.len(), 1);
        assert_eq!(training[0].title, "B");
        assert!(filter_by_category(&books, "nutrition").is_empty());
    }

    #[test]
    fn reading_list_groups_by_status() {
        let books = vec![
            book(1, "A", "x").with_status(ReadingStatus::Read),
            book(2, "B", "x").with_status(ReadingStatus::InProgress),
            book(3, "C", "x"),
            book(4, "D", "x").with_status(ReadingStatus::Read),
        ];

        let list = ReadingList::group(&books);

        assert_eq!(list.books_read(), 2);
        assert_eq!(list.in_progress.len(), 1);
        assert_eq!(list.not_started[0].title, "C");
        assert_eq!(list.len(), 4);
        assert!(titles_on_list(&books).contains("D"));
    }

    #[test]
    fn pets_partition_by_active_flag() {
        let mut retired = Pet::new(PetId::new(2), "Old Timer");
        retired.active = false;
        let pets = vec![Pet::new(PetId::new(1), "Biscuit"), retired];

        let (active, inactive) = partition_pets(&pets);

        assert_eq!(active.len(), 1);
        assert_eq!(inactive[0].name, "Old Timer");
    }
}
