//! Fixtures for service tests

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    models::{Author, Book, BookInstance, BookInstanceStatus},
    repository::Repository,
    store::MemoryStore,
};

pub fn memory_repository() -> Repository {
    Repository::new(Arc::new(MemoryStore::new()))
}

pub fn author(family_name: &str) -> Author {
    Author {
        id: Uuid::new_v4(),
        first_name: "Jane".into(),
        family_name: family_name.into(),
        date_of_birth: None,
        date_of_death: None,
    }
}

pub fn book(title: &str, author: Uuid, genre: Vec<Uuid>) -> Book {
    Book {
        id: Uuid::new_v4(),
        title: title.into(),
        summary: "A summary.".into(),
        isbn: "9780000000000".into(),
        author,
        genre,
    }
}

pub fn instance(book: Uuid, status: BookInstanceStatus) -> BookInstance {
    BookInstance {
        id: Uuid::new_v4(),
        book,
        imprint: "First edition".into(),
        status,
        due_back: None,
    }
}
