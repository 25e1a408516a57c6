//! Genre entity.

/// A slug-addressed genre tag; a title may carry many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Input data for creating a new genre.
#[derive(Debug, Clone)]
pub struct NewGenre {
    pub name: String,
    pub slug: String,
}
