use crate::{
    context::MovieContext,
    models::{Movie, MovieId},
};

/// Resolves a stable id to its catalog entry; `None` means not found
pub fn by_id(context: &MovieContext, id: MovieId) -> Option<&Movie> {
    context.catalog().get(id)
}

/// Case-insensitive exact match on the trimmed title; the first entry in
/// catalog order wins when titles repeat
pub fn by_title<'a>(context: &'a MovieContext, title: &str) -> Option<&'a Movie> {
    context.catalog().find_by_title(title)
}
