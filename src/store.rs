use log::info;

use crate::error::{ApiError, ApiResult};
use crate::model::{Post, PostField, SortDirection};

/// In-memory, insertion-ordered collection of posts.
#[derive(Clone, Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new() -> PostStore {
        PostStore { posts: vec![] }
    }

    /// The two posts the service starts with.
    pub fn seeded() -> PostStore {
        PostStore {
            posts: vec![
                Post::new(1, "First post", "This is the first post."),
                Post::new(2, "Second post", "This is the second post."),
            ],
        }
    }

    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    /// One past the highest id in use, or 1 for an empty store.
    ///
    /// Deleting the post with the highest id frees that id for reuse.
    pub fn next_id(&self) -> ApiResult<u64> {
        match self.posts.iter().map(Post::id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| ApiError::Internal("post id space exhausted".to_string())),
        }
    }

    pub fn insert(&mut self, title: &str, content: &str) -> ApiResult<Post> {
        let post = Post::new(self.next_id()?, title, content);
        info!("created post {:?}", post);
        self.posts.push(post.clone());
        Ok(post)
    }

    pub fn find_by_id(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id() == id)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        match self.posts.iter().position(|post| post.id() == id) {
            Some(index) => {
                self.posts.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self, id: u64, title: &str, content: &str) -> Option<&Post> {
        let post = self.posts.iter_mut().find(|post| post.id() == id)?;
        post.rewrite(title, content);
        Some(post)
    }

    /// Case-insensitive substring match on one field. An empty query matches nothing.
    pub fn search_by_field(&self, query: &str, field: PostField) -> Vec<Post> {
        if query.is_empty() {
            return vec![];
        }
        let needle = query.to_lowercase();
        self.posts
            .iter()
            .filter(|post| post.field(field).to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Sorted copy of the posts; equal keys keep insertion order either way.
    pub fn sort_by(&self, field: PostField, direction: SortDirection) -> Vec<Post> {
        let mut sorted = self.posts.clone();
        if direction.is_descending() {
            sorted.sort_by(|a, b| b.field(field).cmp(a.field(field)));
        } else {
            sorted.sort_by(|a, b| a.field(field).cmp(b.field(field)));
        }
        sorted
    }
}
