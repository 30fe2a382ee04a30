use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: u64,
    title: String,
    content: String,
}

impl Post {
    pub fn new(id: u64, title: &str, content: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn field(&self, field: PostField) -> &str {
        match field {
            PostField::Title => &self.title,
            PostField::Content => &self.content,
        }
    }

    /// Replace title and content; the id never changes.
    pub fn rewrite(&mut self, title: &str, content: &str) {
        self.title = title.to_string();
        self.content = content.to_string();
    }
}

/// Body of a create or update request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

/// The text field a search or sort looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostField {
    Title,
    Content,
}

impl FromStr for PostField {
    type Err = ();

    fn from_str(s: &str) -> Result<PostField, ()> {
        match s {
            "title" => Ok(PostField::Title),
            "content" => Ok(PostField::Content),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        self == SortDirection::Desc
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<SortDirection, ()> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_serializes_as_flat_object() {
        let post = Post::new(3, "Title", "Body");
        let json = serde_json::to_string(&post).unwrap();
        assert_eq!(json, r#"{"id":3,"title":"Title","content":"Body"}"#);
    }

    #[test]
    fn draft_requires_both_fields() {
        assert!(serde_json::from_str::<PostDraft>(r#"{"title":"A"}"#).is_err());
        assert!(serde_json::from_str::<PostDraft>(r#"{"title":"A","content":5}"#).is_err());

        let draft: PostDraft =
            serde_json::from_str(r#"{"title":"A","content":"B","extra":true}"#).unwrap();
        assert_eq!(draft.title, "A");
        assert_eq!(draft.content, "B");
    }

    #[test]
    fn field_and_direction_names() {
        assert_eq!("title".parse::<PostField>(), Ok(PostField::Title));
        assert_eq!("content".parse::<PostField>(), Ok(PostField::Content));
        assert!("Title".parse::<PostField>().is_err());
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("up".parse::<SortDirection>().is_err());
    }
}
