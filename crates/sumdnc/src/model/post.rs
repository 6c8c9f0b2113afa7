use crate::model::user::User;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use sumdnc_core::{
    traits::{EntityKind, FieldModel},
    types::Timestamp,
    value::{Value, ValueKind},
};

///
/// Tag
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

///
/// Post
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub author_id: String,
    pub tags: Vec<Tag>,
    pub created_at: Timestamp,
}

impl EntityKind for Post {
    const PATH: &'static str = "sumdnc::model::post::Post";
    const FIELDS: &'static [FieldModel] = &[
        FieldModel::required("id", ValueKind::Text),
        FieldModel::required("title", ValueKind::Text),
        FieldModel::required("slug", ValueKind::Text),
        FieldModel::nullable("excerpt", ValueKind::Text),
        FieldModel::required("published", ValueKind::Bool),
        FieldModel::required("authorId", ValueKind::Text),
        FieldModel::required("createdAt", ValueKind::Timestamp),
    ];
    const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        let value = match field {
            "id" => self.id.clone().into(),
            "title" => self.title.clone().into(),
            "slug" => self.slug.clone().into(),
            "excerpt" => self.excerpt.clone().into(),
            "published" => self.published.into(),
            "authorId" => self.author_id.clone().into(),
            "createdAt" => self.created_at.into(),
            _ => return None,
        };

        Some(value)
    }
}

///
/// AuthorSummary
/// Public subset of a user joined into post views.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuthorSummary {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

///
/// PostView
///
/// Post with its author and tags joined in. `author` is `None` when the
/// author row has since been removed.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub author_id: String,
    pub created_at: Timestamp,
    pub author: Option<AuthorSummary>,
    pub tags: Vec<Tag>,
}

impl PostView {
    #[must_use]
    pub fn new(post: Post, author: Option<AuthorSummary>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            published: post.published,
            author_id: post.author_id,
            created_at: post.created_at,
            author,
            tags: post.tags,
        }
    }
}

///
/// NewPost
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub author_id: String,
    pub tags: Vec<String>,
    pub created_at: Option<Timestamp>,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            author_id: author_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    #[must_use]
    pub const fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    #[must_use]
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(name.into());
        self
    }

    #[must_use]
    pub const fn created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumdnc_core::db::Predicate;

    fn post(published: bool) -> Post {
        Post {
            id: "p1".to_string(),
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            content: String::new(),
            excerpt: None,
            published,
            author_id: "u1".to_string(),
            tags: vec![],
            created_at: Timestamp::from_millis(5),
        }
    }

    #[test]
    fn published_filter_validates_and_matches() {
        let filter = Predicate::eq("published", true);

        filter
            .validate::<Post>()
            .expect("published is a declared field");
        assert!(filter.matches(&post(true)));
        assert!(!filter.matches(&post(false)));
    }

    #[test]
    fn view_serializes_camel_case_with_author() {
        let author = AuthorSummary {
            id: "u1".to_string(),
            name: Some("Ada".to_string()),
            image: None,
        };
        let json = serde_json::to_value(PostView::new(post(true), Some(author)))
            .expect("view should serialize");

        assert_eq!(json["authorId"], "u1");
        assert_eq!(json["createdAt"], 5);
        assert_eq!(json["author"]["name"], "Ada");
    }
}
