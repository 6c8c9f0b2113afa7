//! Resource storage for one process: the user and post stores plus the id
//! source they share.

use crate::{
    error::{Error, ErrorOrigin},
    model::{AuthorSummary, NewPost, NewUser, Post, PostView, Role, Tag, User},
};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use sumdnc_core::{
    db::{ListRequest, MemoryStore, Page, PagePolicy, PaginatedLister, Store, StoreError},
    obs::sink::{self, LookupKind, MetricsEvent},
    traits::EntityKind,
    types::{IdGenerator, Timestamp},
};

///
/// Database
///
/// Writes hold `tables` exclusively. Reads that join posts to their authors
/// hold it shared for the whole response, so a page never mixes two states
/// of the user table.
///

#[derive(Default)]
pub struct Database {
    users: MemoryStore<User>,
    posts: MemoryStore<Post>,
    ids: IdGenerator,
    tables: RwLock<()>,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn users(&self) -> &MemoryStore<User> {
        &self.users
    }

    //
    // Writes
    //

    pub fn create_user(&self, new: NewUser) -> Result<User, Error> {
        let _tables = self.write_tables()?;
        let created_at = new.created_at.unwrap_or_else(Timestamp::now);
        let user = User {
            id: self.ids.next(created_at),
            name: new.name,
            email: new.email,
            image: new.image,
            role: new.role,
            created_at,
        };
        self.users.insert(user.clone())?;

        tracing::debug!(id = %user.id, "created user");
        Ok(user)
    }

    /// Insert a post. The author must exist at insert time.
    pub fn create_post(&self, new: NewPost) -> Result<Post, Error> {
        let _tables = self.write_tables()?;
        if self.users.get(&new.author_id)?.is_none() {
            return Err(Error::not_found(
                ErrorOrigin::Store,
                format!("author not found: {}", new.author_id),
            ));
        }

        let created_at = new.created_at.unwrap_or_else(Timestamp::now);
        let tags = new
            .tags
            .into_iter()
            .map(|name| Tag {
                id: self.ids.next(created_at),
                name,
            })
            .collect();
        let post = Post {
            id: self.ids.next(created_at),
            title: new.title,
            slug: new.slug,
            content: new.content,
            excerpt: new.excerpt,
            published: new.published,
            author_id: new.author_id,
            tags,
            created_at,
        };
        self.posts.insert(post.clone())?;

        tracing::debug!(id = %post.id, slug = %post.slug, "created post");
        Ok(post)
    }

    pub fn delete_user(&self, id: &str) -> Result<Option<User>, Error> {
        let _tables = self.write_tables()?;
        Ok(self.users.delete(id)?)
    }

    pub fn delete_post(&self, id: &str) -> Result<Option<Post>, Error> {
        let _tables = self.write_tables()?;
        Ok(self.posts.delete(id)?)
    }

    //
    // Reads
    //

    pub fn user(&self, id: &str) -> Result<Option<User>, Error> {
        lookup(&self.users, LookupKind::Id, |store| store.get(id))
    }

    pub fn post(&self, id: &str) -> Result<Option<PostView>, Error> {
        let _tables = self.read_tables()?;
        let post = lookup(&self.posts, LookupKind::Id, |store| store.get(id))?;

        post.map(|post| self.post_view(post)).transpose()
    }

    pub fn post_by_slug(&self, slug: &str) -> Result<Option<PostView>, Error> {
        let _tables = self.read_tables()?;
        let post = lookup(&self.posts, LookupKind::Unique, |store| {
            store.get_unique("slug", slug)
        })?;

        post.map(|post| self.post_view(post)).transpose()
    }

    pub fn list_users(
        &self,
        policy: PagePolicy,
        request: &ListRequest,
    ) -> Result<Page<User>, Error> {
        Ok(PaginatedLister::with_policy(&self.users, policy).list(request)?)
    }

    pub fn list_posts(
        &self,
        policy: PagePolicy,
        request: &ListRequest,
    ) -> Result<Page<PostView>, Error> {
        let _tables = self.read_tables()?;
        let page = PaginatedLister::with_policy(&self.posts, policy).list(request)?;

        page.try_map(|post| self.post_view(post))
    }

    fn post_view(&self, post: Post) -> Result<PostView, Error> {
        let author = self
            .users
            .get(&post.author_id)?
            .as_ref()
            .map(AuthorSummary::from);

        Ok(PostView::new(post, author))
    }

    fn read_tables(&self) -> Result<RwLockReadGuard<'_, ()>, StoreError> {
        self.tables.read().map_err(|_| tables_poisoned())
    }

    fn write_tables(&self) -> Result<RwLockWriteGuard<'_, ()>, StoreError> {
        self.tables.write().map_err(|_| tables_poisoned())
    }

    //
    // Demo content
    //

    /// Insert a small fixed data set: two authors and a mix of published
    /// and draft posts with strictly increasing creation times.
    pub fn seed_demo(&self, base: Timestamp) -> Result<(), Error> {
        let at = |offset: u64| Timestamp::from_millis(base.as_millis().saturating_add(offset));

        let admin = self.create_user(
            NewUser::new("admin@sumdnc.example")
                .name("Site Admin")
                .role(Role::Admin)
                .created_at(at(0)),
        )?;
        let writer = self.create_user(
            NewUser::new("writer@sumdnc.example")
                .name("Staff Writer")
                .created_at(at(1)),
        )?;

        let posts = [
            ("Welcome", "welcome", &admin, true, &["news"][..]),
            ("Service areas", "service-areas", &writer, true, &["local"][..]),
            ("Seasonal checklist", "seasonal-checklist", &writer, true, &["tips", "local"][..]),
            ("Upcoming changes", "upcoming-changes", &admin, false, &[][..]),
            ("Customer stories", "customer-stories", &writer, true, &["stories"][..]),
        ];
        for (offset, (title, slug, author, published, tags)) in (2_u64..).zip(posts) {
            let new = tags.iter().fold(
                NewPost::new(title, slug, author.id.clone())
                    .content(format!("{title}."))
                    .published(published)
                    .created_at(at(offset)),
                |new, tag| new.tag(*tag),
            );
            self.create_post(new)?;
        }

        tracing::info!(users = 2, posts = posts.len(), "seeded demo content");
        Ok(())
    }
}

fn tables_poisoned() -> StoreError {
    StoreError::Unavailable {
        reason: "table lock poisoned".to_string(),
    }
}

// Run one point lookup and record whether it hit.
fn lookup<E, S>(
    store: &S,
    kind: LookupKind,
    f: impl FnOnce(&S) -> Result<Option<E>, StoreError>,
) -> Result<Option<E>, Error>
where
    E: EntityKind,
    S: Store<E>,
{
    let found = f(store)?;
    sink::record(MetricsEvent::Lookup {
        entity_path: E::PATH,
        kind,
        found: found.is_some(),
    });

    Ok(found)
}

///
/// TESTS
///
