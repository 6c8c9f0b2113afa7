use crate::{
    traits::{EntityKind, FieldModel},
    types::Timestamp,
    value::{Value, ValueKind},
};

///
/// TestRow
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TestRow {
    pub(crate) id: String,
    pub(crate) created_at: Timestamp,
    pub(crate) published: bool,
    pub(crate) title: Option<String>,
    pub(crate) rank: u64,
    pub(crate) slug: Option<String>,
}

impl TestRow {
    #[must_use]
    pub(crate) fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }
}

impl EntityKind for TestRow {
    const PATH: &'static str = "sumdnc_core::test_support::TestRow";
    const FIELDS: &'static [FieldModel] = &[
        FieldModel::required("id", ValueKind::Text),
        FieldModel::required("published", ValueKind::Bool),
        FieldModel::nullable("title", ValueKind::Text),
        FieldModel::required("rank", ValueKind::Uint),
        FieldModel::nullable("slug", ValueKind::Text),
    ];
    const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.clone().into()),
            "published" => Some(self.published.into()),
            "title" => Some(self.title.clone().into()),
            "rank" => Some(self.rank.into()),
            "slug" => Some(self.slug.clone().into()),
            _ => None,
        }
    }
}

/// Build a row whose `rank` mirrors its creation time.
pub(crate) fn row(id: &str, created_at_ms: u64, published: bool) -> TestRow {
    TestRow {
        id: id.to_string(),
        created_at: Timestamp::from_millis(created_at_ms),
        published,
        title: None,
        rank: created_at_ms,
        slug: None,
    }
}

///
/// OtherRow
/// Same shape as `TestRow` under a different path.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct OtherRow(pub(crate) TestRow);

impl EntityKind for OtherRow {
    const PATH: &'static str = "sumdnc_core::test_support::OtherRow";
    const FIELDS: &'static [FieldModel] = TestRow::FIELDS;

    fn id(&self) -> &str {
        self.0.id()
    }

    fn created_at(&self) -> Timestamp {
        self.0.created_at
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        self.0.field_value(field)
    }
}
